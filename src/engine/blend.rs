// ==========================================
// 电解铝出铝排产系统 - 混合成分计算
// ==========================================
// 职责: 按重量加权计算抬包混合成分
// 红线: 每次从头重算, 不做增量平均; 仅总重为 0 时成分为 0
// ==========================================

use crate::domain::batch::{BlendedChemistry, PotAssignment};

/// 计算加权混合成分
///
/// # 参数
/// - `assignments`: 入包快照列表
///
/// # 返回
/// blendedX = Σ(x_i * w_i) / Σ w_i; 总重为 0 时各元素为 0
pub fn blend(assignments: &[PotAssignment]) -> BlendedChemistry {
    let mut acc = BlendedChemistry::default();
    for a in assignments {
        acc.fe += a.fe * a.weight;
        acc.si += a.si * a.weight;
        acc.vn += a.vn * a.weight;
        acc.cr += a.cr * a.weight;
        acc.ni += a.ni * a.weight;
        acc.total_weight += a.weight;
    }

    // 出铝量在建会话时已校验为正数, 仅空任务总重为 0
    if acc.total_weight == 0.0 {
        return BlendedChemistry {
            total_weight: acc.total_weight,
            ..BlendedChemistry::default()
        };
    }

    let w = acc.total_weight;
    BlendedChemistry {
        fe: acc.fe / w,
        si: acc.si / w,
        vn: acc.vn / w,
        cr: acc.cr / w,
        ni: acc.ni / w,
        total_weight: w,
    }
}
