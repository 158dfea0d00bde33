// ==========================================
// 电解铝出铝排产系统 - 约束校验引擎
// ==========================================
// 职责: 校验抬包的槽数/成分/重量约束, 推导任务状态
// 输入: 任务 (已重算混合成分) + 牌号约束 + 产能配置
// 输出: 约束是否满足 + 有序违规列表
// 红线: 全部检查都执行, 不短路; 微量元素缺省 = 不约束
// ==========================================
// 检查顺序:
// 1. 槽数
// 2. Fe
// 3. Si
// 4. 重量上限 (/ 下限)
// 5. Vn / Cr / Ni (仅已配置)
// ==========================================

use crate::domain::batch::{Batch, ConstraintViolation, Element};
use crate::domain::capacity::{CapacityConfig, WEIGHT_EPSILON};
use crate::domain::grade::GradeConstraints;
use crate::domain::types::BatchStatus;

/// 校验结果
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub constraints_met: bool,
    pub violations: Vec<ConstraintViolation>,
}

// ==========================================
// ConstraintValidator - 约束校验引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintValidator;

impl ConstraintValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验任务
    ///
    /// # 参数
    /// - `batch`: 任务 (blend 必须已重算)
    /// - `constraints`: 目标牌号约束
    /// - `capacity`: 产能配置
    pub fn validate(
        &self,
        batch: &Batch,
        constraints: &GradeConstraints,
        capacity: &CapacityConfig,
    ) -> ValidationOutcome {
        let mut violations = Vec::new();
        let blend = &batch.blend;

        // 1. 槽数
        let count = batch.pot_count();
        if !capacity.pots_per_batch.accepts(count) {
            violations.push(ConstraintViolation::PotCount {
                rule: capacity.pots_per_batch,
                actual: count,
            });
        }

        // 2-3. Fe / Si
        check_element(&mut violations, Element::Fe, blend.fe, Some(constraints.max_fe));
        check_element(&mut violations, Element::Si, blend.si, Some(constraints.max_si));

        // 4. 重量
        if blend.total_weight > capacity.max_weight_per_batch + WEIGHT_EPSILON {
            violations.push(ConstraintViolation::WeightOverMax {
                total_weight: blend.total_weight,
                max: capacity.max_weight_per_batch,
            });
        }
        if let Some(min) = capacity.min_weight_per_batch {
            if blend.total_weight + WEIGHT_EPSILON < min {
                violations.push(ConstraintViolation::WeightUnderMin {
                    total_weight: blend.total_weight,
                    min,
                });
            }
        }

        // 5. 微量元素
        check_element(&mut violations, Element::Vn, blend.vn, constraints.max_vn);
        check_element(&mut violations, Element::Cr, blend.cr, constraints.max_cr);
        check_element(&mut violations, Element::Ni, blend.ni, constraints.max_ni);

        ValidationOutcome {
            constraints_met: violations.is_empty(),
            violations,
        }
    }

    /// 推导任务状态
    ///
    /// - 无槽 → Empty
    /// - 槽数低于下限 → Incomplete
    /// - 其余约束不满足 → Draft
    /// - 全部满足 → Ready
    pub fn derive_status(
        &self,
        pot_count: usize,
        outcome: &ValidationOutcome,
        capacity: &CapacityConfig,
    ) -> BatchStatus {
        if pot_count == 0 {
            BatchStatus::Empty
        } else if pot_count < capacity.pots_per_batch.min() {
            BatchStatus::Incomplete
        } else if outcome.constraints_met {
            BatchStatus::Ready
        } else {
            BatchStatus::Draft
        }
    }
}

fn check_element(
    violations: &mut Vec<ConstraintViolation>,
    element: Element,
    blended: f64,
    max: Option<f64>,
) {
    if let Some(max) = max {
        if blended > max {
            violations.push(ConstraintViolation::Element { element, blended, max });
        }
    }
}
