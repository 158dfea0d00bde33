// ==========================================
// 电解铝出铝排产系统 - 槽况评分引擎
// ==========================================
// 职责: 由指标 + 风险等级计算 0-100 连续健康分
// 规则: 100 起扣, 分维度查表扣分, 求和后截断到 [0, 100]
// 红线: 停槽直接 0 分; 任一指标单独恶化不得使分数上升
// ==========================================

use crate::config::planner_config::ScoreDeductions;
use crate::domain::pot::PotMetrics;
use crate::domain::types::RiskLevel;

/// 满分
pub const FULL_SCORE: f64 = 100.0;

/// 分维度扣分明细 (可解释性)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub fe: f64,
    pub si: f64,
    pub temperature: f64,
    pub fe_slope: f64,
    pub si_slope: f64,
    pub ae_frequency: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.fe + self.si + self.temperature + self.fe_slope + self.si_slope + self.ae_frequency
    }
}

// ==========================================
// HealthScorer - 槽况评分引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct HealthScorer {
    deductions: ScoreDeductions,
}

impl HealthScorer {
    pub fn new(deductions: ScoreDeductions) -> Self {
        Self { deductions }
    }

    /// 计算健康分
    ///
    /// # 参数
    /// - `metrics`: 瞬时指标 (含斜率)
    /// - `risk_level`: 已判定的风险等级
    ///
    /// # 返回
    /// [0, 100] 区间内的分数
    pub fn score(&self, metrics: &PotMetrics, risk_level: RiskLevel) -> f64 {
        if risk_level == RiskLevel::Shutdown {
            return 0.0;
        }
        let breakdown = self.breakdown(metrics);
        (FULL_SCORE - breakdown.total()).clamp(0.0, FULL_SCORE)
    }

    /// 扣分明细
    ///
    /// 斜率项单独扣分: 瞬时值尚可但上升趋势明显时提前降分
    pub fn breakdown(&self, metrics: &PotMetrics) -> ScoreBreakdown {
        let d = &self.deductions;
        ScoreBreakdown {
            fe: d.fe.deduction(metrics.fe),
            si: d.si.deduction(metrics.si),
            temperature: d.temperature_deduction(metrics.temperature),
            fe_slope: d.fe_slope.deduction(metrics.fe_slope),
            si_slope: d.si_slope.deduction(metrics.si_slope),
            ae_frequency: d.ae_frequency.deduction(metrics.ae_frequency),
        }
    }
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self::new(ScoreDeductions::default())
    }
}
