// ==========================================
// 电解铝出铝排产系统 - 槽况分级引擎
// ==========================================
// 职责: 由瞬时指标判定槽况风险等级
// 输入: PotMetrics
// 输出: RiskLevel (Critical/High/Moderate/Normal)
// 红线: 固定判定顺序, 命中多档取最严重; 不产生 Shutdown
// ==========================================

use crate::config::planner_config::RiskThresholds;
use crate::domain::pot::PotMetrics;
use crate::domain::types::RiskLevel;

// ==========================================
// RiskClassifier - 槽况分级引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl RiskClassifier {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    /// 判定风险等级
    ///
    /// 规则 (按顺序, 首个命中即返回):
    /// 1) Fe ≥ 危险阈值 OR Si ≥ 危险阈值 → Critical
    /// 2) 温度或分子比超出正常区间 → High
    /// 3) Fe ≥ 关注阈值 OR Si ≥ 关注阈值 → Moderate
    /// 4) 其余 → Normal
    pub fn classify(&self, metrics: &PotMetrics) -> RiskLevel {
        let t = &self.thresholds;

        if metrics.fe >= t.fe_critical || metrics.si >= t.si_critical {
            return RiskLevel::Critical;
        }

        if !t.temperature_band.contains(metrics.temperature)
            || !t.molar_ratio_band.contains(metrics.molar_ratio)
        {
            return RiskLevel::High;
        }

        if metrics.fe >= t.fe_moderate || metrics.si >= t.si_moderate {
            return RiskLevel::Moderate;
        }

        RiskLevel::Normal
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(RiskThresholds::default())
    }
}
