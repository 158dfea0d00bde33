// ==========================================
// 电解铝出铝排产系统 - 槽况评估流水线
// ==========================================
// 职责: 分级 + 评分, 写入槽的派生字段; 全厂槽况汇总
// 输入: 原始槽记录 (可带外部预置的等级/分数)
// 输出: 已评估槽记录 (顺序不变)
// 红线: 外部预置的 Shutdown 不被覆盖, 分数强制为 0
// ==========================================

use crate::config::planner_config::PlannerConfig;
use crate::domain::pot::Pot;
use crate::domain::summary::FleetHealthSummary;
use crate::domain::types::RiskLevel;
use crate::engine::classifier::RiskClassifier;
use crate::engine::health_scorer::{HealthScorer, FULL_SCORE};
use tracing::{instrument, warn};

/// 预置评分必须有限且在 [0, 100] 内
fn is_valid_score(score: f64) -> bool {
    score.is_finite() && (0.0..=FULL_SCORE).contains(&score)
}

// ==========================================
// HealthAssessor - 槽况评估流水线
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct HealthAssessor {
    classifier: RiskClassifier,
    scorer: HealthScorer,
}

impl HealthAssessor {
    pub fn new(classifier: RiskClassifier, scorer: HealthScorer) -> Self {
        Self { classifier, scorer }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(
            RiskClassifier::new(config.risk.clone()),
            HealthScorer::new(config.scoring.clone()),
        )
    }

    /// 评估单槽
    ///
    /// - 等级缺省 → 由分级引擎判定
    /// - 分数缺省或不在 [0, 100] → 由评分引擎计算
    /// - Shutdown → 分数强制 0
    pub fn assess(&self, mut pot: Pot) -> Pot {
        let level = match pot.risk_level {
            Some(level) => level,
            None => self.classifier.classify(&pot.metrics),
        };
        pot.risk_level = Some(level);

        if level == RiskLevel::Shutdown {
            pot.ai_score = Some(0.0);
            return pot;
        }
        let preset = pot.ai_score;
        if !preset.map_or(false, is_valid_score) {
            if let Some(score) = preset {
                warn!(pot_id = %pot.id, score, "预置评分无效, 重新计算");
            }
            pot.ai_score = Some(self.scorer.score(&pot.metrics, level));
        }
        pot
    }

    /// 批量评估 (保持输入顺序)
    #[instrument(skip(self, pots), fields(pots_count = pots.len()))]
    pub fn assess_all(&self, pots: Vec<Pot>) -> Vec<Pot> {
        pots.into_iter().map(|p| self.assess(p)).collect()
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    pub fn scorer(&self) -> &HealthScorer {
        &self.scorer
    }
}

// ==========================================
// 全厂槽况汇总
// ==========================================

/// 等级权重 (运行槽加权健康分)
fn level_weight(level: RiskLevel) -> Option<f64> {
    match level {
        RiskLevel::Normal => Some(100.0),
        RiskLevel::Moderate => Some(60.0),
        RiskLevel::High => Some(30.0),
        RiskLevel::Critical => Some(10.0),
        RiskLevel::Shutdown => None,
    }
}

/// 汇总已评估槽 (未评估槽按 Normal 计)
pub fn summarize_fleet<'a, I>(pots: I) -> FleetHealthSummary
where
    I: IntoIterator<Item = &'a Pot>,
{
    let mut summary = FleetHealthSummary::default();
    let mut weighted = 0.0;
    let mut active = 0usize;

    for pot in pots {
        summary.total += 1;
        let level = pot.risk_level.unwrap_or(RiskLevel::Normal);
        match level {
            RiskLevel::Critical => summary.critical += 1,
            RiskLevel::High => summary.high += 1,
            RiskLevel::Moderate => summary.moderate += 1,
            RiskLevel::Normal => summary.normal += 1,
            RiskLevel::Shutdown => summary.shutdown += 1,
        }
        if let Some(w) = level_weight(level) {
            weighted += w;
            active += 1;
        }
    }

    summary.overall_score = if active == 0 { 0.0 } else { weighted / active as f64 };
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pot::PotMetrics;

    fn pot(id: &str, fe: f64) -> Pot {
        Pot::new(
            id,
            1,
            "AB1",
            1,
            PotMetrics {
                fe,
                si: 0.03,
                vn: 0.0,
                cr: 0.0,
                ni: 0.0,
                temperature: 968.0,
                voltage: 4.0,
                molar_ratio: 2.5,
                ae_frequency: 0.0,
                fe_slope: 0.0,
                si_slope: 0.0,
            },
        )
    }

    #[test]
    fn test_assess_fills_missing_fields() {
        let assessor = HealthAssessor::default();
        let p = assessor.assess(pot("P1", 0.12));
        assert_eq!(p.risk_level, Some(RiskLevel::Moderate));
        assert_eq!(p.ai_score, Some(85.0));
    }

    #[test]
    fn test_assess_keeps_external_shutdown() {
        let assessor = HealthAssessor::default();
        let mut p = pot("P2", 0.05);
        p.risk_level = Some(RiskLevel::Shutdown);
        p.ai_score = Some(70.0);
        let p = assessor.assess(p);
        assert_eq!(p.risk_level, Some(RiskLevel::Shutdown));
        assert_eq!(p.ai_score, Some(0.0));
    }

    #[test]
    fn test_assess_keeps_preset_score() {
        let assessor = HealthAssessor::default();
        let mut p = pot("P3", 0.05);
        p.ai_score = Some(42.0);
        let p = assessor.assess(p);
        assert_eq!(p.ai_score, Some(42.0));
        assert_eq!(p.risk_level, Some(RiskLevel::Normal));
    }

    #[test]
    fn test_assess_recomputes_invalid_preset_score() {
        let assessor = HealthAssessor::default();
        for bad in [f64::NAN, f64::INFINITY, -5.0, 130.0] {
            let mut p = pot("P4", 0.12);
            p.ai_score = Some(bad);
            let p = assessor.assess(p);
            assert_eq!(p.ai_score, Some(85.0), "预置评分 {} 应被重算", bad);
        }
    }

    #[test]
    fn test_fleet_summary_weighted_score() {
        let assessor = HealthAssessor::default();
        let mut shut = pot("S", 0.05);
        shut.risk_level = Some(RiskLevel::Shutdown);
        let pots = assessor.assess_all(vec![pot("A", 0.05), pot("B", 0.12), shut]);
        let summary = summarize_fleet(&pots);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.normal, 1);
        assert_eq!(summary.moderate, 1);
        assert_eq!(summary.shutdown, 1);
        assert_eq!(summary.overall_score, 80.0);
    }

    #[test]
    fn test_fleet_summary_without_active_pots() {
        let summary = summarize_fleet(&Vec::<Pot>::new());
        assert_eq!(summary.overall_score, 0.0);
    }
}
