// ==========================================
// 电解铝出铝排产系统 - 产能约束模型
// ==========================================
// 红线: 产能约束优先于槽况评分
// 用途: 单包槽数/重量上限, 单班任务数上限
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PotCountRule - 单包槽数规则
// ==========================================
// Exact(n): 恰好 n 槽 (任务模式)
// Range: [min, max] 槽 (抬包模式)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PotCountRule {
    Exact(usize),
    Range { min: usize, max: usize },
}

impl PotCountRule {
    /// 下限
    pub fn min(&self) -> usize {
        match *self {
            PotCountRule::Exact(n) => n,
            PotCountRule::Range { min, .. } => min,
        }
    }

    /// 上限
    pub fn max(&self) -> usize {
        match *self {
            PotCountRule::Exact(n) => n,
            PotCountRule::Range { max, .. } => max,
        }
    }

    /// 自动补槽/整包规划的目标槽数 (取上限)
    pub fn target(&self) -> usize {
        self.max()
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min() && count <= self.max()
    }
}

impl fmt::Display for PotCountRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PotCountRule::Exact(n) => write!(f, "恰好 {} 槽", n),
            PotCountRule::Range { min, max } => write!(f, "{}-{} 槽", min, max),
        }
    }
}

// ==========================================
// CapacityConfig - 产能配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacityConfig {
    pub pots_per_batch: PotCountRule,
    pub max_batches_per_shift: usize,
    pub max_weight_per_batch: f64,       // MT
    pub min_weight_per_batch: Option<f64>, // MT, 缺省不校验
    pub default_pot_weight: f64,         // MT, 槽记录无重量时使用
    pub avg_weight_per_batch: f64,       // MT, 需求换算任务数
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            pots_per_batch: PotCountRule::Exact(4),
            max_batches_per_shift: 16,
            max_weight_per_batch: 10.5,
            min_weight_per_batch: None,
            default_pot_weight: 2.5,
            avg_weight_per_batch: 10.0,
        }
    }
}

impl CapacityConfig {
    /// 单班槽数上限
    pub fn max_pots_per_shift(&self) -> usize {
        self.max_batches_per_shift * self.pots_per_batch.target()
    }

    /// 当前重量上再加一槽是否仍不超上限
    pub fn can_add_weight(&self, current_weight: f64, weight: f64) -> bool {
        current_weight + weight <= self.max_weight_per_batch + WEIGHT_EPSILON
    }

    /// 需求吨位换算任务数: ceil(target / avg)
    pub fn tasks_needed(&self, target_quantity: f64) -> usize {
        if !(target_quantity > 0.0) || !(self.avg_weight_per_batch > 0.0) {
            return 0;
        }
        (target_quantity / self.avg_weight_per_batch).ceil() as usize
    }
}

/// 重量比较容差 (MT)
pub const WEIGHT_EPSILON: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_rule_bounds() {
        let rule = PotCountRule::Exact(4);
        assert_eq!(rule.min(), 4);
        assert_eq!(rule.max(), 4);
        assert!(rule.accepts(4));
        assert!(!rule.accepts(3));
        assert!(!rule.accepts(5));
    }

    #[test]
    fn test_range_rule_bounds() {
        let rule = PotCountRule::Range { min: 2, max: 6 };
        assert!(rule.accepts(2));
        assert!(rule.accepts(6));
        assert!(!rule.accepts(1));
        assert_eq!(rule.target(), 6);
    }

    #[test]
    fn test_tasks_needed_rounds_up() {
        let cfg = CapacityConfig::default();
        assert_eq!(cfg.tasks_needed(25.0), 3);
        assert_eq!(cfg.tasks_needed(20.0), 2);
        assert_eq!(cfg.tasks_needed(0.0), 0);
        assert_eq!(cfg.tasks_needed(-5.0), 0);
    }

    #[test]
    fn test_can_add_weight_at_exact_limit() {
        let cfg = CapacityConfig::default();
        assert!(cfg.can_add_weight(8.0, 2.5));
        assert!(!cfg.can_add_weight(8.5, 2.5));
    }

    #[test]
    fn test_count_rule_json_shape() {
        let rule: PotCountRule = serde_json::from_str(r#"{"range": {"min": 2, "max": 6}}"#).unwrap();
        assert_eq!(rule, PotCountRule::Range { min: 2, max: 6 });
        let rule: PotCountRule = serde_json::from_str(r#"{"exact": 4}"#).unwrap();
        assert_eq!(rule, PotCountRule::Exact(4));
    }
}
