// ==========================================
// 电解铝出铝排产系统 - 规划配置项
// ==========================================
// 职责: 槽况阈值、评分扣分表、告警规则、产能、牌号约束
// 红线: 阈值是配置, 不是写死的业务含义
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::capacity::{CapacityConfig, PotCountRule};
use crate::domain::grade::ConstraintTable;
use serde::{Deserialize, Serialize};

// ==========================================
// Band - 闭区间 [min, max]
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &str) -> ConfigResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(ConfigError::invalid(
                field,
                format!("区间无效: [{}, {}]", self.min, self.max),
            ));
        }
        Ok(())
    }
}

// ==========================================
// RiskThresholds - 槽况分级阈值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskThresholds {
    pub fe_critical: f64,
    pub fe_moderate: f64,
    pub si_critical: f64,
    pub si_moderate: f64,
    pub temperature_band: Band,  // 正常温度区间 (°C)
    pub molar_ratio_band: Band,  // 正常分子比区间
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            fe_critical: 0.18,
            fe_moderate: 0.10,
            si_critical: 0.07,
            si_moderate: 0.05,
            temperature_band: Band::new(960.0, 975.0),
            molar_ratio_band: Band::new(2.2, 2.8),
        }
    }
}

impl RiskThresholds {
    fn validate(&self) -> ConfigResult<()> {
        for (field, moderate, critical) in [
            ("risk.fe", self.fe_moderate, self.fe_critical),
            ("risk.si", self.si_moderate, self.si_critical),
        ] {
            if !moderate.is_finite() || !critical.is_finite() || moderate >= critical {
                return Err(ConfigError::invalid(
                    field,
                    format!("关注阈值 {} 必须小于危险阈值 {}", moderate, critical),
                ));
            }
        }
        self.temperature_band.validate("risk.temperatureBand")?;
        self.molar_ratio_band.validate("risk.molarRatioBand")?;
        Ok(())
    }
}

// ==========================================
// 扣分表
// ==========================================

/// 单档扣分: 指标达到 threshold 时扣 points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeductionTier {
    pub threshold: f64,
    pub points: f64,
}

/// 分档扣分表 (按阈值降序, 取首个命中档)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub tiers: Vec<DeductionTier>,
    /// true: 严格大于阈值才命中 (斜率类指标)
    #[serde(default)]
    pub strict: bool,
}

impl TierTable {
    pub fn at_least(tiers: &[(f64, f64)]) -> Self {
        Self {
            tiers: tiers
                .iter()
                .map(|&(threshold, points)| DeductionTier { threshold, points })
                .collect(),
            strict: false,
        }
    }

    pub fn above(tiers: &[(f64, f64)]) -> Self {
        Self {
            strict: true,
            ..Self::at_least(tiers)
        }
    }

    /// 查表扣分
    pub fn deduction(&self, value: f64) -> f64 {
        self.tiers
            .iter()
            .find(|t| if self.strict { value > t.threshold } else { value >= t.threshold })
            .map(|t| t.points)
            .unwrap_or(0.0)
    }

    /// 阈值严格降序、扣分非增 (保证评分单调)
    fn validate(&self, field: &str) -> ConfigResult<()> {
        for tier in &self.tiers {
            if !tier.threshold.is_finite() || !tier.points.is_finite() || tier.points < 0.0 {
                return Err(ConfigError::invalid(field, format!("扣分档无效: {:?}", tier)));
            }
        }
        for pair in self.tiers.windows(2) {
            if pair[0].threshold <= pair[1].threshold || pair[0].points < pair[1].points {
                return Err(ConfigError::invalid(
                    field,
                    "扣分档必须按阈值降序且扣分不增".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// 温度偏离扣分: 超出某区间即扣该档分数 (区间由宽到窄)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandDeduction {
    pub band: Band,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreDeductions {
    pub fe: TierTable,
    pub si: TierTable,
    pub temperature: Vec<BandDeduction>,
    pub fe_slope: TierTable,
    pub si_slope: TierTable,
    pub ae_frequency: TierTable,
}

impl Default for ScoreDeductions {
    fn default() -> Self {
        Self {
            fe: TierTable::at_least(&[(0.18, 30.0), (0.10, 15.0), (0.08, 5.0)]),
            si: TierTable::at_least(&[(0.07, 25.0), (0.05, 12.0), (0.04, 4.0)]),
            temperature: vec![
                BandDeduction {
                    band: Band::new(950.0, 985.0),
                    points: 20.0,
                },
                BandDeduction {
                    band: Band::new(960.0, 975.0),
                    points: 8.0,
                },
            ],
            fe_slope: TierTable::above(&[(0.005, 15.0), (0.002, 7.0)]),
            si_slope: TierTable::above(&[(0.003, 8.0), (0.001, 3.0)]),
            ae_frequency: TierTable::at_least(&[(3.0, 10.0), (1.0, 5.0)]),
        }
    }
}

impl ScoreDeductions {
    /// 温度扣分: 取首个不包含该温度的区间
    pub fn temperature_deduction(&self, temperature: f64) -> f64 {
        self.temperature
            .iter()
            .find(|d| !d.band.contains(temperature))
            .map(|d| d.points)
            .unwrap_or(0.0)
    }

    fn validate(&self) -> ConfigResult<()> {
        self.fe.validate("scoring.fe")?;
        self.si.validate("scoring.si")?;
        self.fe_slope.validate("scoring.feSlope")?;
        self.si_slope.validate("scoring.siSlope")?;
        self.ae_frequency.validate("scoring.aeFrequency")?;

        for d in &self.temperature {
            d.band.validate("scoring.temperature")?;
            if !d.points.is_finite() || d.points < 0.0 {
                return Err(ConfigError::invalid("scoring.temperature", format!("扣分无效: {}", d.points)));
            }
        }
        // 外层区间必须包含内层, 且扣分不低于内层
        for pair in self.temperature.windows(2) {
            let (outer, inner) = (&pair[0], &pair[1]);
            if outer.band.min > inner.band.min || outer.band.max < inner.band.max || outer.points < inner.points {
                return Err(ConfigError::invalid(
                    "scoring.temperature",
                    "温度区间必须由宽到窄嵌套且扣分不增".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ==========================================
// AlertRules - 告警规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertRules {
    /// 评分低于该值触发预测告警
    pub prediction_score_below: f64,
    /// Fe 斜率高于该值触发预测告警
    pub prediction_fe_slope_above: f64,
}

impl Default for AlertRules {
    fn default() -> Self {
        Self {
            prediction_score_below: 60.0,
            prediction_fe_slope_above: 0.005,
        }
    }
}

// ==========================================
// PlannerConfig - 配置全集
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub risk: RiskThresholds,
    pub scoring: ScoreDeductions,
    pub alerts: AlertRules,
    pub capacity: CapacityConfig,
    pub grades: ConstraintTable,
}

impl PlannerConfig {
    /// 语义校验
    pub fn validate(&self) -> ConfigResult<()> {
        self.risk.validate()?;
        self.scoring.validate()?;
        validate_capacity(&self.capacity)?;
        validate_grades(&self.grades)?;
        Ok(())
    }
}

/// 产能配置校验
pub fn validate_capacity(capacity: &CapacityConfig) -> ConfigResult<()> {
    match capacity.pots_per_batch {
        PotCountRule::Exact(0) => {
            return Err(ConfigError::invalid("capacity.potsPerBatch", "槽数必须大于 0".to_string()));
        }
        PotCountRule::Range { min, max } if min == 0 || min > max => {
            return Err(ConfigError::invalid(
                "capacity.potsPerBatch",
                format!("槽数区间无效: [{}, {}]", min, max),
            ));
        }
        _ => {}
    }
    if capacity.max_batches_per_shift == 0 {
        return Err(ConfigError::invalid("capacity.maxBatchesPerShift", "必须大于 0".to_string()));
    }
    for (field, value) in [
        ("capacity.maxWeightPerBatch", capacity.max_weight_per_batch),
        ("capacity.defaultPotWeight", capacity.default_pot_weight),
        ("capacity.avgWeightPerBatch", capacity.avg_weight_per_batch),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::invalid(field, format!("必须为正数: {}", value)));
        }
    }
    if let Some(min) = capacity.min_weight_per_batch {
        if !min.is_finite() || min < 0.0 || min > capacity.max_weight_per_batch {
            return Err(ConfigError::invalid(
                "capacity.minWeightPerBatch",
                format!("重量下限 {} 无效 (上限 {})", min, capacity.max_weight_per_batch),
            ));
        }
    }
    Ok(())
}

/// 牌号约束表校验
pub fn validate_grades(grades: &ConstraintTable) -> ConfigResult<()> {
    for (grade, constraints) in grades.iter() {
        for (name, value) in constraints.limits() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    &format!("grades.{}.{}", grade, name),
                    format!("上限无效: {}", value),
                ));
            }
        }
    }
    Ok(())
}
