// ==========================================
// 电解铝出铝排产系统 - 出铝任务(抬包)领域模型
// ==========================================
// 职责: 任务、槽分配快照、混合成分、约束违规
// 红线: 分配快照在入包时固定, 不回读实时槽数据
// ==========================================

use crate::domain::capacity::PotCountRule;
use crate::domain::pot::Pot;
use crate::domain::types::{BatchStatus, ProductGrade};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PotAssignment - 入包快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotAssignment {
    pub pot_id: String,
    pub fe: f64,
    pub si: f64,
    pub vn: f64,
    pub cr: f64,
    pub ni: f64,
    pub weight: f64,
    pub ai_score: f64,
}

impl PotAssignment {
    /// 从槽记录拷贝成分快照
    ///
    /// # 参数
    /// - `pot`: 电解槽
    /// - `default_weight`: 槽记录无重量时使用的默认出铝量
    pub fn snapshot(pot: &Pot, default_weight: f64) -> Self {
        Self {
            pot_id: pot.id.clone(),
            fe: pot.metrics.fe,
            si: pot.metrics.si,
            vn: pot.metrics.vn,
            cr: pot.metrics.cr,
            ni: pot.metrics.ni,
            weight: pot.weight.unwrap_or(default_weight),
            ai_score: pot.score(),
        }
    }
}

// ==========================================
// BlendedChemistry - 加权混合成分
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendedChemistry {
    pub fe: f64,
    pub si: f64,
    pub vn: f64,
    pub cr: f64,
    pub ni: f64,
    pub total_weight: f64,
}

// ==========================================
// ConstraintViolation - 约束违规 (有序)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintViolation {
    PotCount { rule: PotCountRule, actual: usize },
    Element { element: Element, blended: f64, max: f64 },
    WeightOverMax { total_weight: f64, max: f64 },
    WeightUnderMin { total_weight: f64, min: f64 },
}

/// 受约束的化学元素
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    Fe,
    Si,
    Vn,
    Cr,
    Ni,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Fe => write!(f, "Fe"),
            Element::Si => write!(f, "Si"),
            Element::Vn => write!(f, "Vn"),
            Element::Cr => write!(f, "Cr"),
            Element::Ni => write!(f, "Ni"),
        }
    }
}

impl ConstraintViolation {
    /// 是否为槽数违规 (区别于成分/重量违规)
    pub fn is_pot_count(&self) -> bool {
        matches!(self, ConstraintViolation::PotCount { .. })
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::PotCount { rule, actual } => {
                let missing = rule.min().saturating_sub(*actual);
                if missing > 0 {
                    write!(f, "槽数不足: 需要{} (当前 {} 槽, 缺 {} 槽)", rule, actual, missing)
                } else {
                    write!(f, "槽数超限: 需要{} (当前 {} 槽)", rule, actual)
                }
            }
            ConstraintViolation::Element { element, blended, max } => {
                write!(f, "{} {:.4}% 超过上限 {}%", element, blended, max)
            }
            ConstraintViolation::WeightOverMax { total_weight, max } => {
                write!(f, "重量 {:.2} MT 超过上限 {} MT", total_weight, max)
            }
            ConstraintViolation::WeightUnderMin { total_weight, min } => {
                write!(f, "重量 {:.2} MT 低于下限 {} MT", total_weight, min)
            }
        }
    }
}

// ==========================================
// Batch - 出铝任务
// ==========================================
// 派生字段 (blend/constraints_met/violations/status) 仅由引擎重算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: String,
    pub target_grade: ProductGrade,
    pub assignments: Vec<PotAssignment>,

    // ===== 派生 =====
    pub blend: BlendedChemistry,
    pub constraints_met: bool,
    pub violations: Vec<ConstraintViolation>,
    pub status: BatchStatus,
}

impl Batch {
    /// 新建空任务 (派生字段由引擎首次重算)
    pub fn new(id: impl Into<String>, target_grade: ProductGrade) -> Self {
        Self {
            id: id.into(),
            target_grade,
            assignments: Vec::new(),
            blend: BlendedChemistry::default(),
            constraints_met: false,
            violations: Vec::new(),
            status: BatchStatus::Empty,
        }
    }

    pub fn pot_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn total_weight(&self) -> f64 {
        self.blend.total_weight
    }

    pub fn contains_pot(&self, pot_id: &str) -> bool {
        self.assignments.iter().any(|a| a.pot_id == pot_id)
    }

    pub fn pot_ids(&self) -> impl Iterator<Item = &str> {
        self.assignments.iter().map(|a| a.pot_id.as_str())
    }

    /// 违规信息 (人可读, 有序)
    pub fn violation_messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }
}
