// ==========================================
// 电解铝出铝排产系统 - 牌号约束表
// ==========================================
// 职责: 每个产品牌号的成分上限 (纯数据, 无逻辑)
// 红线: 微量元素上限缺省 = 不约束, 不是 0
// ==========================================

use crate::domain::types::ProductGrade;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// GradeConstraints - 单牌号约束
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeConstraints {
    pub max_fe: f64,
    pub max_si: f64,
    #[serde(default)]
    pub max_vn: Option<f64>,
    #[serde(default)]
    pub max_cr: Option<f64>,
    #[serde(default)]
    pub max_ni: Option<f64>,
}

impl GradeConstraints {
    /// 仅 Fe/Si 约束
    pub fn new(max_fe: f64, max_si: f64) -> Self {
        Self {
            max_fe,
            max_si,
            max_vn: None,
            max_cr: None,
            max_ni: None,
        }
    }

    /// 附加微量元素约束
    pub fn with_trace(mut self, max_vn: f64, max_cr: f64, max_ni: f64) -> Self {
        self.max_vn = Some(max_vn);
        self.max_cr = Some(max_cr);
        self.max_ni = Some(max_ni);
        self
    }

    /// 单槽瞬时 Fe/Si 是否满足 (配包必要非充分条件)
    pub fn admits(&self, fe: f64, si: f64) -> bool {
        fe <= self.max_fe && si <= self.max_si
    }

    /// 全部已配置上限 (名称, 值)
    pub(crate) fn limits(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("maxFe", Some(self.max_fe)),
            ("maxSi", Some(self.max_si)),
            ("maxVn", self.max_vn),
            ("maxCr", self.max_cr),
            ("maxNi", self.max_ni),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

// ==========================================
// ConstraintTable - 牌号约束表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintTable {
    grades: BTreeMap<ProductGrade, GradeConstraints>,
}

impl ConstraintTable {
    /// 空表
    pub fn empty() -> Self {
        Self {
            grades: BTreeMap::new(),
        }
    }

    pub fn with_grade(mut self, grade: ProductGrade, constraints: GradeConstraints) -> Self {
        self.grades.insert(grade, constraints);
        self
    }

    pub fn insert(&mut self, grade: ProductGrade, constraints: GradeConstraints) {
        self.grades.insert(grade, constraints);
    }

    pub fn get(&self, grade: ProductGrade) -> Option<&GradeConstraints> {
        self.grades.get(&grade)
    }

    pub fn contains(&self, grade: ProductGrade) -> bool {
        self.grades.contains_key(&grade)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductGrade, &GradeConstraints)> {
        self.grades.iter()
    }
}

impl Default for ConstraintTable {
    /// 厂内牌号标准
    fn default() -> Self {
        Self::empty()
            .with_grade(
                ProductGrade::PfaNt,
                GradeConstraints::new(0.075, 0.05).with_trace(0.0015, 0.001, 0.0005),
            )
            .with_grade(
                ProductGrade::WireRodHec,
                GradeConstraints::new(0.100, 0.05).with_trace(0.002, 0.0015, 0.001),
            )
            .with_grade(
                ProductGrade::Billet,
                GradeConstraints::new(0.100, 0.10).with_trace(0.003, 0.002, 0.002),
            )
            .with_grade(
                ProductGrade::P1020,
                GradeConstraints::new(0.100, 0.10).with_trace(0.005, 0.005, 0.005),
            )
    }
}
