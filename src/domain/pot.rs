// ==========================================
// 电解铝出铝排产系统 - 电解槽领域模型
// ==========================================
// 职责: 电解槽身份、瞬时指标、历史趋势
// 红线: 配包引擎只读槽数据,不修改指标
// ==========================================

use crate::domain::types::RiskLevel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 趋势序列最大长度 (天)
pub const MAX_TREND_POINTS: usize = 30;

// ==========================================
// PotMetrics - 槽况瞬时指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotMetrics {
    // ===== 成分 (质量分数 %) =====
    pub fe: f64,
    pub si: f64,
    #[serde(default)]
    pub vn: f64,
    #[serde(default)]
    pub cr: f64,
    #[serde(default)]
    pub ni: f64,

    // ===== 热工/电气 =====
    pub temperature: f64,  // 电解质温度 (°C)
    pub voltage: f64,      // 槽电压 (V)
    pub molar_ratio: f64,  // 分子比

    // ===== 效应与趋势 =====
    pub ae_frequency: f64, // 阳极效应次数
    #[serde(default)]
    pub fe_slope: f64,     // Fe 一阶差分斜率 (每天)
    #[serde(default)]
    pub si_slope: f64,     // Si 一阶差分斜率 (每天)
}

// ==========================================
// TrendPoint - 历史快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub fe: f64,
    pub si: f64,
    pub temperature: f64,
    pub voltage: f64,
    #[serde(default)]
    pub ai_score: Option<f64>,
}

// ==========================================
// Pot - 电解槽
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pot {
    // ===== 身份 =====
    pub id: String,
    pub phase: u8,
    pub area: String,
    pub position: u32,

    // ===== 指标 =====
    pub metrics: PotMetrics,
    #[serde(default)]
    pub trend: Vec<TrendPoint>,
    #[serde(default)]
    pub age: u32, // 槽龄 (天)

    /// 预估出铝量 (MT); 缺省时取产能配置的默认槽重
    #[serde(default)]
    pub weight: Option<f64>,

    // ===== 派生 (可由外部预置) =====
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub ai_score: Option<f64>,
}

impl Pot {
    /// 构造函数 (未评估状态)
    pub fn new(id: impl Into<String>, phase: u8, area: impl Into<String>, position: u32, metrics: PotMetrics) -> Self {
        Self {
            id: id.into(),
            phase,
            area: area.into(),
            position,
            metrics,
            trend: Vec::new(),
            age: 0,
            weight: None,
            risk_level: None,
            ai_score: None,
        }
    }

    /// 是否已停槽
    pub fn is_shutdown(&self) -> bool {
        self.risk_level == Some(RiskLevel::Shutdown)
    }

    /// 评分 (未评估视为 0)
    pub fn score(&self) -> f64 {
        self.ai_score.unwrap_or(0.0)
    }

    /// 追加趋势点, 超出上限时淘汰最旧点
    pub fn push_trend(&mut self, point: TrendPoint) {
        self.trend.push(point);
        if self.trend.len() > MAX_TREND_POINTS {
            let overflow = self.trend.len() - MAX_TREND_POINTS;
            self.trend.drain(..overflow);
        }
    }

    /// 由趋势序列重算 Fe/Si 斜率 (一阶差分均值)
    ///
    /// 趋势点少于 2 个时保持原值
    pub fn refresh_slopes(&mut self) {
        if let Some(slope) = mean_first_difference(self.trend.iter().map(|p| p.fe)) {
            self.metrics.fe_slope = slope;
        }
        if let Some(slope) = mean_first_difference(self.trend.iter().map(|p| p.si)) {
            self.metrics.si_slope = slope;
        }
    }
}

/// 一阶差分均值: (last - first) / (n - 1)
fn mean_first_difference(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut first = None;
    let mut last = 0.0;
    let mut count = 0usize;
    for v in values {
        if first.is_none() {
            first = Some(v);
        }
        last = v;
        count += 1;
    }
    match (first, count) {
        (Some(first), n) if n >= 2 => Some((last - first) / (n - 1) as f64),
        _ => None,
    }
}
