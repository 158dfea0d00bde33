// ==========================================
// 电解铝出铝排产系统 - 领域类型定义
// ==========================================
// 职责: 槽况等级、产品牌号、出铝任务状态等封闭枚举
// 红线: 等级制,不是字符串; 新增取值必须在所有 match 处显式处理
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 槽况风险等级 (Risk Level)
// ==========================================
// 严重程度: Critical > High > Moderate > Normal
// Shutdown 为独立终态(停槽), 不由阈值推导
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Critical, // 危险
    High,     // 高
    Moderate, // 关注
    Normal,   // 正常
    Shutdown, // 停槽
}

impl RiskLevel {
    /// 全部等级(固定顺序, 用于汇总)
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Moderate,
        RiskLevel::Normal,
        RiskLevel::Shutdown,
    ];

    /// 严重度序号 (越大越严重)
    ///
    /// # 返回
    /// - `Some(rank)`: 运行中槽的严重度
    /// - `None`: 停槽, 不参与严重度排序
    pub fn severity_rank(&self) -> Option<u8> {
        match self {
            RiskLevel::Normal => Some(0),
            RiskLevel::Moderate => Some(1),
            RiskLevel::High => Some(2),
            RiskLevel::Critical => Some(3),
            RiskLevel::Shutdown => None,
        }
    }

    /// 是否高于正常 (停槽不算)
    pub fn is_above_normal(&self) -> bool {
        matches!(self.severity_rank(), Some(rank) if rank > 0)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Critical => write!(f, "critical"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Moderate => write!(f, "moderate"),
            RiskLevel::Normal => write!(f, "normal"),
            RiskLevel::Shutdown => write!(f, "shutdown"),
        }
    }
}

// ==========================================
// 产品牌号 (Product Grade)
// ==========================================
// 规划优先级: PFA-NT(1) > Wire Rod H-EC(2) > Billet(3) > P1020(4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductGrade {
    #[serde(rename = "PFA-NT")]
    PfaNt,
    #[serde(rename = "Wire Rod H-EC")]
    WireRodHec,
    #[serde(rename = "Billet")]
    Billet,
    #[serde(rename = "P1020")]
    P1020,
}

impl ProductGrade {
    /// 全部牌号 (按规划优先级排列)
    pub const ALL: [ProductGrade; 4] = [
        ProductGrade::PfaNt,
        ProductGrade::WireRodHec,
        ProductGrade::Billet,
        ProductGrade::P1020,
    ];

    /// 规划优先级 (越小越先排)
    pub fn priority(&self) -> u8 {
        match self {
            ProductGrade::PfaNt => 1,
            ProductGrade::WireRodHec => 2,
            ProductGrade::Billet => 3,
            ProductGrade::P1020 => 4,
        }
    }
}

impl fmt::Display for ProductGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductGrade::PfaNt => write!(f, "PFA-NT"),
            ProductGrade::WireRodHec => write!(f, "Wire Rod H-EC"),
            ProductGrade::Billet => write!(f, "Billet"),
            ProductGrade::P1020 => write!(f, "P1020"),
        }
    }
}

// ==========================================
// 出铝任务状态 (Batch Status)
// ==========================================
// Empty → Incomplete → Draft → Ready
// - Incomplete: 槽数低于下限
// - Draft: 槽数满足, 但成分/重量约束不满足
// - Ready: 全部约束满足
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Empty,
    Incomplete,
    Draft,
    Ready,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Empty => write!(f, "EMPTY"),
            BatchStatus::Incomplete => write!(f, "INCOMPLETE"),
            BatchStatus::Draft => write!(f, "DRAFT"),
            BatchStatus::Ready => write!(f, "READY"),
        }
    }
}

// ==========================================
// 告警类型 / 严重度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    FeHigh,
    SiHigh,
    TempHigh,
    TempLow,
    AeFrequency,
    Prediction,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::FeHigh => write!(f, "fe_high"),
            AlertType::SiHigh => write!(f, "si_high"),
            AlertType::TempHigh => write!(f, "temp_high"),
            AlertType::TempLow => write!(f, "temp_low"),
            AlertType::AeFrequency => write!(f, "ae_frequency"),
            AlertType::Prediction => write!(f, "prediction"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    High,
    Moderate,
}

impl AlertSeverity {
    /// 由槽况等级映射告警严重度
    ///
    /// # 返回
    /// 正常/停槽返回 None (不产生告警)
    pub fn from_risk(level: RiskLevel) -> Option<Self> {
        match level {
            RiskLevel::Critical => Some(AlertSeverity::Critical),
            RiskLevel::High => Some(AlertSeverity::High),
            RiskLevel::Moderate => Some(AlertSeverity::Moderate),
            RiskLevel::Normal | RiskLevel::Shutdown => None,
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Critical => write!(f, "critical"),
            AlertSeverity::High => write!(f, "high"),
            AlertSeverity::Moderate => write!(f, "moderate"),
        }
    }
}

// ==========================================
// 需求满足状态 (Fulfillment Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStatus {
    Pending,   // 未分配
    Partial,   // 部分分配
    Fulfilled, // 刚好满足
    Exceeded,  // 超额
}

impl FulfillmentStatus {
    /// 由需要/已分配任务数推导
    pub fn derive(tasks_needed: usize, tasks_assigned: usize) -> Self {
        if tasks_assigned == 0 {
            FulfillmentStatus::Pending
        } else if tasks_assigned < tasks_needed {
            FulfillmentStatus::Partial
        } else if tasks_assigned > tasks_needed {
            FulfillmentStatus::Exceeded
        } else {
            FulfillmentStatus::Fulfilled
        }
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FulfillmentStatus::Pending => write!(f, "pending"),
            FulfillmentStatus::Partial => write!(f, "partial"),
            FulfillmentStatus::Fulfilled => write!(f, "fulfilled"),
            FulfillmentStatus::Exceeded => write!(f, "exceeded"),
        }
    }
}

// ==========================================
// 班次 (Shift)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Shift {
    Am,
    Pm,
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Am => write!(f, "AM"),
            Shift::Pm => write!(f, "PM"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_priority_order() {
        let mut grades = vec![ProductGrade::P1020, ProductGrade::Billet, ProductGrade::PfaNt];
        grades.sort_by_key(|g| g.priority());
        assert_eq!(grades[0], ProductGrade::PfaNt);
        assert_eq!(grades[2], ProductGrade::P1020);
    }

    #[test]
    fn test_grade_serde_uses_plant_names() {
        let json = serde_json::to_string(&ProductGrade::WireRodHec).unwrap();
        assert_eq!(json, "\"Wire Rod H-EC\"");
        let back: ProductGrade = serde_json::from_str("\"PFA-NT\"").unwrap();
        assert_eq!(back, ProductGrade::PfaNt);
    }

    #[test]
    fn test_fulfillment_status_derive() {
        assert_eq!(FulfillmentStatus::derive(3, 0), FulfillmentStatus::Pending);
        assert_eq!(FulfillmentStatus::derive(3, 2), FulfillmentStatus::Partial);
        assert_eq!(FulfillmentStatus::derive(3, 3), FulfillmentStatus::Fulfilled);
        assert_eq!(FulfillmentStatus::derive(3, 4), FulfillmentStatus::Exceeded);
    }

    #[test]
    fn test_shutdown_has_no_severity_rank() {
        assert_eq!(RiskLevel::Shutdown.severity_rank(), None);
        assert!(!RiskLevel::Shutdown.is_above_normal());
        assert!(RiskLevel::Moderate.is_above_normal());
        assert!(!RiskLevel::Normal.is_above_normal());
    }
}
