// ==========================================
// 电解铝出铝排产系统 - 槽况告警模型
// ==========================================
// 红线: 告警只读派生, 不回写槽状态
// ==========================================

use crate::domain::types::{AlertSeverity, AlertType};
use serde::{Deserialize, Serialize};

/// 槽况告警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub pot_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub description: String,
}

/// 按严重度计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertCounts {
    pub critical: usize,
    pub high: usize,
    pub moderate: usize,
}

impl AlertCounts {
    pub fn total(&self) -> usize {
        self.critical + self.high + self.moderate
    }
}
