// ==========================================
// 电解铝出铝排产系统 - 槽况告警派生引擎
// ==========================================
// 职责: 由已评估槽派生可执行告警
// 输入: 已评估槽列表
// 输出: 告警列表 (按槽顺序, 每槽按维度固定顺序)
// 红线: 只读, 不修改槽状态; 相同输入多次调用结果一致
// ==========================================

use crate::config::planner_config::{AlertRules, RiskThresholds};
use crate::domain::alert::{Alert, AlertCounts};
use crate::domain::pot::Pot;
use crate::domain::types::{AlertSeverity, AlertType, RiskLevel};

// ==========================================
// AlertDeriver - 告警派生引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AlertDeriver {
    thresholds: RiskThresholds,
    rules: AlertRules,
}

impl AlertDeriver {
    pub fn new(thresholds: RiskThresholds, rules: AlertRules) -> Self {
        Self { thresholds, rules }
    }

    /// 派生全部告警
    pub fn derive(&self, pots: &[Pot]) -> Vec<Alert> {
        pots.iter().flat_map(|p| self.derive_for_pot(p)).collect()
    }

    /// 派生单槽告警
    ///
    /// 仅处理高于 Normal 的运行槽; 每个违规维度一条
    pub fn derive_for_pot(&self, pot: &Pot) -> Vec<Alert> {
        let level = match pot.risk_level {
            Some(level) => level,
            None => return Vec::new(),
        };
        let severity = match AlertSeverity::from_risk(level) {
            Some(s) => s,
            None => return Vec::new(),
        };

        self.violated_dimensions(pot, level)
            .into_iter()
            .map(|alert_type| Alert {
                id: format!("ALT-{}-{}", pot.id, alert_type),
                pot_id: pot.id.clone(),
                alert_type,
                severity,
                description: describe(alert_type, pot),
            })
            .collect()
    }

    /// 违规维度 (固定顺序)
    fn violated_dimensions(&self, pot: &Pot, level: RiskLevel) -> Vec<AlertType> {
        let m = &pot.metrics;
        let t = &self.thresholds;
        let mut types = Vec::new();

        if m.fe >= t.fe_moderate {
            types.push(AlertType::FeHigh);
        }
        if m.si >= t.si_moderate {
            types.push(AlertType::SiHigh);
        }
        if m.temperature > t.temperature_band.max {
            types.push(AlertType::TempHigh);
        }
        if m.temperature < t.temperature_band.min {
            types.push(AlertType::TempLow);
        }
        if m.ae_frequency > 0.0 {
            types.push(AlertType::AeFrequency);
        }
        // 预测告警: 已是 Critical 的槽不再重复预测
        if level != RiskLevel::Critical
            && (pot.score() < self.rules.prediction_score_below
                || m.fe_slope > self.rules.prediction_fe_slope_above)
        {
            types.push(AlertType::Prediction);
        }
        types
    }

    /// 按严重度计数
    pub fn count_by_severity(alerts: &[Alert]) -> AlertCounts {
        alerts.iter().fold(AlertCounts::default(), |mut acc, a| {
            match a.severity {
                AlertSeverity::Critical => acc.critical += 1,
                AlertSeverity::High => acc.high += 1,
                AlertSeverity::Moderate => acc.moderate += 1,
            }
            acc
        })
    }
}

fn describe(alert_type: AlertType, pot: &Pot) -> String {
    let m = &pot.metrics;
    match alert_type {
        AlertType::FeHigh => format!("铁含量 {:.3}% 超过阈值, 建议立即检查阴极", m.fe),
        AlertType::SiHigh => format!("硅含量 {:.3}% 超过阈值, 检查原料污染", m.si),
        AlertType::TempHigh => format!("电解质温度 {:.1}°C 高于正常区间, 检查热平衡", m.temperature),
        AlertType::TempLow => format!("电解质温度 {:.1}°C 低于正常区间, 检查供电", m.temperature),
        AlertType::AeFrequency => format!("阳极效应 {} 次, 检查氧化铝下料", m.ae_frequency),
        AlertType::Prediction => format!(
            "评分 {:.1} / Fe 斜率 {:.5}, 预计槽况继续恶化, 建议预防性处理",
            pot.score(),
            m.fe_slope
        ),
    }
}
