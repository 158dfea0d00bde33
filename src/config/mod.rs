// ==========================================
// 电解铝出铝排产系统 - 配置层
// ==========================================
// 职责: 规划配置定义、加载与校验
// 存储: JSON (serde 缺省回填)
// ==========================================

pub mod config_manager;
pub mod error;
pub mod planner_config;

// 重导出核心配置
pub use config_manager::ConfigManager;
pub use error::{ConfigError, ConfigResult};
pub use planner_config::{
    AlertRules, Band, BandDeduction, DeductionTier, PlannerConfig, RiskThresholds, ScoreDeductions,
    TierTable,
};
