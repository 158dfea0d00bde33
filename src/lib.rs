// ==========================================
// 电解铝出铝排产系统 - 核心库
// ==========================================
// 职责: 槽况评估 + 出铝配包 (可嵌入的库级引擎)
// 系统定位: 决策支持系统 (人工最终控制权)
// 红线: 无全局可变状态, 会话由调用方持有
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 阈值/产能/牌号约束
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AlertSeverity, AlertType, BatchStatus, FulfillmentStatus, ProductGrade, RiskLevel, Shift,
};

// 领域实体
pub use domain::{
    Alert, Batch, BlendedChemistry, CapacityConfig, ConstraintTable, ConstraintViolation,
    FleetHealthSummary, GradeConstraints, Pot, PotAssignment, PotCountRule, PotMetrics,
    ProductRequest, RequestFulfillment, ShiftSummary, TrendPoint,
};

// 引擎
pub use engine::{
    AlertDeriver, AllocationError, AllocationSession, AutoFillReport, ConstraintValidator,
    EligibilityFilter, HealthAssessor, HealthScorer, MutationOutcome, PlanReport, PotQuery,
    RiskClassifier, RuleViolation, SharedAllocationSession, ShiftSummaryAggregator,
};

// 配置
pub use config::{ConfigError, ConfigManager, PlannerConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "电解铝出铝排产系统";
