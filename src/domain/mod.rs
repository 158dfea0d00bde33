// ==========================================
// 电解铝出铝排产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、封闭枚举、牌号约束表
// 红线: 不含引擎逻辑, 派生字段只由引擎重算
// ==========================================

pub mod alert;
pub mod batch;
pub mod capacity;
pub mod grade;
pub mod pot;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use alert::{Alert, AlertCounts};
pub use batch::{Batch, BlendedChemistry, ConstraintViolation, Element, PotAssignment};
pub use capacity::{CapacityConfig, PotCountRule};
pub use grade::{ConstraintTable, GradeConstraints};
pub use pot::{Pot, PotMetrics, TrendPoint, MAX_TREND_POINTS};
pub use summary::{FleetHealthSummary, ProductRequest, RequestFulfillment, ShiftSummary};
pub use types::{
    AlertSeverity, AlertType, BatchStatus, FulfillmentStatus, ProductGrade, RiskLevel, Shift,
};
