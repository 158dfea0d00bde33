// ==========================================
// 电解铝出铝排产系统 - 配包引擎
// ==========================================
// 职责: 配包会话状态机 + 自动补槽 + 需求驱动规划
// 红线: 会话由调用方持有, 无全局可变状态
// ==========================================

pub mod auto_fill;
pub mod planning;
pub mod session;

pub use auto_fill::AutoFillReport;
pub use planning::PlanReport;
pub use session::{AllocationSession, SessionSnapshot, ShiftPlan};
