// ==========================================
// 电解铝出铝排产系统 - 引擎层
// ==========================================
// 职责: 槽况分级/评分/告警 + 配包约束校验 + 配包会话
// 红线: 只读引擎不修改槽; 配包规则拒绝必须输出原因
// ==========================================

pub mod alert_deriver;
pub mod allocation;
pub mod assessment;
pub mod blend;
pub mod classifier;
pub mod constraint_validator;
pub mod eligibility;
pub mod error;
pub mod health_scorer;
pub mod shared;
pub mod shift_summary;

// 重导出核心引擎
pub use alert_deriver::AlertDeriver;
pub use allocation::{AllocationSession, AutoFillReport, PlanReport, SessionSnapshot, ShiftPlan};
pub use assessment::{summarize_fleet, HealthAssessor};
pub use blend::blend;
pub use classifier::RiskClassifier;
pub use constraint_validator::{ConstraintValidator, ValidationOutcome};
pub use eligibility::{EligibilityFilter, PotQuery};
pub use error::{AllocationError, AllocationResult, MutationOutcome, RuleViolation};
pub use health_scorer::{HealthScorer, ScoreBreakdown};
pub use shared::SharedAllocationSession;
pub use shift_summary::ShiftSummaryAggregator;
