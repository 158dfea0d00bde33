// ==========================================
// 电解铝出铝排产系统 - 配包引擎错误类型
// ==========================================
// 两类错误:
// - RuleViolation: 业务规则拒绝 (预期内, 可恢复) → Ok(MutationOutcome::Rejected)
// - AllocationError: 调用契约错误 (调用方缺陷) → Err
// 红线: 被拒绝或失败的操作不得改变会话状态
// ==========================================

use crate::config::ConfigError;
use crate::domain::types::ProductGrade;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配包契约错误
#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("任务不存在: batch_id={0}")]
    UnknownBatch(String),

    #[error("电解槽不存在: pot_id={0}")]
    UnknownPot(String),

    #[error("牌号约束缺失: grade={grade}, batch_id={batch_id}")]
    MissingGradeConstraints { grade: ProductGrade, batch_id: String },

    #[error("占用索引不一致: pot_id={pot_id}, {message}")]
    ClaimIndexCorrupted { pot_id: String, message: String },

    #[error("槽出铝量无效: pot_id={pot_id}, weight={weight}")]
    InvalidPotWeight { pot_id: String, weight: f64 },

    #[error("配置无效: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("会话锁获取失败: {0}")]
    LockPoisoned(String),
}

/// 配包引擎结果类型
pub type AllocationResult<T> = Result<T, AllocationError>;

/// 业务规则拒绝原因
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleViolation {
    #[error("POT_ALREADY_ASSIGNED: 槽 {pot_id} 已在任务 {batch_id} 中")]
    PotAlreadyAssigned { pot_id: String, batch_id: String },

    #[error("GRADE_NOT_CONFIGURED: 牌号 {grade} 未配置约束")]
    GradeNotConfigured { grade: ProductGrade },

    #[error("BATCH_AT_CAPACITY: 任务 {batch_id} 已满 {max} 槽")]
    BatchAtCapacity { batch_id: String, max: usize },

    #[error("WEIGHT_LIMIT_EXCEEDED: 任务 {batch_id} 重量 {projected:.2} MT 将超过上限 {max} MT")]
    WeightWouldOverflow { batch_id: String, projected: f64, max: f64 },

    #[error("SHIFT_AT_CAPACITY: 本班已有 {max} 个任务")]
    ShiftAtCapacity { max: usize },

    #[error("DUPLICATE_POT: 槽 {pot_id} 重复出现")]
    DuplicatePot { pot_id: String },
}

/// 变更操作结果
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T = ()> {
    /// 已执行
    Applied(T),
    /// 无变化 (如移除不在任务中的槽)
    NoChange,
    /// 业务规则拒绝, 状态未变
    Rejected(RuleViolation),
}

impl<T> MutationOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, MutationOutcome::Rejected(_))
    }

    pub fn violation(&self) -> Option<&RuleViolation> {
        match self {
            MutationOutcome::Rejected(v) => Some(v),
            _ => None,
        }
    }

    /// 取出执行结果
    pub fn applied(self) -> Option<T> {
        match self {
            MutationOutcome::Applied(value) => Some(value),
            _ => None,
        }
    }
}
