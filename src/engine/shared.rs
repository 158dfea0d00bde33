// ==========================================
// 电解铝出铝排产系统 - 共享配包会话
// ==========================================
// 职责: 多写者场景下串行化会话变更
// 红线: "检查未占用 → 占用" 必须在同一把锁内完成
// ==========================================

use crate::domain::summary::ProductRequest;
use crate::domain::types::ProductGrade;
use crate::engine::allocation::{AllocationSession, AutoFillReport, PlanReport, SessionSnapshot};
use crate::engine::error::{AllocationError, AllocationResult, MutationOutcome};
use std::sync::{Arc, Mutex};

/// 共享会话句柄 (克隆即共享同一会话)
#[derive(Debug, Clone)]
pub struct SharedAllocationSession {
    inner: Arc<Mutex<AllocationSession>>,
}

impl SharedAllocationSession {
    pub fn new(session: AllocationSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// 在锁内执行任意操作
    pub fn with_session<R>(&self, f: impl FnOnce(&mut AllocationSession) -> R) -> AllocationResult<R> {
        let mut session = self
            .inner
            .lock()
            .map_err(|e| AllocationError::LockPoisoned(e.to_string()))?;
        Ok(f(&mut session))
    }

    /// 只读快照 (锁外可自由并行使用)
    pub fn snapshot(&self) -> AllocationResult<SessionSnapshot> {
        self.with_session(|s| s.snapshot())
    }

    pub fn create_batch(&self, grade: ProductGrade) -> AllocationResult<MutationOutcome<String>> {
        self.with_session(|s| s.create_batch(grade))
    }

    pub fn add_pot_to_batch(&self, batch_id: &str, pot_id: &str) -> AllocationResult<MutationOutcome> {
        self.with_session(|s| s.add_pot_to_batch(batch_id, pot_id))?
    }

    pub fn remove_pot_from_batch(&self, batch_id: &str, pot_id: &str) -> AllocationResult<MutationOutcome> {
        self.with_session(|s| s.remove_pot_from_batch(batch_id, pot_id))?
    }

    pub fn auto_fill_all(&self) -> AllocationResult<Vec<AutoFillReport>> {
        self.with_session(|s| s.auto_fill_all())?
    }

    pub fn plan_from_requests(&self, requests: &[ProductRequest]) -> AllocationResult<PlanReport> {
        self.with_session(|s| s.plan_from_requests(requests))?
    }
}
