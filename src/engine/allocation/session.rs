// ==========================================
// 电解铝出铝排产系统 - 配包会话 (状态机)
// ==========================================
// 职责: 持有槽池 + 任务列表 + 占用索引, 提供人工增删改
// 输入: 槽记录 + 牌号约束表 + 产能配置
// 输出: 任务 (混合成分/约束/状态) + 班次汇总
// 红线:
// - 同一槽号最多出现在一个任务中 (互斥)
// - 每次变更后从头重算混合成分、约束、状态与汇总
// - 被拒绝或失败的变更不改变任何状态
// ==========================================

use crate::config::planner_config::{validate_capacity, validate_grades, PlannerConfig};
use crate::domain::batch::{Batch, PotAssignment};
use crate::domain::capacity::CapacityConfig;
use crate::domain::grade::{ConstraintTable, GradeConstraints};
use crate::domain::pot::Pot;
use crate::domain::summary::{FleetHealthSummary, ShiftSummary};
use crate::domain::types::{ProductGrade, Shift};
use crate::engine::assessment::{summarize_fleet, HealthAssessor};
use crate::engine::blend::blend;
use crate::engine::constraint_validator::ConstraintValidator;
use crate::engine::eligibility::{sort_by_score, EligibilityFilter};
use crate::engine::error::{AllocationError, AllocationResult, MutationOutcome, RuleViolation};
use crate::engine::shift_summary::ShiftSummaryAggregator;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

// ==========================================
// ShiftPlan - 班次标识
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPlan {
    pub date: NaiveDate,
    pub shift: Shift,
}

impl ShiftPlan {
    pub fn new(date: NaiveDate, shift: Shift) -> Self {
        Self { date, shift }
    }
}

/// 会话只读快照 (供展示层/并行只读计算)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub shift_plan: ShiftPlan,
    pub batches: Vec<Batch>,
    pub summary: ShiftSummary,
}

// ==========================================
// AllocationSession - 配包会话
// ==========================================
#[derive(Debug, Clone)]
pub struct AllocationSession {
    session_id: Uuid,
    shift_plan: ShiftPlan,

    // ===== 输入 =====
    pub(super) pots: BTreeMap<String, Pot>,
    pub(super) grades: ConstraintTable,
    pub(super) capacity: CapacityConfig,

    // ===== 状态 =====
    pub(super) batches: Vec<Batch>,
    /// 占用索引: pot_id → batch_id
    pub(super) claims: HashMap<String, String>,
    pub(super) next_seq: usize,
    pub(super) summary: ShiftSummary,

    // ===== 引擎 =====
    pub(super) validator: ConstraintValidator,
    pub(super) eligibility: EligibilityFilter,
    aggregator: ShiftSummaryAggregator,
}

/// 回滚点 (批量操作失败时恢复)
pub(super) struct Checkpoint {
    batches: Vec<Batch>,
    claims: HashMap<String, String>,
    next_seq: usize,
    summary: ShiftSummary,
}

impl AllocationSession {
    /// 由配置创建会话 (缺失等级/评分的槽先评估)
    pub fn new(pots: Vec<Pot>, config: &PlannerConfig) -> AllocationResult<Self> {
        config.validate()?;
        Self::with_parts(
            pots,
            config.grades.clone(),
            config.capacity.clone(),
            &HealthAssessor::from_config(config),
        )
    }

    /// 创建会话
    ///
    /// # 参数
    /// - `pots`: 槽记录 (重复槽号以后者为准)
    /// - `grades`: 牌号约束表
    /// - `capacity`: 产能配置
    /// - `assessor`: 槽况评估流水线
    ///
    /// # 错误
    /// - 产能/牌号配置未通过校验 (InvalidConfig)
    /// - 槽出铝量非有限正数 (InvalidPotWeight)
    #[instrument(skip_all, fields(pots_count = pots.len()))]
    pub fn with_parts(
        pots: Vec<Pot>,
        grades: ConstraintTable,
        capacity: CapacityConfig,
        assessor: &HealthAssessor,
    ) -> AllocationResult<Self> {
        validate_capacity(&capacity)?;
        validate_grades(&grades)?;
        for pot in &pots {
            if let Some(weight) = pot.weight {
                if !weight.is_finite() || weight <= 0.0 {
                    return Err(AllocationError::InvalidPotWeight {
                        pot_id: pot.id.clone(),
                        weight,
                    });
                }
            }
        }

        let mut pool = BTreeMap::new();
        for pot in assessor.assess_all(pots) {
            if let Some(previous) = pool.insert(pot.id.clone(), pot) {
                warn!(pot_id = %previous.id, "槽号重复, 以后出现的记录为准");
            }
        }

        let aggregator = ShiftSummaryAggregator::new();
        let summary = aggregator.summarize(&[], &capacity);
        let session = Self {
            session_id: Uuid::new_v4(),
            shift_plan: ShiftPlan::new(Local::now().date_naive(), Shift::Am),
            pots: pool,
            grades,
            capacity,
            batches: Vec::new(),
            claims: HashMap::new(),
            next_seq: 1,
            summary,
            validator: ConstraintValidator::new(),
            eligibility: EligibilityFilter::new(),
            aggregator,
        };
        debug!(session_id = %session.session_id, pots = session.pots.len(), "配包会话已创建");
        Ok(session)
    }

    /// 指定班次
    pub fn with_shift_plan(mut self, shift_plan: ShiftPlan) -> Self {
        self.shift_plan = shift_plan;
        self
    }

    // ==========================================
    // 只读查询
    // ==========================================

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn shift_plan(&self) -> ShiftPlan {
        self.shift_plan
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batch(&self, batch_id: &str) -> Option<&Batch> {
        self.batches.iter().find(|b| b.id == batch_id)
    }

    pub fn pots(&self) -> impl Iterator<Item = &Pot> {
        self.pots.values()
    }

    pub fn pot(&self, pot_id: &str) -> Option<&Pot> {
        self.pots.get(pot_id)
    }

    /// 槽当前所在任务
    pub fn assignment_of(&self, pot_id: &str) -> Option<&str> {
        self.claims.get(pot_id).map(String::as_str)
    }

    /// 未占用槽 (评分降序, 槽号升序)
    pub fn unassigned_pots(&self) -> Vec<&Pot> {
        let mut pots: Vec<&Pot> = self
            .pots
            .values()
            .filter(|p| !self.claims.contains_key(&p.id))
            .collect();
        sort_by_score(&mut pots);
        pots
    }

    pub fn summary(&self) -> &ShiftSummary {
        &self.summary
    }

    pub fn fleet_summary(&self) -> FleetHealthSummary {
        summarize_fleet(self.pots.values())
    }

    pub fn capacity(&self) -> &CapacityConfig {
        &self.capacity
    }

    pub fn grades(&self) -> &ConstraintTable {
        &self.grades
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            shift_plan: self.shift_plan,
            batches: self.batches.clone(),
            summary: self.summary.clone(),
        }
    }

    // ==========================================
    // 任务增删
    // ==========================================

    /// 新建空任务
    ///
    /// # 返回
    /// - `Applied(batch_id)`
    /// - `Rejected(GradeNotConfigured | ShiftAtCapacity)`
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn create_batch(&mut self, grade: ProductGrade) -> MutationOutcome<String> {
        let constraints = match self.grades.get(grade) {
            Some(c) => c.clone(),
            None => return self.reject(RuleViolation::GradeNotConfigured { grade }),
        };
        if self.batches.len() >= self.capacity.max_batches_per_shift {
            return self.reject(RuleViolation::ShiftAtCapacity {
                max: self.capacity.max_batches_per_shift,
            });
        }

        let batch = self.new_batch(grade, &constraints);
        let id = batch.id.clone();
        self.batches.push(batch);
        self.refresh_summary();
        debug!(batch_id = %id, grade = %grade, "任务已创建");
        MutationOutcome::Applied(id)
    }

    /// 删除任务, 释放全部槽
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn remove_batch(&mut self, batch_id: &str) -> AllocationResult<Batch> {
        let idx = self.batch_index(batch_id)?;
        let batch = self.batches.remove(idx);
        for pot_id in batch.pot_ids() {
            self.claims.remove(pot_id);
        }
        self.refresh_summary();
        debug!(batch_id, released = batch.pot_count(), "任务已删除");
        Ok(batch)
    }

    /// 清空全部任务
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn clear_all(&mut self) {
        let released = self.claims.len();
        self.batches.clear();
        self.claims.clear();
        self.next_seq = 1;
        self.refresh_summary();
        debug!(released, "全部任务已清空");
    }

    // ==========================================
    // 槽分配变更
    // ==========================================

    /// 向任务追加一槽
    ///
    /// # 拒绝条件
    /// - 槽已在任一任务中 (PotAlreadyAssigned)
    /// - 任务已达槽数上限 (BatchAtCapacity)
    /// - 追加后重量超上限 (WeightWouldOverflow)
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn add_pot_to_batch(&mut self, batch_id: &str, pot_id: &str) -> AllocationResult<MutationOutcome> {
        let idx = self.batch_index(batch_id)?;
        let pot = self
            .pots
            .get(pot_id)
            .ok_or_else(|| AllocationError::UnknownPot(pot_id.to_string()))?;

        if let Some(owner) = self.claims.get(pot_id) {
            return Ok(self.reject(RuleViolation::PotAlreadyAssigned {
                pot_id: pot_id.to_string(),
                batch_id: owner.clone(),
            }));
        }

        let batch = &self.batches[idx];
        let max = self.capacity.pots_per_batch.max();
        if batch.pot_count() >= max {
            return Ok(self.reject(RuleViolation::BatchAtCapacity {
                batch_id: batch_id.to_string(),
                max,
            }));
        }

        let assignment = PotAssignment::snapshot(pot, self.capacity.default_pot_weight);
        if !self.capacity.can_add_weight(batch.total_weight(), assignment.weight) {
            return Ok(self.reject(RuleViolation::WeightWouldOverflow {
                batch_id: batch_id.to_string(),
                projected: batch.total_weight() + assignment.weight,
                max: self.capacity.max_weight_per_batch,
            }));
        }

        let mut next = batch.clone();
        next.assignments.push(assignment);
        self.refresh_batch(&mut next)?;
        self.commit_batch(idx, next);
        debug!(batch_id, pot_id, "槽已加入任务");
        Ok(MutationOutcome::Applied(()))
    }

    /// 从任务移除一槽
    ///
    /// 槽不在该任务中时返回 NoChange, 任务不变
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn remove_pot_from_batch(&mut self, batch_id: &str, pot_id: &str) -> AllocationResult<MutationOutcome> {
        let idx = self.batch_index(batch_id)?;
        if !self.pots.contains_key(pot_id) {
            return Err(AllocationError::UnknownPot(pot_id.to_string()));
        }
        if !self.batches[idx].contains_pot(pot_id) {
            debug!(batch_id, pot_id, "槽不在任务中, 无变化");
            return Ok(MutationOutcome::NoChange);
        }

        let mut next = self.batches[idx].clone();
        next.assignments.retain(|a| a.pot_id != pot_id);
        self.refresh_batch(&mut next)?;
        self.commit_batch(idx, next);
        debug!(batch_id, pot_id, "槽已移出任务");
        Ok(MutationOutcome::Applied(()))
    }

    /// 整体替换任务的槽列表
    ///
    /// 仅互斥/重复槽号会被拒绝; 槽数或重量超限不拒绝, 由约束校验标记为违规。
    /// 已在本任务中的槽保留原入包快照。
    #[instrument(skip(self, pot_ids), fields(session_id = %self.session_id, pots_count = pot_ids.len()))]
    pub fn replace_batch_pots<S: AsRef<str>>(
        &mut self,
        batch_id: &str,
        pot_ids: &[S],
    ) -> AllocationResult<MutationOutcome> {
        let idx = self.batch_index(batch_id)?;

        let mut seen = HashSet::new();
        for pot_id in pot_ids.iter().map(AsRef::as_ref) {
            if !self.pots.contains_key(pot_id) {
                return Err(AllocationError::UnknownPot(pot_id.to_string()));
            }
            if !seen.insert(pot_id) {
                return Ok(self.reject(RuleViolation::DuplicatePot {
                    pot_id: pot_id.to_string(),
                }));
            }
            if let Some(owner) = self.claims.get(pot_id) {
                if owner != batch_id {
                    return Ok(self.reject(RuleViolation::PotAlreadyAssigned {
                        pot_id: pot_id.to_string(),
                        batch_id: owner.clone(),
                    }));
                }
            }
        }

        let current = &self.batches[idx];
        let assignments = pot_ids
            .iter()
            .map(AsRef::as_ref)
            .map(|pot_id| {
                current
                    .assignments
                    .iter()
                    .find(|a| a.pot_id == pot_id)
                    .cloned()
                    .or_else(|| {
                        self.pots
                            .get(pot_id)
                            .map(|p| PotAssignment::snapshot(p, self.capacity.default_pot_weight))
                    })
                    .ok_or_else(|| AllocationError::UnknownPot(pot_id.to_string()))
            })
            .collect::<AllocationResult<Vec<_>>>()?;

        let mut next = current.clone();
        next.assignments = assignments;
        self.refresh_batch(&mut next)?;
        self.commit_batch(idx, next);
        debug!(batch_id, pots = pot_ids.len(), "任务槽列表已替换");
        Ok(MutationOutcome::Applied(()))
    }

    // ==========================================
    // 配置变更
    // ==========================================

    /// 替换产能配置并重算全部任务
    #[instrument(skip(self, capacity), fields(session_id = %self.session_id))]
    pub fn update_capacity(&mut self, capacity: CapacityConfig) -> AllocationResult<()> {
        validate_capacity(&capacity)?;

        let previous = std::mem::replace(&mut self.capacity, capacity);
        let refreshed = self
            .batches
            .iter()
            .cloned()
            .map(|mut batch| self.refresh_batch(&mut batch).map(|_| batch))
            .collect::<AllocationResult<Vec<_>>>();
        match refreshed {
            Ok(batches) => self.batches = batches,
            Err(e) => {
                self.capacity = previous;
                return Err(e);
            }
        }
        self.refresh_summary();
        if self.summary.is_over_capacity {
            warn!(
                total_batches = self.summary.total_batches,
                max_batches = self.summary.max_batches,
                "任务数超出新的班次上限"
            );
        }
        debug!("产能配置已更新");
        Ok(())
    }

    // ==========================================
    // 内部工具
    // ==========================================

    pub(super) fn batch_index(&self, batch_id: &str) -> AllocationResult<usize> {
        self.batches
            .iter()
            .position(|b| b.id == batch_id)
            .ok_or_else(|| AllocationError::UnknownBatch(batch_id.to_string()))
    }

    pub(super) fn constraints_for(&self, batch: &Batch) -> AllocationResult<&GradeConstraints> {
        self.grades
            .get(batch.target_grade)
            .ok_or_else(|| AllocationError::MissingGradeConstraints {
                grade: batch.target_grade,
                batch_id: batch.id.clone(),
            })
    }

    /// 新建任务 (分配序号, 派生字段初始化)
    pub(super) fn new_batch(&mut self, grade: ProductGrade, constraints: &GradeConstraints) -> Batch {
        let mut batch = Batch::new(format!("T-{:03}", self.next_seq), grade);
        self.next_seq += 1;
        self.apply_validation(&mut batch, constraints);
        batch
    }

    /// 从头重算混合成分、约束、状态
    pub(super) fn refresh_batch(&self, batch: &mut Batch) -> AllocationResult<()> {
        let constraints = self.constraints_for(batch)?.clone();
        self.apply_validation(batch, &constraints);
        Ok(())
    }

    fn apply_validation(&self, batch: &mut Batch, constraints: &GradeConstraints) {
        batch.blend = blend(&batch.assignments);
        let outcome = self.validator.validate(batch, constraints, &self.capacity);
        batch.status = self
            .validator
            .derive_status(batch.pot_count(), &outcome, &self.capacity);
        batch.constraints_met = outcome.constraints_met;
        batch.violations = outcome.violations;
    }

    /// 提交已重算的任务, 同步占用索引与汇总
    pub(super) fn commit_batch(&mut self, idx: usize, next: Batch) {
        let previous = std::mem::replace(&mut self.batches[idx], next);
        for pot_id in previous.pot_ids() {
            self.claims.remove(pot_id);
        }
        let batch = &self.batches[idx];
        for pot_id in batch.pot_ids() {
            self.claims.insert(pot_id.to_string(), batch.id.clone());
        }
        self.refresh_summary();
    }

    /// 追加新任务 (已重算), 同步占用索引与汇总
    pub(super) fn push_batch(&mut self, batch: Batch) {
        for pot_id in batch.pot_ids() {
            self.claims.insert(pot_id.to_string(), batch.id.clone());
        }
        self.batches.push(batch);
        self.refresh_summary();
    }

    pub(super) fn refresh_summary(&mut self) {
        self.summary = self.aggregator.summarize(&self.batches, &self.capacity);
    }

    /// 已占用槽号集合
    pub(super) fn claimed_ids(&self) -> HashSet<&str> {
        self.claims.keys().map(String::as_str).collect()
    }

    pub(super) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            batches: self.batches.clone(),
            claims: self.claims.clone(),
            next_seq: self.next_seq,
            summary: self.summary.clone(),
        }
    }

    pub(super) fn restore(&mut self, checkpoint: Checkpoint) {
        self.batches = checkpoint.batches;
        self.claims = checkpoint.claims;
        self.next_seq = checkpoint.next_seq;
        self.summary = checkpoint.summary;
    }

    /// 校验占用索引与任务列表一致
    pub fn verify_claims(&self) -> AllocationResult<()> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for batch in &self.batches {
            for pot_id in batch.pot_ids() {
                if let Some(other) = seen.insert(pot_id, batch.id.as_str()) {
                    return Err(AllocationError::ClaimIndexCorrupted {
                        pot_id: pot_id.to_string(),
                        message: format!("同时出现在任务 {} 和 {}", other, batch.id),
                    });
                }
                if self.claims.get(pot_id).map(String::as_str) != Some(batch.id.as_str()) {
                    return Err(AllocationError::ClaimIndexCorrupted {
                        pot_id: pot_id.to_string(),
                        message: format!("索引未指向任务 {}", batch.id),
                    });
                }
            }
        }
        if seen.len() != self.claims.len() {
            return Err(AllocationError::ClaimIndexCorrupted {
                pot_id: String::new(),
                message: format!("索引 {} 条, 任务内 {} 槽", self.claims.len(), seen.len()),
            });
        }
        Ok(())
    }

    fn reject<T>(&self, violation: RuleViolation) -> MutationOutcome<T> {
        warn!(session_id = %self.session_id, reason = %violation, "变更被拒绝");
        MutationOutcome::Rejected(violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::ConstraintViolation;
    use crate::domain::pot::PotMetrics;
    use crate::domain::types::BatchStatus;

    fn pot(id: &str, fe: f64, si: f64, score: f64) -> Pot {
        let mut p = Pot::new(
            id,
            1,
            "AB1",
            1,
            PotMetrics {
                fe,
                si,
                vn: 0.0,
                cr: 0.0,
                ni: 0.0,
                temperature: 968.0,
                voltage: 4.0,
                molar_ratio: 2.5,
                ae_frequency: 0.0,
                fe_slope: 0.0,
                si_slope: 0.0,
            },
        );
        p.ai_score = Some(score);
        p
    }

    fn session(pots: Vec<Pot>) -> AllocationSession {
        AllocationSession::new(pots, &PlannerConfig::default()).unwrap()
    }

    fn session_result(pots: Vec<Pot>) -> AllocationResult<AllocationSession> {
        AllocationSession::new(pots, &PlannerConfig::default())
    }

    fn four_pots() -> Vec<Pot> {
        vec![
            pot("P1", 0.06, 0.03, 95.0),
            pot("P2", 0.07, 0.03, 90.0),
            pot("P3", 0.06, 0.02, 85.0),
            pot("P4", 0.05, 0.03, 80.0),
        ]
    }

    #[test]
    fn test_create_batch_assigns_sequential_ids() {
        let mut s = session(vec![]);
        let a = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        let b = s.create_batch(ProductGrade::Billet).applied().unwrap();
        assert_eq!(a, "T-001");
        assert_eq!(b, "T-002");
        assert_eq!(s.batch("T-001").unwrap().status, BatchStatus::Empty);
        assert_eq!(s.summary().total_batches, 2);
    }

    #[test]
    fn test_create_batch_rejected_for_unconfigured_grade() {
        let config = PlannerConfig {
            grades: ConstraintTable::empty().with_grade(ProductGrade::P1020, GradeConstraints::new(0.1, 0.1)),
            ..PlannerConfig::default()
        };
        let mut s = AllocationSession::new(vec![], &config).unwrap();
        let outcome = s.create_batch(ProductGrade::PfaNt);
        assert_eq!(
            outcome.violation(),
            Some(&RuleViolation::GradeNotConfigured { grade: ProductGrade::PfaNt })
        );
        assert!(s.batches().is_empty());
    }

    #[test]
    fn test_create_batch_rejected_at_shift_cap() {
        let mut config = PlannerConfig::default();
        config.capacity.max_batches_per_shift = 1;
        let mut s = AllocationSession::new(vec![], &config).unwrap();
        assert!(s.create_batch(ProductGrade::P1020).is_applied());
        assert!(s.create_batch(ProductGrade::P1020).is_rejected());
        assert_eq!(s.batches().len(), 1);
    }

    #[test]
    fn test_add_and_remove_recompute_status() {
        let mut s = session(four_pots());
        let id = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        for p in ["P1", "P2", "P3", "P4"] {
            assert!(s.add_pot_to_batch(&id, p).unwrap().is_applied());
        }
        let batch = s.batch(&id).unwrap();
        assert_eq!(batch.status, BatchStatus::Ready);
        assert!((batch.total_weight() - 10.0).abs() < 1e-9);
        assert!((batch.blend.fe - 0.06).abs() < 1e-9);

        assert!(s.remove_pot_from_batch(&id, "P2").unwrap().is_applied());
        let batch = s.batch(&id).unwrap();
        assert_eq!(batch.status, BatchStatus::Incomplete);
        assert!((batch.blend.fe - (0.06 + 0.06 + 0.05) / 3.0).abs() < 1e-9);
        assert!(s.assignment_of("P2").is_none());
        s.verify_claims().unwrap();
    }

    #[test]
    fn test_add_rejects_full_batch() {
        let mut pots = four_pots();
        pots.push(pot("P5", 0.05, 0.02, 70.0));
        let mut s = session(pots);
        let id = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        for p in ["P1", "P2", "P3", "P4"] {
            s.add_pot_to_batch(&id, p).unwrap();
        }
        let before = s.batch(&id).unwrap().clone();
        let outcome = s.add_pot_to_batch(&id, "P5").unwrap();
        assert!(matches!(outcome.violation(), Some(RuleViolation::BatchAtCapacity { max: 4, .. })));
        assert_eq!(s.batch(&id).unwrap(), &before);
        assert!(s.assignment_of("P5").is_none());
    }

    #[test]
    fn test_add_rejects_weight_overflow() {
        let mut heavy = pot("H1", 0.05, 0.02, 90.0);
        heavy.weight = Some(9.0);
        let mut other = pot("H2", 0.05, 0.02, 90.0);
        other.weight = Some(2.0);
        let mut s = session(vec![heavy, other]);
        let id = s.create_batch(ProductGrade::P1020).applied().unwrap();
        s.add_pot_to_batch(&id, "H1").unwrap();
        let outcome = s.add_pot_to_batch(&id, "H2").unwrap();
        assert!(matches!(outcome.violation(), Some(RuleViolation::WeightWouldOverflow { .. })));
        assert_eq!(s.batch(&id).unwrap().pot_count(), 1);
    }

    #[test]
    fn test_unknown_ids_are_contract_errors() {
        let mut s = session(four_pots());
        let id = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        assert!(matches!(
            s.add_pot_to_batch("T-999", "P1"),
            Err(AllocationError::UnknownBatch(_))
        ));
        assert!(matches!(
            s.add_pot_to_batch(&id, "NOPE"),
            Err(AllocationError::UnknownPot(_))
        ));
        assert!(matches!(
            s.remove_pot_from_batch(&id, "NOPE"),
            Err(AllocationError::UnknownPot(_))
        ));
    }

    #[test]
    fn test_replace_flags_instead_of_rejecting() {
        let mut pots = four_pots();
        pots.push(pot("P5", 0.05, 0.02, 70.0));
        let mut s = session(pots);
        let id = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        let outcome = s
            .replace_batch_pots(&id, &["P1", "P2", "P3", "P4", "P5"])
            .unwrap();
        assert!(outcome.is_applied());
        let batch = s.batch(&id).unwrap();
        assert_eq!(batch.pot_count(), 5);
        assert_eq!(batch.status, BatchStatus::Draft);
        assert!(batch.violations.iter().any(ConstraintViolation::is_pot_count));
        assert!(batch
            .violations
            .iter()
            .any(|v| matches!(v, ConstraintViolation::WeightOverMax { .. })));
    }

    #[test]
    fn test_replace_rejects_duplicates_and_foreign_claims() {
        let mut s = session(four_pots());
        let a = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        let b = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        s.add_pot_to_batch(&a, "P1").unwrap();

        let dup = s.replace_batch_pots(&b, &["P2", "P2"]).unwrap();
        assert!(matches!(dup.violation(), Some(RuleViolation::DuplicatePot { .. })));

        let taken = s.replace_batch_pots(&b, &["P2", "P1"]).unwrap();
        assert!(matches!(taken.violation(), Some(RuleViolation::PotAlreadyAssigned { .. })));
        assert_eq!(s.batch(&b).unwrap().pot_count(), 0);

        // 本任务已有的槽可保留
        assert!(s.replace_batch_pots(&a, &["P1", "P3"]).unwrap().is_applied());
        assert_eq!(s.assignment_of("P3"), Some(a.as_str()));
        s.verify_claims().unwrap();
    }

    #[test]
    fn test_remove_batch_releases_pots() {
        let mut s = session(four_pots());
        let id = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        s.add_pot_to_batch(&id, "P1").unwrap();
        let removed = s.remove_batch(&id).unwrap();
        assert_eq!(removed.pot_count(), 1);
        assert!(s.assignment_of("P1").is_none());
        assert_eq!(s.unassigned_pots().len(), 4);
        assert!(matches!(s.remove_batch(&id), Err(AllocationError::UnknownBatch(_))));
    }

    #[test]
    fn test_clear_all_resets_sequence() {
        let mut s = session(four_pots());
        let id = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        s.add_pot_to_batch(&id, "P1").unwrap();
        s.clear_all();
        assert!(s.batches().is_empty());
        assert_eq!(s.summary().total_pots, 0);
        assert_eq!(s.create_batch(ProductGrade::PfaNt).applied().unwrap(), "T-001");
    }

    #[test]
    fn test_construction_rejects_invalid_inputs() {
        for weight in [-3.0, 0.0, f64::NAN, f64::INFINITY] {
            let mut bad = pot("W1", 0.05, 0.02, 90.0);
            bad.weight = Some(weight);
            let result = session_result(vec![bad, pot("W2", 0.05, 0.02, 90.0)]);
            assert!(
                matches!(result, Err(AllocationError::InvalidPotWeight { ref pot_id, .. }) if pot_id == "W1"),
                "出铝量 {} 应被拒绝",
                weight
            );
        }

        let mut config = PlannerConfig::default();
        config.capacity.max_weight_per_batch = -1.0;
        assert!(matches!(
            AllocationSession::new(four_pots(), &config),
            Err(AllocationError::InvalidConfig(_))
        ));

        let result = AllocationSession::with_parts(
            four_pots(),
            ConstraintTable::default(),
            CapacityConfig {
                max_batches_per_shift: 0,
                ..CapacityConfig::default()
            },
            &HealthAssessor::default(),
        );
        assert!(matches!(result, Err(AllocationError::InvalidConfig(_))));
    }

    #[test]
    fn test_update_capacity_revalidates() {
        let mut s = session(four_pots());
        let id = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        for p in ["P1", "P2", "P3"] {
            s.add_pot_to_batch(&id, p).unwrap();
        }
        assert_eq!(s.batch(&id).unwrap().status, BatchStatus::Incomplete);

        let capacity = CapacityConfig {
            pots_per_batch: crate::domain::capacity::PotCountRule::Range { min: 2, max: 6 },
            max_batches_per_shift: 1,
            ..CapacityConfig::default()
        };
        s.update_capacity(capacity).unwrap();
        assert_eq!(s.batch(&id).unwrap().status, BatchStatus::Ready);
        assert_eq!(s.summary().max_batches, 1);

        let invalid = CapacityConfig {
            max_batches_per_shift: 0,
            ..CapacityConfig::default()
        };
        assert!(matches!(s.update_capacity(invalid), Err(AllocationError::InvalidConfig(_))));
        assert_eq!(s.capacity().max_batches_per_shift, 1);
    }
}
