// ==========================================
// 电解铝出铝排产系统 - 需求驱动整班规划
// ==========================================
// 职责: 生产需求 (牌号 + 吨位) → 整班任务列表
// 输入: ProductRequest 列表
// 输出: 新任务列表 + PlanReport (逐牌号满足情况)
// 红线:
// - 从空白开始规划 (先清空现有任务)
// - 任务总数不超过单班上限
// - 缺口显式上报, 不静默丢弃
// ==========================================
// 规划步骤:
// 1. 同牌号需求合并 (吨位累加)
// 2. 按牌号优先级依次处理
// 3. tasks_needed = ceil(吨位 / 平均包重)
// 4. 候选池按评分排序后切连续不重叠的整包
// 5. 候选池耗尽或班次满额即停止
// ==========================================

use super::session::AllocationSession;
use crate::domain::batch::PotAssignment;
use crate::domain::summary::{ProductRequest, RequestFulfillment};
use crate::domain::types::ProductGrade;
use crate::engine::error::{AllocationResult, RuleViolation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// 整班规划结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    /// 新建任务 (按创建顺序)
    pub batch_ids: Vec<String>,
    /// 逐牌号满足情况 (按牌号优先级)
    pub fulfillment: Vec<RequestFulfillment>,
    /// 班次任务上限是否截断了规划
    pub shift_capped: bool,
    /// 无法规划的需求 (如牌号未配置)
    pub rejected: Vec<RuleViolation>,
}

impl PlanReport {
    /// 全部牌号缺口任务数之和
    pub fn total_shortfall(&self) -> usize {
        self.fulfillment.iter().map(|f| f.shortfall).sum()
    }
}

/// 同牌号需求合并, 按牌号优先级排列
fn merge_requests(requests: &[ProductRequest]) -> Vec<(ProductGrade, f64)> {
    let mut merged: BTreeMap<ProductGrade, f64> = BTreeMap::new();
    for r in requests {
        *merged.entry(r.grade).or_insert(0.0) += r.target_quantity;
    }
    let mut merged: Vec<(ProductGrade, f64)> = merged.into_iter().collect();
    merged.sort_by_key(|(grade, _)| grade.priority());
    merged
}

impl AllocationSession {
    /// 由生产需求从空白规划整班任务
    #[instrument(skip(self, requests), fields(session_id = %self.session_id(), requests_count = requests.len()))]
    pub fn plan_from_requests(&mut self, requests: &[ProductRequest]) -> AllocationResult<PlanReport> {
        let checkpoint = self.checkpoint();
        match self.plan_inner(requests) {
            Ok(report) => Ok(report),
            Err(e) => {
                self.restore(checkpoint);
                Err(e)
            }
        }
    }

    fn plan_inner(&mut self, requests: &[ProductRequest]) -> AllocationResult<PlanReport> {
        self.clear_all();

        let group = self.capacity.pots_per_batch.target();
        let max_batches = self.capacity.max_batches_per_shift;
        let mut report = PlanReport {
            batch_ids: Vec::new(),
            fulfillment: Vec::new(),
            shift_capped: false,
            rejected: Vec::new(),
        };

        for (grade, quantity) in merge_requests(requests) {
            let tasks_needed = self.capacity.tasks_needed(quantity);
            let constraints = match self.grades.get(grade) {
                Some(c) => c.clone(),
                None => {
                    warn!(grade = %grade, "牌号未配置约束, 跳过该需求");
                    report.rejected.push(RuleViolation::GradeNotConfigured { grade });
                    report
                        .fulfillment
                        .push(RequestFulfillment::new(grade, quantity, tasks_needed, 0));
                    continue;
                }
            };

            // 候选池: 已按评分降序、槽号升序
            let slices: Vec<Vec<PotAssignment>> = {
                let claimed = self.claimed_ids();
                let candidates = self.eligibility.eligible_pots_for_grade(
                    self.pots.values(),
                    &constraints,
                    &claimed,
                    None,
                );
                let full_groups = if group == 0 { 0 } else { candidates.len() / group };
                let slots_left = max_batches.saturating_sub(self.batches.len());
                let by_pool = tasks_needed.min(full_groups);
                if slots_left < by_pool {
                    report.shift_capped = true;
                }
                let tasks = by_pool.min(slots_left);

                candidates
                    .chunks(group.max(1))
                    .take(tasks)
                    .map(|chunk| {
                        chunk
                            .iter()
                            .map(|p| PotAssignment::snapshot(p, self.capacity.default_pot_weight))
                            .collect()
                    })
                    .collect()
            };

            let assigned = slices.len();
            for assignments in slices {
                let mut batch = self.new_batch(grade, &constraints);
                batch.assignments = assignments;
                self.refresh_batch(&mut batch)?;
                report.batch_ids.push(batch.id.clone());
                self.push_batch(batch);
            }

            let fulfillment = RequestFulfillment::new(grade, quantity, tasks_needed, assigned);
            if fulfillment.shortfall > 0 {
                warn!(
                    grade = %grade,
                    tasks_needed,
                    tasks_assigned = assigned,
                    shortfall = fulfillment.shortfall,
                    "需求未完全满足"
                );
            } else {
                debug!(grade = %grade, tasks_assigned = assigned, "需求已满足");
            }
            report.fulfillment.push(fulfillment);
        }

        info!(
            batches = report.batch_ids.len(),
            shortfall = report.total_shortfall(),
            shift_capped = report.shift_capped,
            "整班规划完成"
        );
        Ok(report)
    }

    /// 当前任务对需求的满足情况 (只读)
    pub fn request_fulfillment(&self, requests: &[ProductRequest]) -> Vec<RequestFulfillment> {
        merge_requests(requests)
            .into_iter()
            .map(|(grade, quantity)| {
                let assigned = self.batches.iter().filter(|b| b.target_grade == grade).count();
                RequestFulfillment::new(grade, quantity, self.capacity.tasks_needed(quantity), assigned)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::planner_config::PlannerConfig;
    use crate::domain::pot::{Pot, PotMetrics};
    use crate::domain::types::{BatchStatus, FulfillmentStatus};

    fn pots(n: usize, fe: f64) -> Vec<Pot> {
        (1..=n)
            .map(|i| {
                let mut p = Pot::new(
                    format!("P{:02}", i),
                    1,
                    "AB1",
                    i as u32,
                    PotMetrics {
                        fe,
                        si: 0.03,
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
                p.ai_score = Some(100.0 - i as f64);
                p
            })
            .collect()
    }

    #[test]
    fn test_merge_requests_sums_and_orders() {
        let merged = merge_requests(&[
            ProductRequest::new(ProductGrade::P1020, 10.0),
            ProductRequest::new(ProductGrade::PfaNt, 20.0),
            ProductRequest::new(ProductGrade::P1020, 15.0),
        ]);
        assert_eq!(merged, vec![(ProductGrade::PfaNt, 20.0), (ProductGrade::P1020, 25.0)]);
    }

    #[test]
    fn test_plan_carves_contiguous_slices() {
        let mut s = AllocationSession::new(pots(8, 0.06), &PlannerConfig::default()).unwrap();
        let report = s
            .plan_from_requests(&[ProductRequest::new(ProductGrade::P1020, 20.0)])
            .unwrap();
        assert_eq!(report.batch_ids, vec!["T-001", "T-002"]);
        let first: Vec<&str> = s.batch("T-001").unwrap().pot_ids().collect();
        assert_eq!(first, vec!["P01", "P02", "P03", "P04"]);
        assert_eq!(report.fulfillment[0].status, FulfillmentStatus::Fulfilled);
        assert!(s.batches().iter().all(|b| b.status == BatchStatus::Ready));
    }

    #[test]
    fn test_plan_reports_shift_cap() {
        let mut config = PlannerConfig::default();
        config.capacity.max_batches_per_shift = 1;
        let mut s = AllocationSession::new(pots(12, 0.06), &config).unwrap();
        let report = s
            .plan_from_requests(&[ProductRequest::new(ProductGrade::P1020, 30.0)])
            .unwrap();
        assert!(report.shift_capped);
        assert_eq!(report.batch_ids.len(), 1);
        assert_eq!(report.fulfillment[0].shortfall, 2);
        assert_eq!(report.fulfillment[0].status, FulfillmentStatus::Partial);
    }

    #[test]
    fn test_plan_replaces_existing_batches() {
        let mut s = AllocationSession::new(pots(8, 0.06), &PlannerConfig::default()).unwrap();
        let id = s.create_batch(ProductGrade::Billet).applied().unwrap();
        s.add_pot_to_batch(&id, "P08").unwrap();
        s.plan_from_requests(&[ProductRequest::new(ProductGrade::PfaNt, 10.0)])
            .unwrap();
        assert_eq!(s.batches().len(), 1);
        assert_eq!(s.batches()[0].target_grade, ProductGrade::PfaNt);
        assert!(s.assignment_of("P08").is_none());
        s.verify_claims().unwrap();
    }

    #[test]
    fn test_request_fulfillment_against_current_batches() {
        let mut s = AllocationSession::new(pots(4, 0.06), &PlannerConfig::default()).unwrap();
        s.create_batch(ProductGrade::Billet);
        s.create_batch(ProductGrade::Billet);
        let f = s.request_fulfillment(&[ProductRequest::new(ProductGrade::Billet, 10.0)]);
        assert_eq!(f[0].tasks_needed, 1);
        assert_eq!(f[0].tasks_assigned, 2);
        assert_eq!(f[0].status, FulfillmentStatus::Exceeded);
    }
}
