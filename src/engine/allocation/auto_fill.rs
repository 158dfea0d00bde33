// ==========================================
// 电解铝出铝排产系统 - 自动补槽 (贪心)
// ==========================================
// 职责: 从未占用槽池中按评分补满任务
// 输入: 任务 + 牌号约束 + 未占用槽
// 输出: AutoFillReport (加入/跳过/缺口)
// 红线:
// - 最优优先贪心, 不做组合搜索
// - 单槽超重即跳过, 继续扫描后续候选
// - 补不满不是错误, 任务保持 Incomplete 并上报
// ==========================================

use super::session::AllocationSession;
use crate::domain::batch::PotAssignment;
use crate::domain::types::BatchStatus;
use crate::engine::error::{AllocationResult, RuleViolation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// 单任务补槽结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFillReport {
    pub batch_id: String,
    /// 本次加入的槽 (按加入顺序)
    pub added: Vec<String>,
    /// 被跳过的候选 (槽号, 原因)
    pub skipped: Vec<(String, String)>,
    pub status: BatchStatus,
    /// 距槽数下限的缺口
    pub shortfall: usize,
}

impl AutoFillReport {
    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }
}

impl AllocationSession {
    /// 自动补满单个任务
    ///
    /// # 步骤
    /// 1. 候选 = 未占用、非停槽/危险、单槽 Fe/Si 满足牌号上限
    /// 2. 评分降序, 槽号升序
    /// 3. 依次取槽直到达到目标槽数; 超重的槽跳过
    #[instrument(skip(self), fields(session_id = %self.session_id()))]
    pub fn auto_fill_batch(&mut self, batch_id: &str) -> AllocationResult<AutoFillReport> {
        let idx = self.batch_index(batch_id)?;
        let batch = &self.batches[idx];
        let constraints = self.constraints_for(batch)?;
        let target = self.capacity.pots_per_batch.target();
        let needed = target.saturating_sub(batch.pot_count());

        let mut added = Vec::new();
        let mut skipped = Vec::new();
        let mut weight = batch.total_weight();

        if needed > 0 {
            let claimed = self.claimed_ids();
            let candidates =
                self.eligibility
                    .eligible_pots_for_grade(self.pots.values(), constraints, &claimed, None);

            for pot in candidates {
                if added.len() >= needed {
                    break;
                }
                let assignment = PotAssignment::snapshot(pot, self.capacity.default_pot_weight);
                if !self.capacity.can_add_weight(weight, assignment.weight) {
                    let reason = RuleViolation::WeightWouldOverflow {
                        batch_id: batch_id.to_string(),
                        projected: weight + assignment.weight,
                        max: self.capacity.max_weight_per_batch,
                    };
                    skipped.push((pot.id.clone(), reason.to_string()));
                    continue;
                }
                weight += assignment.weight;
                added.push(assignment);
            }
        }

        let added_ids: Vec<String> = added.iter().map(|a| a.pot_id.clone()).collect();
        if !added.is_empty() {
            let mut next = self.batches[idx].clone();
            next.assignments.extend(added);
            self.refresh_batch(&mut next)?;
            self.commit_batch(idx, next);
        }

        let batch = &self.batches[idx];
        let report = AutoFillReport {
            batch_id: batch_id.to_string(),
            added: added_ids,
            skipped,
            status: batch.status,
            shortfall: self.capacity.pots_per_batch.min().saturating_sub(batch.pot_count()),
        };

        if report.is_complete() {
            debug!(batch_id, added = report.added.len(), status = %report.status, "自动补槽完成");
        } else {
            warn!(
                batch_id,
                added = report.added.len(),
                skipped = report.skipped.len(),
                shortfall = report.shortfall,
                "候选槽不足, 任务未补满"
            );
        }
        Ok(report)
    }

    /// 自动补满全部未满任务
    ///
    /// 按牌号优先级、创建顺序依次补槽, 共享同一未占用槽池。
    /// 任一任务出现契约错误时整体回滚。
    #[instrument(skip(self), fields(session_id = %self.session_id()))]
    pub fn auto_fill_all(&mut self) -> AllocationResult<Vec<AutoFillReport>> {
        let target = self.capacity.pots_per_batch.target();
        let mut order: Vec<(u8, usize, String)> = self
            .batches
            .iter()
            .enumerate()
            .filter(|(_, b)| b.pot_count() < target)
            .map(|(i, b)| (b.target_grade.priority(), i, b.id.clone()))
            .collect();
        order.sort();

        let checkpoint = self.checkpoint();
        let mut reports = Vec::with_capacity(order.len());
        for (_, _, batch_id) in order {
            match self.auto_fill_batch(&batch_id) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    self.restore(checkpoint);
                    return Err(e);
                }
            }
        }

        debug!(
            batches = reports.len(),
            added = reports.iter().map(|r| r.added.len()).sum::<usize>(),
            "全部任务自动补槽完成"
        );
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::planner_config::PlannerConfig;
    use crate::domain::pot::{Pot, PotMetrics};
    use crate::domain::types::ProductGrade;

    fn pot(id: &str, fe: f64, score: f64, weight: Option<f64>) -> Pot {
        let mut p = Pot::new(
            id,
            1,
            "AB1",
            1,
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
        p.ai_score = Some(score);
        p.weight = weight;
        p
    }

    #[test]
    fn test_fill_takes_best_scores_first() {
        let pots = vec![
            pot("P1", 0.06, 70.0, None),
            pot("P2", 0.06, 95.0, None),
            pot("P3", 0.06, 90.0, None),
            pot("P4", 0.09, 99.0, None), // Fe 超 PFA-NT 上限
            pot("P5", 0.06, 90.0, None),
            pot("P6", 0.06, 60.0, None),
        ];
        let mut s = AllocationSession::new(pots, &PlannerConfig::default()).unwrap();
        let id = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        let report = s.auto_fill_batch(&id).unwrap();
        assert_eq!(report.added, vec!["P2", "P3", "P5", "P1"]);
        assert_eq!(report.status, BatchStatus::Ready);
        assert!(report.is_complete());
    }

    #[test]
    fn test_fill_skips_overweight_and_continues() {
        let pots = vec![
            pot("A", 0.06, 99.0, Some(3.0)),
            pot("B", 0.06, 98.0, Some(3.0)),
            pot("C", 0.06, 97.0, Some(3.0)),
            pot("D", 0.06, 96.0, Some(3.0)), // 12 > 10.5
            pot("E", 0.06, 95.0, Some(1.5)),
        ];
        let mut s = AllocationSession::new(pots, &PlannerConfig::default()).unwrap();
        let id = s.create_batch(ProductGrade::P1020).applied().unwrap();
        let report = s.auto_fill_batch(&id).unwrap();
        assert_eq!(report.added, vec!["A", "B", "C", "E"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "D");
        assert!(report.skipped[0].1.starts_with("WEIGHT_LIMIT_EXCEEDED"));
        assert!((s.batch(&id).unwrap().total_weight() - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_fill_on_full_batch_is_noop() {
        let pots = (1..=4).map(|i| pot(&format!("P{}", i), 0.06, 90.0, None)).collect();
        let mut s = AllocationSession::new(pots, &PlannerConfig::default()).unwrap();
        let id = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        s.auto_fill_batch(&id).unwrap();
        let before = s.batch(&id).unwrap().clone();
        let report = s.auto_fill_batch(&id).unwrap();
        assert!(report.added.is_empty());
        assert_eq!(s.batch(&id).unwrap(), &before);
    }

    #[test]
    fn test_fill_all_respects_grade_priority() {
        let pots = (1..=4).map(|i| pot(&format!("P{}", i), 0.06, 90.0, None)).collect();
        let mut s = AllocationSession::new(pots, &PlannerConfig::default()).unwrap();
        let billet = s.create_batch(ProductGrade::Billet).applied().unwrap();
        let premium = s.create_batch(ProductGrade::PfaNt).applied().unwrap();
        let reports = s.auto_fill_all().unwrap();
        assert_eq!(reports[0].batch_id, premium);
        assert_eq!(reports[0].added.len(), 4);
        assert_eq!(reports[1].batch_id, billet);
        assert!(reports[1].added.is_empty());
        assert_eq!(s.batch(&billet).unwrap().status, BatchStatus::Empty);
        s.verify_claims().unwrap();
    }
}
