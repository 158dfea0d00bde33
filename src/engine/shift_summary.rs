// ==========================================
// 电解铝出铝排产系统 - 班次汇总引擎
// ==========================================
// 职责: 全部任务折叠为班次汇总, 标记超产能
// 红线: 每次全量重算, 不做增量记账
// ==========================================

use crate::domain::batch::Batch;
use crate::domain::capacity::CapacityConfig;
use crate::domain::summary::ShiftSummary;
use crate::domain::types::{BatchStatus, ProductGrade};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftSummaryAggregator;

impl ShiftSummaryAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 汇总任务列表
    pub fn summarize(&self, batches: &[Batch], capacity: &CapacityConfig) -> ShiftSummary {
        let mut batches_by_grade: BTreeMap<ProductGrade, usize> =
            ProductGrade::ALL.iter().map(|g| (*g, 0)).collect();
        let mut total_pots = 0;
        let mut total_weight = 0.0;
        let mut ready_batches = 0;

        for batch in batches {
            total_pots += batch.pot_count();
            total_weight += batch.total_weight();
            if batch.status == BatchStatus::Ready {
                ready_batches += 1;
            }
            *batches_by_grade.entry(batch.target_grade).or_insert(0) += 1;
        }

        ShiftSummary {
            total_batches: batches.len(),
            max_batches: capacity.max_batches_per_shift,
            total_pots,
            max_pots: capacity.max_pots_per_shift(),
            total_weight,
            ready_batches,
            batches_by_grade,
            is_over_capacity: batches.len() > capacity.max_batches_per_shift,
        }
    }
}
