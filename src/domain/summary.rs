// ==========================================
// 电解铝出铝排产系统 - 汇总与需求模型
// ==========================================
// 职责: 全厂槽况汇总、班次汇总、生产需求及满足情况
// ==========================================

use crate::domain::types::{FulfillmentStatus, ProductGrade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 全厂槽况汇总
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetHealthSummary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub moderate: usize,
    pub normal: usize,
    pub shutdown: usize,
    /// 运行槽加权健康分 (0-100)
    pub overall_score: f64,
}

/// 班次汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSummary {
    pub total_batches: usize,
    pub max_batches: usize,
    pub total_pots: usize,
    pub max_pots: usize,
    pub total_weight: f64,
    pub ready_batches: usize,
    pub batches_by_grade: BTreeMap<ProductGrade, usize>,
    pub is_over_capacity: bool,
}

/// 生产需求 (牌号 + 目标吨位)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub grade: ProductGrade,
    pub target_quantity: f64,
}

impl ProductRequest {
    pub fn new(grade: ProductGrade, target_quantity: f64) -> Self {
        Self {
            grade,
            target_quantity,
        }
    }
}

/// 单牌号需求满足情况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFulfillment {
    pub grade: ProductGrade,
    pub target_quantity: f64,
    pub tasks_needed: usize,
    pub tasks_assigned: usize,
    /// 缺口任务数 (显式上报, 不静默丢弃)
    pub shortfall: usize,
    pub status: FulfillmentStatus,
}

impl RequestFulfillment {
    pub fn new(grade: ProductGrade, target_quantity: f64, tasks_needed: usize, tasks_assigned: usize) -> Self {
        Self {
            grade,
            target_quantity,
            tasks_needed,
            tasks_assigned,
            shortfall: tasks_needed.saturating_sub(tasks_assigned),
            status: FulfillmentStatus::derive(tasks_needed, tasks_assigned),
        }
    }
}
