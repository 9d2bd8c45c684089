// ==========================================
// 排产仿真快照分析 - 工序产量
// ==========================================
// 输入: RES_PLAN (ALLOCATION_TYPE = Allocate 且 OPER_ID 非空)
// 输出: 指定工序的 日 / 周 / 月 计划产量
// ==========================================

use crate::domain::{AllocationType, PeriodQty, ScheduledOperation, TimeGrain};
use crate::engine::time_bucket::bucket_sum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutput {
    pub oper_id: String,
    pub daily: Vec<PeriodQty>,
    pub weekly: Vec<PeriodQty>,
    pub monthly: Vec<PeriodQty>,
}

fn is_production(op: &ScheduledOperation) -> bool {
    op.allocation_type == AllocationType::Allocate
        && op.oper_id.as_deref().is_some_and(|o| !o.is_empty())
}

/// 有生产分配的工序列表（升序）
pub fn production_oper_ids(operations: &[ScheduledOperation]) -> Vec<String> {
    operations
        .iter()
        .filter(|op| is_production(op))
        .filter_map(|op| op.oper_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 指定工序的计划产量；PLAN_QTY 为空按 0
pub fn process_output(operations: &[ScheduledOperation], oper_id: &str) -> ProcessOutput {
    let values: Vec<_> = operations
        .iter()
        .filter(|op| is_production(op) && op.oper_id.as_deref() == Some(oper_id))
        .map(|op| (op.plan_date, op.plan_qty.unwrap_or(0.0)))
        .collect();

    ProcessOutput {
        oper_id: oper_id.to_string(),
        daily: bucket_sum(values.iter().copied(), TimeGrain::Day),
        weekly: bucket_sum(values.iter().copied(), TimeGrain::Week),
        monthly: bucket_sum(values.iter().copied(), TimeGrain::Month),
    }
}
