// ==========================================
// 排产仿真快照分析 - 需求趋势
// ==========================================
// 输入: DEMAND (DUE_DATE, DEMAND_QTY)
// 输出: 日 / 周 / 月 需求量及累计需求
// ==========================================

use crate::domain::{PeriodQty, TimeGrain};
use crate::engine::time_bucket::bucket_sum;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 三种粒度的需求趋势
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandTrend {
    pub daily: Vec<PeriodQty>,
    pub weekly: Vec<PeriodQty>,
    pub monthly: Vec<PeriodQty>,
}

pub fn demand_trend(due_quantities: &[(NaiveDate, f64)]) -> DemandTrend {
    let trend = DemandTrend {
        daily: bucket_sum(due_quantities.iter().copied(), TimeGrain::Day),
        weekly: bucket_sum(due_quantities.iter().copied(), TimeGrain::Week),
        monthly: bucket_sum(due_quantities.iter().copied(), TimeGrain::Month),
    };
    info!(
        lines = due_quantities.len(),
        days = trend.daily.len(),
        total = trend.daily.last().map(|p| p.cumulative_qty).unwrap_or(0.0),
        "需求趋势汇总完成"
    );
    trend
}
