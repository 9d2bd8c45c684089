// ==========================================
// 排产仿真快照分析 - 时间桶汇总
// ==========================================
// 日 / 周(周一起始) / 月 汇总 + 累计
// ==========================================

use crate::domain::{PeriodQty, TimeGrain};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// 日期所在桶的起始日
pub fn bucket_start(date: NaiveDate, grain: TimeGrain) -> NaiveDate {
    match grain {
        TimeGrain::Day => date,
        TimeGrain::Week => date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
        TimeGrain::Month => date.with_day(1).unwrap_or(date),
    }
}

/// 按桶求和，升序输出并附带累计值
pub fn bucket_sum<I>(values: I, grain: TimeGrain) -> Vec<PeriodQty>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, qty) in values {
        *sums.entry(bucket_start(date, grain)).or_insert(0.0) += qty;
    }

    let mut cumulative = 0.0;
    sums.into_iter()
        .map(|(period_start, qty)| {
            cumulative += qty;
            PeriodQty {
                period_start,
                qty,
                cumulative_qty: cumulative,
            }
        })
        .collect()
}
