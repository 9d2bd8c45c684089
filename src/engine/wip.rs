// ==========================================
// 排产仿真快照分析 - 在制品 (WIP)
// ==========================================
// 输入: LOT_HISTORY (EVENT_TYPE = Creation) / RES_PLAN
// 输出: 日别品目 / 日别品目-缓冲区 数量
// ==========================================
// 安全库存需求 (DEMAND_ID 以指定前缀开头) 在缓冲区视图中排除
// 品目或缓冲区为空的行不参与分组（Setup 行无品目）
// ==========================================

use crate::domain::{BufferWip, ItemWip, LotEvent, ScheduledOperation};
use chrono::NaiveDate;
use std::collections::BTreeMap;

fn is_safety_stock(demand_id: Option<&str>, prefix: &str) -> bool {
    !prefix.is_empty() && demand_id.is_some_and(|d| d.starts_with(prefix))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// 日别品目批次生成量
pub fn item_wip(events: &[LotEvent]) -> Vec<ItemWip> {
    let mut sums: BTreeMap<(NaiveDate, String), f64> = BTreeMap::new();
    for e in events
        .iter()
        .filter(|e| e.is_creation() && !e.item_id.is_empty())
    {
        *sums
            .entry((e.event_datetime.date(), e.item_id.clone()))
            .or_insert(0.0) += e.lot_qty;
    }
    sums.into_iter()
        .map(|((date, item_id), qty)| ItemWip { date, item_id, qty })
        .collect()
}

/// 日别品目-缓冲区批次生成量（排除安全库存）
pub fn buffer_lot_wip(events: &[LotEvent], safety_stock_prefix: &str) -> Vec<BufferWip> {
    buffer_sum(
        events
            .iter()
            .filter(|e| e.is_creation())
            .filter(|e| !is_safety_stock(e.demand_id.as_deref(), safety_stock_prefix))
            .filter_map(|e| {
                Some((
                    e.event_datetime.date(),
                    non_empty(Some(e.item_id.as_str()))?,
                    non_empty(e.buffer_id.as_deref())?,
                    e.lot_qty,
                ))
            }),
    )
}

/// 日别品目-缓冲区计划量（排除安全库存）
pub fn buffer_plan_wip(operations: &[ScheduledOperation], safety_stock_prefix: &str) -> Vec<BufferWip> {
    buffer_sum(
        operations
            .iter()
            .filter(|op| !is_safety_stock(op.demand_id.as_deref(), safety_stock_prefix))
            .filter_map(|op| {
                Some((
                    op.plan_date,
                    non_empty(op.item_id.as_deref())?,
                    non_empty(op.buffer_id.as_deref())?,
                    op.plan_qty.unwrap_or(0.0),
                ))
            }),
    )
}

fn buffer_sum<I>(rows: I) -> Vec<BufferWip>
where
    I: IntoIterator<Item = (NaiveDate, String, String, f64)>,
{
    let mut sums: BTreeMap<(NaiveDate, String, String), f64> = BTreeMap::new();
    for (date, item, buffer, qty) in rows {
        *sums.entry((date, item, buffer)).or_insert(0.0) += qty;
    }
    sums.into_iter()
        .map(|((date, item_id, buffer_id), qty)| BufferWip {
            date,
            item_id,
            buffer_id,
            qty,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AllocationType;

    fn lot(event_type: &str, day: u32, item: &str, qty: f64, demand: Option<&str>) -> LotEvent {
        LotEvent {
            event_type: event_type.to_string(),
            event_datetime: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            item_id: item.to_string(),
            lot_qty: qty,
            demand_id: demand.map(str::to_string),
            buffer_id: Some("BUF1".to_string()),
        }
    }

    #[test]
    fn test_item_wip_creation_only() {
        let events = vec![
            lot("Creation", 1, "A", 5.0, None),
            lot("Creation", 1, "A", 7.0, None),
            lot("Move", 1, "A", 100.0, None),
            lot("Creation", 2, "B", 1.0, None),
        ];
        let wip = item_wip(&events);
        assert_eq!(wip.len(), 2);
        assert_eq!(wip[0].qty, 12.0);
        assert_eq!(wip[1].item_id, "B");
    }

    #[test]
    fn test_buffer_lot_wip_excludes_safety_stock() {
        let events = vec![
            lot("Creation", 1, "A", 5.0, Some("SafetyStock_01")),
            lot("Creation", 1, "A", 7.0, Some("D1")),
        ];
        let wip = buffer_lot_wip(&events, "SafetyStock");
        assert_eq!(wip.len(), 1);
        assert_eq!(wip[0].qty, 7.0);
        assert_eq!(wip[0].buffer_id, "BUF1");
    }

    #[test]
    fn test_buffer_lot_wip_skips_missing_keys() {
        let mut no_buffer = lot("Creation", 1, "A", 3.0, Some("D1"));
        no_buffer.buffer_id = None;
        let events = vec![
            lot("Creation", 1, "A", 7.0, Some("D1")),
            lot("Creation", 1, "", 2.0, Some("D1")),
            no_buffer,
        ];
        let wip = buffer_lot_wip(&events, "SafetyStock");
        assert_eq!(wip.len(), 1);
        assert_eq!((wip[0].item_id.as_str(), wip[0].qty), ("A", 7.0));

        assert_eq!(item_wip(&events).len(), 1);
    }

    #[test]
    fn test_buffer_plan_wip_skips_setup_and_unbuffered_rows() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let plan = |kind: AllocationType, item: Option<&str>, buffer: Option<&str>, qty: Option<f64>| {
            let mut op = ScheduledOperation::new(
                "G1",
                "R1",
                day,
                kind,
                item,
                day.and_hms_opt(1, 0, 0).unwrap(),
            );
            op.buffer_id = buffer.map(str::to_string);
            op.plan_qty = qty;
            op
        };
        let ops = vec![
            plan(AllocationType::Allocate, Some("A"), Some("BUF1"), Some(4.0)),
            plan(AllocationType::Setup, None, Some("BUF1"), None),
            plan(AllocationType::Allocate, Some("B"), None, Some(3.0)),
        ];

        let wip = buffer_plan_wip(&ops, "SafetyStock");
        assert_eq!(wip.len(), 1);
        assert_eq!(wip[0].item_id, "A");
        assert_eq!(wip[0].buffer_id, "BUF1");
        assert_eq!(wip[0].qty, 4.0);
    }
}
