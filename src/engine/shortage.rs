// ==========================================
// 排产仿真快照分析 - 缺量原因归因引擎
// ==========================================
// 输入: DEMAND + SHIPMENT_PLAN + SHORT_LOG
// 输出: 每个需求行一条 ShortageAttribution
// ==========================================
// 规则: 原因按优先级顺序匹配，先命中者生效，后续规则不覆盖
//       short_qty <= 0 的行原因恒为空
// ==========================================

use crate::domain::{DemandLine, FulfillmentRecord, ShortReason, ShortageAttribution, ShortageEvent};
use crate::snapshot::error::SnapshotResult;
use crate::snapshot::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// 缺少 OPER_ID 时的占位
pub const UNKNOWN_OPER: &str = "UNKNOWN";

/// 归因输出追加的列（紧跟 DEMAND_QTY）
pub const ATTRIBUTION_COLUMNS: [&str; 4] = ["ON_TIME_QTY", "LATE_QTY", "SHORT_QTY", "REASON"];

/// 汇总中未归类缺量的桶名
pub const UNCLASSIFIED_BUCKET: &str = "Unclassified";

// ==========================================
// ReasonRule - 单条原因规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonRule {
    pub reason: ShortReason,
}

impl ReasonRule {
    pub fn new(reason: ShortReason) -> Self {
        Self { reason }
    }

    /// 该需求的缺量日志中是否有本规则的原因
    pub fn matches(&self, events: &[&ShortageEvent]) -> bool {
        events.iter().any(|e| e.short_reason == self.reason)
    }

    /// 命中时生成原因说明
    ///
    /// 多条同原因日志时取字典序最小的非空 OPER_ID，与输入行顺序无关
    pub fn explain(&self, events: &[&ShortageEvent], locale: &str) -> Option<String> {
        if !self.matches(events) {
            return None;
        }

        let oper_id = events
            .iter()
            .filter(|e| e.short_reason == self.reason)
            .filter_map(|e| e.oper_id.as_deref())
            .filter(|o| !o.is_empty())
            .min()
            .unwrap_or(UNKNOWN_OPER);

        Some(render_reason(&self.reason, oper_id, locale))
    }
}

/// 原因说明文案（rust-i18n，locale 显式传入）
pub fn render_reason(reason: &ShortReason, oper_id: &str, locale: &str) -> String {
    match reason {
        ShortReason::NoOpResourceInfo => {
            rust_i18n::t!("shortage.no_op_resource_info", locale = locale, oper_id = oper_id)
                .to_string()
        }
        ShortReason::NoBwBomPathShort => {
            rust_i18n::t!("shortage.no_bw_bom_path_short", locale = locale).to_string()
        }
        ShortReason::LackOfResourceCapacity => {
            rust_i18n::t!("shortage.lack_of_resource_capacity", locale = locale, oper_id = oper_id)
                .to_string()
        }
        ShortReason::RemainingLots => {
            rust_i18n::t!("shortage.remaining_lots", locale = locale).to_string()
        }
        ShortReason::Other(code) => {
            rust_i18n::t!("shortage.other", locale = locale, code = code).to_string()
        }
    }
}

/// 默认优先级: NoOpResourceInfo > NoBwBomPathShort > LackOfResourceCapacity > RemainingLots
pub fn default_cascade() -> Vec<ReasonRule> {
    vec![
        ReasonRule::new(ShortReason::NoOpResourceInfo),
        ReasonRule::new(ShortReason::NoBwBomPathShort),
        ReasonRule::new(ShortReason::LackOfResourceCapacity),
        ReasonRule::new(ShortReason::RemainingLots),
    ]
}

// ==========================================
// 缺量汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonBucket {
    /// 原因代码，未归类为 "Unclassified"
    pub reason_code: String,
    pub line_count: usize,
    pub short_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortageSummary {
    pub total_lines: usize,
    pub short_lines: usize,
    pub total_short_qty: f64,
    /// 按规则优先级排列，未归类桶在最后
    pub buckets: Vec<ReasonBucket>,
}

// ==========================================
// ShortageAttributor - 缺量归因引擎
// ==========================================
pub struct ShortageAttributor {
    rules: Vec<ReasonRule>,
    locale: String,
}

impl Default for ShortageAttributor {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortageAttributor {
    /// 默认规则链 + 英文文案
    pub fn new() -> Self {
        Self {
            rules: default_cascade(),
            locale: "en".to_string(),
        }
    }

    /// 自定义规则链（顺序即优先级）
    pub fn with_rules(rules: Vec<ReasonRule>) -> Self {
        Self {
            rules,
            locale: "en".to_string(),
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    pub fn rules(&self) -> &[ReasonRule] {
        &self.rules
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算每个需求行的缺量与原因
    ///
    /// 输出顺序与 demand_lines 一致；无出货记录的需求按 0 处理
    #[instrument(skip_all, fields(
        demand = demand_lines.len(),
        fulfillment = fulfillment_records.len(),
        events = shortage_events.len()
    ))]
    pub fn attribute(
        &self,
        demand_lines: &[DemandLine],
        fulfillment_records: &[FulfillmentRecord],
        shortage_events: &[ShortageEvent],
    ) -> Vec<ShortageAttribution> {
        // 1. 出货按 DEMAND_ID 汇总
        let mut shipped: HashMap<&str, (f64, f64)> = HashMap::new();
        for record in fulfillment_records {
            let entry = shipped.entry(record.demand_id.as_str()).or_insert((0.0, 0.0));
            entry.0 += record.on_time_qty;
            entry.1 += record.late_qty;
        }

        // 2. 缺量日志按 DEMAND_ID 分组
        let mut events_by_demand: HashMap<&str, Vec<&ShortageEvent>> = HashMap::new();
        for event in shortage_events {
            events_by_demand
                .entry(event.demand_id.as_str())
                .or_default()
                .push(event);
        }

        // 3. 逐行计算
        let result: Vec<ShortageAttribution> = demand_lines
            .iter()
            .map(|line| {
                let (on_time_qty, late_qty) = shipped
                    .get(line.demand_id.as_str())
                    .copied()
                    .unwrap_or((0.0, 0.0));
                let short_qty = line.demand_qty - (on_time_qty + late_qty);

                let (reason_code, reason) = if short_qty > 0.0 {
                    let events = events_by_demand
                        .get(line.demand_id.as_str())
                        .map(Vec::as_slice)
                        .unwrap_or(&[]);
                    self.classify(events)
                } else {
                    (None, String::new())
                };

                if short_qty > 0.0 && reason.is_empty() {
                    debug!(demand_id = %line.demand_id, short_qty, "缺量未命中任何原因规则");
                }

                ShortageAttribution {
                    demand_id: line.demand_id.clone(),
                    demand_qty: line.demand_qty,
                    on_time_qty,
                    late_qty,
                    short_qty,
                    reason_code,
                    reason,
                    columns: line.columns.clone(),
                }
            })
            .collect();

        info!(
            short_lines = result.iter().filter(|a| a.is_short()).count(),
            unclassified = result.iter().filter(|a| a.is_unclassified()).count(),
            "缺量归因完成"
        );

        result
    }

    /// 规则链求值：第一条命中的规则生效
    pub fn classify(&self, events: &[&ShortageEvent]) -> (Option<ShortReason>, String) {
        self.rules
            .iter()
            .find_map(|rule| {
                rule.explain(events, &self.locale)
                    .map(|text| (Some(rule.reason.clone()), text))
            })
            .unwrap_or((None, String::new()))
    }

    /// 缺量按原因汇总
    pub fn summarize(&self, attributions: &[ShortageAttribution]) -> ShortageSummary {
        let mut buckets: Vec<ReasonBucket> = self
            .rules
            .iter()
            .map(|rule| ReasonBucket {
                reason_code: rule.reason.code().to_string(),
                line_count: 0,
                short_qty: 0.0,
            })
            .collect();
        let mut unclassified = ReasonBucket {
            reason_code: UNCLASSIFIED_BUCKET.to_string(),
            line_count: 0,
            short_qty: 0.0,
        };

        for a in attributions.iter().filter(|a| a.is_short()) {
            let bucket = a
                .reason_code
                .as_ref()
                .and_then(|code| buckets.iter_mut().find(|b| b.reason_code == code.code()))
                .unwrap_or(&mut unclassified);
            bucket.line_count += 1;
            bucket.short_qty += a.short_qty;
        }
        buckets.push(unclassified);

        let short: Vec<&ShortageAttribution> =
            attributions.iter().filter(|a| a.is_short()).collect();
        ShortageSummary {
            total_lines: attributions.len(),
            short_lines: short.len(),
            total_short_qty: short.iter().map(|a| a.short_qty).sum(),
            buckets,
        }
    }
}

/// 结果表列顺序: DEMAND 列(至 DEMAND_QTY) + 归因列 + 其余 DEMAND 列
pub fn attribution_table(demand: &Table, rows: &[ShortageAttribution]) -> SnapshotResult<Table> {
    let split = demand.require_column("DEMAND_QTY")? + 1;
    let (head, tail) = demand.columns().split_at(split);

    let mut columns: Vec<String> = head.to_vec();
    columns.extend(ATTRIBUTION_COLUMNS.iter().map(|c| c.to_string()));
    columns.extend(tail.iter().cloned());

    let mut table = Table::new(demand.name(), columns);
    for a in rows {
        let values: Vec<String> = a.columns.iter().map(|(_, v)| v.clone()).collect();
        let (head_values, tail_values) = values.split_at(split.min(values.len()));

        let mut row: Vec<String> = head_values.to_vec();
        row.push(a.on_time_qty.to_string());
        row.push(a.late_qty.to_string());
        row.push(a.short_qty.to_string());
        row.push(a.reason.clone());
        row.extend(tail_values.iter().cloned());
        table.push_row(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(demand_id: &str, reason: ShortReason, oper_id: Option<&str>) -> ShortageEvent {
        ShortageEvent::new(demand_id, reason, oper_id)
    }

    #[test]
    fn test_rule_explain_picks_smallest_oper_id() {
        let rule = ReasonRule::new(ShortReason::LackOfResourceCapacity);
        let e1 = event("D1", ShortReason::LackOfResourceCapacity, Some("OP9"));
        let e2 = event("D1", ShortReason::LackOfResourceCapacity, Some("OP2"));
        let e3 = event("D1", ShortReason::NoOpResourceInfo, Some("OP1"));

        let text = rule.explain(&[&e1, &e2, &e3], "en").unwrap();
        assert_eq!(text, "OP2 has insufficient resource capacity");
    }

    #[test]
    fn test_rule_explain_no_match() {
        let rule = ReasonRule::new(ShortReason::NoBwBomPathShort);
        let e1 = event("D1", ShortReason::RemainingLots, None);
        assert_eq!(rule.explain(&[&e1], "en"), None);
        assert_eq!(rule.explain(&[], "en"), None);
    }

    #[test]
    fn test_rule_explain_missing_oper_id() {
        let rule = ReasonRule::new(ShortReason::NoOpResourceInfo);
        let e1 = event("D1", ShortReason::NoOpResourceInfo, None);
        assert_eq!(
            rule.explain(&[&e1], "en").unwrap(),
            "UNKNOWN has no usable resource"
        );
    }

    #[test]
    fn test_each_default_rule_text() {
        let cases = [
            (ShortReason::NoOpResourceInfo, "OP5 has no usable resource"),
            (
                ShortReason::NoBwBomPathShort,
                "no BOM path could be expanded to this input",
            ),
            (
                ShortReason::LackOfResourceCapacity,
                "OP5 has insufficient resource capacity",
            ),
            (
                ShortReason::RemainingLots,
                "residual quantity unproduced within the planning horizon; extending the horizon may allow production",
            ),
        ];
        for (reason, expected) in cases {
            assert_eq!(render_reason(&reason, "OP5", "en"), expected);
        }
    }

    #[test]
    fn test_korean_locale_text() {
        assert_eq!(
            render_reason(&ShortReason::NoOpResourceInfo, "OP5", "ko"),
            "OP5 공정에서 사용 할 수 있는 설비가 없음"
        );
    }

    #[test]
    fn test_classify_priority_is_independent_of_event_order() {
        let attributor = ShortageAttributor::new();
        let lots = event("D1", ShortReason::RemainingLots, None);
        let no_op = event("D1", ShortReason::NoOpResourceInfo, Some("OP1"));

        let (code_a, text_a) = attributor.classify(&[&lots, &no_op]);
        let (code_b, text_b) = attributor.classify(&[&no_op, &lots]);

        assert_eq!(code_a, Some(ShortReason::NoOpResourceInfo));
        assert_eq!(code_a, code_b);
        assert_eq!(text_a, text_b);
    }

    #[test]
    fn test_custom_cascade_order() {
        let attributor = ShortageAttributor::with_rules(vec![
            ReasonRule::new(ShortReason::RemainingLots),
            ReasonRule::new(ShortReason::NoOpResourceInfo),
        ]);
        let lots = event("D1", ShortReason::RemainingLots, None);
        let no_op = event("D1", ShortReason::NoOpResourceInfo, Some("OP1"));

        let (code, _) = attributor.classify(&[&no_op, &lots]);
        assert_eq!(code, Some(ShortReason::RemainingLots));
    }

    #[test]
    fn test_unknown_reason_is_unclassified_by_default() {
        let attributor = ShortageAttributor::new();
        let other = event("D1", ShortReason::from_code("MaterialShort"), None);
        assert_eq!(attributor.classify(&[&other]), (None, String::new()));
    }

    #[test]
    fn test_summarize_buckets() {
        let attributor = ShortageAttributor::new();
        let lines = vec![
            DemandLine::new("D1", 100.0),
            DemandLine::new("D2", 10.0),
            DemandLine::new("D3", 5.0),
        ];
        let events = vec![event("D1", ShortReason::NoBwBomPathShort, None)];
        let rows = attributor.attribute(&lines, &[], &events);

        let summary = attributor.summarize(&rows);
        assert_eq!(summary.total_lines, 3);
        assert_eq!(summary.short_lines, 3);
        assert_eq!(summary.total_short_qty, 115.0);

        let bom = summary
            .buckets
            .iter()
            .find(|b| b.reason_code == "NoBwBomPathShort")
            .unwrap();
        assert_eq!((bom.line_count, bom.short_qty), (1, 100.0));

        let last = summary.buckets.last().unwrap();
        assert_eq!(last.reason_code, UNCLASSIFIED_BUCKET);
        assert_eq!((last.line_count, last.short_qty), (2, 15.0));
    }
}
