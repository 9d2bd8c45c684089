// ==========================================
// 排产仿真快照分析 - 批次/在制品实体
// ==========================================
// 来源快照: LOT_HISTORY
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 批次事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotEvent {
    pub event_type: String,
    pub event_datetime: NaiveDateTime,
    pub item_id: String,
    pub lot_qty: f64,
    pub demand_id: Option<String>,
    pub buffer_id: Option<String>,
}

impl LotEvent {
    pub fn is_creation(&self) -> bool {
        self.event_type == "Creation"
    }
}

/// 日别品目在制品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemWip {
    pub date: NaiveDate,
    pub item_id: String,
    pub qty: f64,
}

/// 日别品目-缓冲区在制品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferWip {
    pub date: NaiveDate,
    pub item_id: String,
    pub buffer_id: String,
    pub qty: f64,
}

/// 时间桶汇总（带累计）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodQty {
    /// 桶起始日 (日: 当天 / 周: 周一 / 月: 1 日)
    pub period_start: NaiveDate,
    pub qty: f64,
    pub cumulative_qty: f64,
}
