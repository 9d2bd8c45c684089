// ==========================================
// 排产仿真快照分析 - 需求/出货/缺量实体
// ==========================================
// 来源快照: DEMAND / SHIPMENT_PLAN / SHORT_LOG
// ==========================================

use crate::domain::types::ShortReason;
use serde::{Deserialize, Serialize};

// ==========================================
// DemandLine - 需求行
// ==========================================
// 只读: 派生属性一律写入 ShortageAttribution，不回写本结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandLine {
    pub demand_id: String,
    pub demand_qty: f64,
    /// 原始列 (列名, 原值)，保持快照中的列顺序
    pub columns: Vec<(String, String)>,
}

impl DemandLine {
    pub fn new(demand_id: impl Into<String>, demand_qty: f64) -> Self {
        let demand_id = demand_id.into();
        Self {
            columns: vec![
                ("DEMAND_ID".to_string(), demand_id.clone()),
                ("DEMAND_QTY".to_string(), demand_qty.to_string()),
            ],
            demand_id,
            demand_qty,
        }
    }

    /// 按列名取原值
    pub fn column(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

// ==========================================
// FulfillmentRecord - 出货计划行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentRecord {
    pub demand_id: String,
    pub on_time_qty: f64,
    pub late_qty: f64,
}

impl FulfillmentRecord {
    pub fn new(demand_id: impl Into<String>, on_time_qty: f64, late_qty: f64) -> Self {
        Self {
            demand_id: demand_id.into(),
            on_time_qty,
            late_qty,
        }
    }
}

// ==========================================
// ShortageEvent - 引擎缺量日志
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortageEvent {
    pub demand_id: String,
    pub short_reason: ShortReason,
    /// 发生缺量的工序（仅设备相关原因携带）
    pub oper_id: Option<String>,
}

impl ShortageEvent {
    pub fn new(demand_id: impl Into<String>, short_reason: ShortReason, oper_id: Option<&str>) -> Self {
        Self {
            demand_id: demand_id.into(),
            short_reason,
            oper_id: oper_id.map(str::to_string),
        }
    }
}

// ==========================================
// ShortageAttribution - 缺量归因结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortageAttribution {
    pub demand_id: String,
    pub demand_qty: f64,
    pub on_time_qty: f64,
    pub late_qty: f64,
    /// demand_qty - (on_time_qty + late_qty)，负数表示超额满足
    pub short_qty: f64,
    /// 命中的原因代码（未命中或未缺量为 None）
    pub reason_code: Option<ShortReason>,
    /// 原因说明，未缺量或未归类时为空串
    pub reason: String,
    /// 原始需求列
    pub columns: Vec<(String, String)>,
}

impl ShortageAttribution {
    pub fn is_short(&self) -> bool {
        self.short_qty > 0.0
    }

    /// 缺量但没有任何规则命中
    pub fn is_unclassified(&self) -> bool {
        self.is_short() && self.reason.is_empty()
    }
}
