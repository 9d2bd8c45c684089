// ==========================================
// 排产仿真快照分析 - 目标/工艺路线实体
// ==========================================
// 来源快照: TARGET_PLAN / ROUTING_OPER / OPER_RES
// ==========================================

use serde::{Deserialize, Serialize};

/// 目标计划行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPlan {
    pub item_id: String,
    pub in_out: String,
    pub routing_id: Option<String>,
    pub oper_id: Option<String>,
    pub target_qty: f64,
}

/// 工艺路线工序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingOper {
    pub routing_id: String,
    pub oper_id: String,
    pub oper_type: Option<String>,
}

/// 工序-设备
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperResource {
    pub routing_id: String,
    pub oper_id: String,
    /// 单件占用秒数（快照中可能为空）
    pub usage_per: Option<f64>,
}

/// 目标 vs 产能
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCapa {
    pub item_id: String,
    pub target_qty: f64,
    pub res_count: usize,
    pub avg_usage_per: Option<f64>,
    /// 86400 / avg_usage_per
    pub daily_max_output: Option<f64>,
}
