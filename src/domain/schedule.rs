// ==========================================
// 排产仿真快照分析 - 资源计划实体
// ==========================================
// 来源快照: RES_PLAN
// ==========================================

use crate::domain::types::{AllocationType, Shift};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// ScheduledOperation - 资源计划行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledOperation {
    pub res_group_id: String,
    pub res_id: String,
    pub plan_date: NaiveDate,
    pub allocation_type: AllocationType,
    /// Setup 行在快照中通常为空
    pub item_id: Option<String>,
    /// 分区内的排序键；为空的行排在分区末尾
    pub start_datetime: Option<NaiveDateTime>,
    pub end_datetime: Option<NaiveDateTime>,
    pub oper_id: Option<String>,
    pub plan_qty: Option<f64>,
    pub demand_id: Option<String>,
    pub buffer_id: Option<String>,
}

impl ScheduledOperation {
    pub fn new(
        res_group_id: impl Into<String>,
        res_id: impl Into<String>,
        plan_date: NaiveDate,
        allocation_type: AllocationType,
        item_id: Option<&str>,
        start_datetime: NaiveDateTime,
    ) -> Self {
        Self {
            res_group_id: res_group_id.into(),
            res_id: res_id.into(),
            plan_date,
            allocation_type,
            item_id: item_id.map(str::to_string),
            start_datetime: Some(start_datetime),
            end_datetime: None,
            oper_id: None,
            plan_qty: None,
            demand_id: None,
            buffer_id: None,
        }
    }

    pub fn is_setup(&self) -> bool {
        self.allocation_type == AllocationType::Setup
    }

    /// 分区键 (res_group_id, res_id, plan_date)
    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey {
            res_group_id: self.res_group_id.clone(),
            res_id: self.res_id.clone(),
            plan_date: self.plan_date,
        }
    }
}

/// 资源-日期分区键
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartitionKey {
    pub res_group_id: String,
    pub res_id: String,
    pub plan_date: NaiveDate,
}

// ==========================================
// SetupTransitionCount - 换型前品目统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SetupTransitionCount {
    pub res_group_id: String,
    pub res_id: String,
    pub plan_date: NaiveDate,
    pub from_item_id: String,
    pub count: usize,
}

// ==========================================
// ShiftSetupCount - 班次换型次数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSetupCount {
    pub res_group_id: String,
    pub res_id: String,
    pub plan_date: NaiveDate,
    pub shift: Shift,
    pub count: usize,
}

// ==========================================
// FactoryConfig - 工厂班次配置
// ==========================================
// 来源快照: FACTORY_CONFIG（只取第一行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryConfig {
    pub factory_start_time: Option<NaiveTime>,
    pub shift_names: Vec<String>,
}
