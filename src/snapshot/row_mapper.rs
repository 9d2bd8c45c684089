// ==========================================
// 排产仿真快照分析 - 行映射器
// ==========================================
// 职责: 快照表 → 领域实体 + 类型转换
// 约定: 必需列缺失 → MissingColumn；非空但无法解析 → TypeConversionError
//       数量列为空视为 0
// ==========================================

use crate::domain::{
    AllocationType, CapaAllocation, CapaBreakdown, DemandLine, FactoryConfig, FulfillmentRecord,
    LotEvent, OperResource, ResourceMaster, RoutingOper, ScheduledOperation, ShortReason,
    ShortageEvent, TargetPlan,
};
use crate::snapshot::error::{SnapshotError, SnapshotResult};
use crate::snapshot::table::Table;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y%m%d%H%M%S",
];

/// 解析日期；带时间部分时取日期
pub fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
        .or_else(|| parse_datetime_text(value).map(|dt| dt.date()))
}

/// 解析日期时间；纯日期视为当天 00:00
pub fn parse_datetime_text(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// 解析时刻 (HH:MM:SS / HH:MM)
pub fn parse_time_text(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

// ==========================================
// FieldMapper - 单表字段读取
// ==========================================
struct FieldMapper<'a> {
    table: &'a Table,
}

impl<'a> FieldMapper<'a> {
    fn new(table: &'a Table) -> Self {
        Self { table }
    }

    fn required(&self, column: &str) -> SnapshotResult<usize> {
        self.table.require_column(column)
    }

    fn optional(&self, column: &str) -> Option<usize> {
        self.table.column_index(column)
    }

    /// 非空字符串
    fn get_string(&self, row: usize, col: Option<usize>) -> Option<String> {
        let value = self.table.cell(row, col?);
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// 字符串（空值为空串）
    fn get_text(&self, row: usize, col: usize) -> String {
        self.table.cell(row, col).to_string()
    }

    fn conversion_error(&self, row: usize, col: usize) -> SnapshotError {
        SnapshotError::TypeConversionError {
            table: self.table.name().to_string(),
            row: row + 1,
            field: self.table.columns()[col].clone(),
            value: self.table.cell(row, col).to_string(),
        }
    }

    fn parse_f64(&self, row: usize, col: usize) -> SnapshotResult<Option<f64>> {
        match self.get_string(row, Some(col)) {
            None => Ok(None),
            Some(value) => value
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.conversion_error(row, col)),
        }
    }

    /// 数量列，空值视为 0
    fn parse_qty(&self, row: usize, col: usize) -> SnapshotResult<f64> {
        Ok(self.parse_f64(row, col)?.unwrap_or(0.0))
    }

    fn parse_date(&self, row: usize, col: usize) -> SnapshotResult<Option<NaiveDate>> {
        match self.get_string(row, Some(col)) {
            None => Ok(None),
            Some(value) => parse_date_text(&value)
                .map(Some)
                .ok_or_else(|| self.conversion_error(row, col)),
        }
    }

    fn parse_datetime(&self, row: usize, col: usize) -> SnapshotResult<Option<NaiveDateTime>> {
        match self.get_string(row, Some(col)) {
            None => Ok(None),
            Some(value) => parse_datetime_text(&value)
                .map(Some)
                .ok_or_else(|| self.conversion_error(row, col)),
        }
    }
}

// ==========================================
// DEMAND
// ==========================================
pub fn map_demand_lines(table: &Table) -> SnapshotResult<Vec<DemandLine>> {
    let m = FieldMapper::new(table);
    let id_col = m.required("DEMAND_ID")?;
    let qty_col = m.required("DEMAND_QTY")?;

    (0..table.len())
        .map(|row| {
            Ok(DemandLine {
                demand_id: m.get_text(row, id_col),
                demand_qty: m.parse_qty(row, qty_col)?,
                columns: table.row_pairs(row),
            })
        })
        .collect()
}

/// DEMAND 中的交期数量 (DUE_DATE, DEMAND_QTY)；无交期的行跳过
pub fn map_demand_due_quantities(table: &Table) -> SnapshotResult<Vec<(NaiveDate, f64)>> {
    let m = FieldMapper::new(table);
    let due_col = m.required("DUE_DATE")?;
    let qty_col = m.required("DEMAND_QTY")?;

    let mut out = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        if let Some(due) = m.parse_date(row, due_col)? {
            out.push((due, m.parse_qty(row, qty_col)?));
        }
    }
    Ok(out)
}

// ==========================================
// SHIPMENT_PLAN
// ==========================================
pub fn map_fulfillment_records(table: &Table) -> SnapshotResult<Vec<FulfillmentRecord>> {
    let m = FieldMapper::new(table);
    let id_col = m.required("DEMAND_ID")?;
    let on_time_col = m.required("ON_TIME_QTY")?;
    let late_col = m.required("LATE_QTY")?;

    (0..table.len())
        .map(|row| {
            Ok(FulfillmentRecord {
                demand_id: m.get_text(row, id_col),
                on_time_qty: m.parse_qty(row, on_time_col)?,
                late_qty: m.parse_qty(row, late_col)?,
            })
        })
        .collect()
}

// ==========================================
// SHORT_LOG
// ==========================================
pub fn map_shortage_events(table: &Table) -> SnapshotResult<Vec<ShortageEvent>> {
    let m = FieldMapper::new(table);
    let id_col = m.required("DEMAND_ID")?;
    let reason_col = m.required("SHORT_REASON")?;
    let oper_col = m.optional("OPER_ID");

    Ok((0..table.len())
        .map(|row| ShortageEvent {
            demand_id: m.get_text(row, id_col),
            short_reason: ShortReason::from_code(&m.get_text(row, reason_col)),
            oper_id: m.get_string(row, oper_col),
        })
        .collect())
}

// ==========================================
// RES_PLAN
// ==========================================
pub fn map_scheduled_operations(table: &Table) -> SnapshotResult<Vec<ScheduledOperation>> {
    let m = FieldMapper::new(table);
    let group_col = m.required("RES_GROUP_ID")?;
    let res_col = m.required("RES_ID")?;
    let date_col = m.required("PLAN_DATE")?;
    let type_col = m.required("ALLOCATION_TYPE")?;
    let start_col = m.required("START_DATETIME")?;
    let item_col = m.optional("ITEM_ID");
    let end_col = m.optional("END_DATETIME").or_else(|| m.optional("RES_END_DATETIME"));
    let oper_col = m.optional("OPER_ID");
    let qty_col = m.optional("PLAN_QTY");
    let demand_col = m.optional("DEMAND_ID");
    let buffer_col = m.optional("BUFFER_ID");

    let mut out = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let Some(plan_date) = m.parse_date(row, date_col)? else {
            debug!(row = row + 1, "RES_PLAN 行缺少 PLAN_DATE，跳过");
            continue;
        };

        let start_datetime = m.parse_datetime(row, start_col)?;

        let end_datetime = match end_col {
            Some(col) => m.parse_datetime(row, col)?,
            None => None,
        };
        let plan_qty = match qty_col {
            Some(col) => m.parse_f64(row, col)?,
            None => None,
        };

        out.push(ScheduledOperation {
            res_group_id: m.get_text(row, group_col),
            res_id: m.get_text(row, res_col),
            plan_date,
            allocation_type: AllocationType::from_code(&m.get_text(row, type_col)),
            item_id: m.get_string(row, item_col),
            start_datetime,
            end_datetime,
            oper_id: m.get_string(row, oper_col),
            plan_qty,
            demand_id: m.get_string(row, demand_col),
            buffer_id: m.get_string(row, buffer_col),
        });
    }
    Ok(out)
}

// ==========================================
// FACTORY_CONFIG
// ==========================================
/// 取第一行；空表返回 None
pub fn map_factory_config(table: &Table) -> SnapshotResult<Option<FactoryConfig>> {
    let m = FieldMapper::new(table);
    let start_col = m.required("FACTORY_START_TIME")?;
    let shift_col = m.optional("SHIFT_NAME");

    if table.is_empty() {
        return Ok(None);
    }

    let shift_names = m
        .get_string(0, shift_col)
        .map(|names| {
            names
                .split(',')
                .map(|n| n.replace(' ', ""))
                .filter(|n| !n.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(FactoryConfig {
        factory_start_time: m.get_string(0, Some(start_col)).and_then(|v| parse_time_text(&v)),
        shift_names,
    }))
}

// ==========================================
// CAPA_ALLOCATION_INFO / RES_MASTER
// ==========================================
pub fn map_capa_allocations(table: &Table) -> SnapshotResult<Vec<CapaAllocation>> {
    let m = FieldMapper::new(table);
    let group_col = m.required("RES_GROUP_ID")?;
    let total_col = m.required("TOTAL_CAPA")?;
    let off_col = m.required("OFF_TIME_CAPA")?;
    let alloc_col = m.required("ALLOCATION_CAPA")?;
    let pm_col = m.required("PM_CAPA")?;
    let setup_col = m.required("SETUP_CAPA")?;
    let remain_col = m.required("REMAIN_CAPA")?;
    let target_col = m.optional("TARGET_ID");
    let target_type_col = m.optional("TARGET_TYPE");
    let capa_type_col = m.optional("CAPA_TYPE");

    (0..table.len())
        .map(|row| {
            Ok(CapaAllocation {
                res_group_id: m.get_text(row, group_col),
                target_id: m.get_string(row, target_col).unwrap_or_default(),
                target_type: m.get_string(row, target_type_col).unwrap_or_default(),
                capa_type: m.get_string(row, capa_type_col).unwrap_or_default(),
                capa: CapaBreakdown {
                    total_capa: m.parse_qty(row, total_col)?,
                    off_time_capa: m.parse_qty(row, off_col)?,
                    allocation_capa: m.parse_qty(row, alloc_col)?,
                    pm_capa: m.parse_qty(row, pm_col)?,
                    setup_capa: m.parse_qty(row, setup_col)?,
                    remain_capa: m.parse_qty(row, remain_col)?,
                },
            })
        })
        .collect()
}

pub fn map_resource_masters(table: &Table) -> SnapshotResult<Vec<ResourceMaster>> {
    let m = FieldMapper::new(table);
    let id_col = m.required("RES_ID")?;
    let name_col = m.optional("RES_NAME");

    Ok((0..table.len())
        .map(|row| ResourceMaster {
            res_id: m.get_text(row, id_col),
            res_name: m.get_string(row, name_col),
        })
        .collect())
}

// ==========================================
// LOT_HISTORY
// ==========================================
/// 事件时间为空的行跳过
pub fn map_lot_events(table: &Table) -> SnapshotResult<Vec<LotEvent>> {
    let m = FieldMapper::new(table);
    let type_col = m.required("EVENT_TYPE")?;
    let time_col = m.required("EVENT_DATETIME")?;
    let item_col = m.required("ITEM_ID")?;
    let qty_col = m.required("LOT_QTY")?;
    let demand_col = m.optional("DEMAND_ID");
    let buffer_col = m.optional("BUFFER_ID");

    let mut out = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let Some(event_datetime) = m.parse_datetime(row, time_col)? else {
            continue;
        };
        out.push(LotEvent {
            event_type: m.get_text(row, type_col),
            event_datetime,
            item_id: m.get_text(row, item_col),
            lot_qty: m.parse_qty(row, qty_col)?,
            demand_id: m.get_string(row, demand_col),
            buffer_id: m.get_string(row, buffer_col),
        });
    }
    Ok(out)
}

// ==========================================
// TARGET_PLAN / ROUTING_OPER / OPER_RES
// ==========================================
pub fn map_target_plans(table: &Table) -> SnapshotResult<Vec<TargetPlan>> {
    let m = FieldMapper::new(table);
    let item_col = m.required("ITEM_ID")?;
    let in_out_col = m.required("IN_OUT")?;
    let routing_col = m.required("ROUTING_ID")?;
    let oper_col = m.required("OPER_ID")?;
    let qty_col = m.required("TARGET_QTY")?;

    (0..table.len())
        .map(|row| {
            Ok(TargetPlan {
                item_id: m.get_text(row, item_col),
                in_out: m.get_text(row, in_out_col),
                routing_id: m.get_string(row, Some(routing_col)),
                oper_id: m.get_string(row, Some(oper_col)),
                target_qty: m.parse_qty(row, qty_col)?,
            })
        })
        .collect()
}

pub fn map_routing_opers(table: &Table) -> SnapshotResult<Vec<RoutingOper>> {
    let m = FieldMapper::new(table);
    let routing_col = m.required("ROUTING_ID")?;
    let oper_col = m.required("OPER_ID")?;
    let type_col = m.optional("OPER_TYPE");

    Ok((0..table.len())
        .map(|row| RoutingOper {
            routing_id: m.get_text(row, routing_col),
            oper_id: m.get_text(row, oper_col),
            oper_type: m.get_string(row, type_col),
        })
        .collect())
}

pub fn map_oper_resources(table: &Table) -> SnapshotResult<Vec<OperResource>> {
    let m = FieldMapper::new(table);
    let routing_col = m.required("ROUTING_ID")?;
    let oper_col = m.required("OPER_ID")?;
    let usage_col = m.required("USAGE_PER")?;

    (0..table.len())
        .map(|row| {
            Ok(OperResource {
                routing_id: m.get_text(row, routing_col),
                oper_id: m.get_text(row, oper_col),
                usage_per: m.parse_f64(row, usage_col)?,
            })
        })
        .collect()
}
