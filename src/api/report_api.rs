// ==========================================
// 排产仿真快照分析 - 报表 API
// ==========================================
// 职责: 从快照取表 → 映射实体 → 调用引擎 → 返回报表
// 红线: 必需表缺失时直接失败（fail-closed），不输出部分结果
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::AnalysisConfig;
use crate::domain::{
    BufferWip, CapaUtilization, ItemWip, SetupTransitionCount, ShiftSetupCount, TargetCapa,
};
use crate::engine::shortage::attribution_table;
use crate::engine::{
    buffer_lot_wip, buffer_plan_wip, demand_trend, group_utilization, item_wip, process_output,
    production_oper_ids, resource_utilization, standard_filters, target_capa, CapaFilter,
    DemandTrend, ProcessOutput, SetupTransitionDetector, ShiftSetupCounter, ShortageAttributor,
    ShortageSummary,
};
use crate::snapshot::row_mapper::{
    map_capa_allocations, map_demand_due_quantities, map_demand_lines, map_factory_config,
    map_fulfillment_records, map_lot_events, map_oper_resources, map_resource_masters,
    map_routing_opers, map_scheduled_operations, map_shortage_events, map_target_plans,
};
use crate::snapshot::{
    compare_run_folders, tables, FolderComparison, FolderSnapshotStore, SnapshotStore, Table,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

// ==========================================
// 报表结构
// ==========================================

/// 缺量归因报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortageReport {
    /// DEMAND 列 + ON_TIME_QTY / LATE_QTY / SHORT_QTY / REASON
    pub table: Table,
    pub summary: ShortageSummary,
}

/// 换型前品目报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupTransitionReport {
    pub counts: Vec<SetupTransitionCount>,
    pub repeat_threshold: usize,
    pub repeated: Vec<SetupTransitionCount>,
}

/// 单个过滤视图下的资源组稼动率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationView {
    pub filter: CapaFilter,
    pub rows: Vec<CapaUtilization>,
}

/// 缓冲区在制（实绩 + 计划）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferWipReport {
    pub lot: Vec<BufferWip>,
    pub plan: Vec<BufferWip>,
}

// ==========================================
// ReportApi
// ==========================================
pub struct ReportApi<S: SnapshotStore> {
    store: S,
    config: AnalysisConfig,
}

impl ReportApi<FolderSnapshotStore> {
    /// 打开仿真结果目录
    pub fn open_folder<P: AsRef<Path>>(root: P, config: AnalysisConfig) -> ApiResult<Self> {
        Ok(Self::new(FolderSnapshotStore::open(root)?, config))
    }
}

impl<S: SnapshotStore> ReportApi<S> {
    pub fn new(store: S, config: AnalysisConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn resolve(&self, logical_name: &str) -> ApiResult<Table> {
        Ok(self.store.resolve(logical_name)?)
    }

    // ==========================================
    // 缺量归因
    // ==========================================

    #[instrument(skip(self), fields(locale = %self.config.locale))]
    pub fn shortage_attribution(&self) -> ApiResult<ShortageReport> {
        let demand = self.resolve(tables::DEMAND)?;
        let shipment_plan = self.resolve(tables::SHIPMENT_PLAN)?;
        let short_log = self.resolve(tables::SHORT_LOG)?;

        let demand_lines = map_demand_lines(&demand)?;
        let fulfillment = map_fulfillment_records(&shipment_plan)?;
        let events = map_shortage_events(&short_log)?;

        let attributor = ShortageAttributor::new().with_locale(&self.config.locale);
        let rows = attributor.attribute(&demand_lines, &fulfillment, &events);
        let summary = attributor.summarize(&rows);

        Ok(ShortageReport {
            table: attribution_table(&demand, &rows)?,
            summary,
        })
    }

    // ==========================================
    // 换型分析
    // ==========================================

    #[instrument(skip(self))]
    pub fn setup_transitions(&self) -> ApiResult<SetupTransitionReport> {
        let operations = map_scheduled_operations(&self.resolve(tables::RES_PLAN)?)?;

        let detector =
            SetupTransitionDetector::new().with_repeat_threshold(self.config.repeat_setup_threshold);
        let counts = detector.detect(&operations);
        let repeated = detector.repeated(&counts);

        Ok(SetupTransitionReport {
            counts,
            repeat_threshold: detector.repeat_threshold(),
            repeated,
        })
    }

    #[instrument(skip(self))]
    pub fn shift_setup_counts(&self) -> ApiResult<Vec<ShiftSetupCount>> {
        let factory = map_factory_config(&self.resolve(tables::FACTORY_CONFIG)?)?;
        let operations = map_scheduled_operations(&self.resolve(tables::RES_PLAN)?)?;

        let counter = ShiftSetupCounter::new(self.config.shift_count).ok_or_else(|| {
            ApiError::InvalidInput(format!("shift_count 必须大于 0: {}", self.config.shift_count))
        })?;

        Ok(counter.count(factory.as_ref(), &operations))
    }

    // ==========================================
    // 稼动率
    // ==========================================

    /// 三个标准视图的资源组稼动率
    pub fn group_utilization(&self) -> ApiResult<Vec<UtilizationView>> {
        let rows = map_capa_allocations(&self.resolve(tables::CAPA_ALLOCATION_INFO)?)?;

        Ok(standard_filters()
            .into_iter()
            .map(|filter| UtilizationView {
                rows: group_utilization(&rows, &filter),
                filter,
            })
            .collect())
    }

    pub fn resource_utilization(&self, res_group_id: &str) -> ApiResult<Vec<CapaUtilization>> {
        if res_group_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("RES_GROUP_ID 不能为空".to_string()));
        }
        let rows = map_capa_allocations(&self.resolve(tables::CAPA_ALLOCATION_INFO)?)?;
        let masters = map_resource_masters(&self.resolve(tables::RES_MASTER)?)?;

        if !rows.iter().any(|r| r.res_group_id == res_group_id) {
            return Err(ApiError::NotFound(format!("资源组 {}", res_group_id)));
        }
        Ok(resource_utilization(&rows, res_group_id, &masters))
    }

    // ==========================================
    // 需求 / 在制 / 产出 / 目标
    // ==========================================

    pub fn demand_trend(&self) -> ApiResult<DemandTrend> {
        let due = map_demand_due_quantities(&self.resolve(tables::DEMAND)?)?;
        Ok(demand_trend(&due))
    }

    pub fn item_wip(&self) -> ApiResult<Vec<ItemWip>> {
        let events = map_lot_events(&self.resolve(tables::LOT_HISTORY)?)?;
        Ok(item_wip(&events))
    }

    pub fn buffer_wip(&self) -> ApiResult<BufferWipReport> {
        let events = map_lot_events(&self.resolve(tables::LOT_HISTORY)?)?;
        let operations = map_scheduled_operations(&self.resolve(tables::RES_PLAN)?)?;
        let prefix = self.config.safety_stock_prefix.as_str();

        Ok(BufferWipReport {
            lot: buffer_lot_wip(&events, prefix),
            plan: buffer_plan_wip(&operations, prefix),
        })
    }

    pub fn production_oper_ids(&self) -> ApiResult<Vec<String>> {
        let operations = map_scheduled_operations(&self.resolve(tables::RES_PLAN)?)?;
        Ok(production_oper_ids(&operations))
    }

    pub fn process_output(&self, oper_id: &str) -> ApiResult<ProcessOutput> {
        let operations = map_scheduled_operations(&self.resolve(tables::RES_PLAN)?)?;
        if !production_oper_ids(&operations).iter().any(|o| o == oper_id) {
            return Err(ApiError::NotFound(format!("工序 {}", oper_id)));
        }
        Ok(process_output(&operations, oper_id))
    }

    pub fn target_capa(&self) -> ApiResult<Vec<TargetCapa>> {
        let targets = map_target_plans(&self.resolve(tables::TARGET_PLAN)?)?;
        let routing_opers = map_routing_opers(&self.resolve(tables::ROUTING_OPER)?)?;
        let oper_resources = map_oper_resources(&self.resolve(tables::OPER_RES)?)?;

        Ok(target_capa(&targets, &routing_opers, &oper_resources))
    }
}

// ==========================================
// 仿真结果目录对比
// ==========================================

/// 对比两个仿真结果目录；同一目录对比视为无效输入
pub fn compare_runs(left: &Path, right: &Path) -> ApiResult<Vec<FolderComparison>> {
    let same = match (left.canonicalize(), right.canonicalize()) {
        (Ok(l), Ok(r)) => l == r,
        _ => left == right,
    };
    if same {
        return Err(ApiError::InvalidInput(format!(
            "不能与自身对比: {}",
            left.display()
        )));
    }

    let result = compare_run_folders(left, right)?;
    info!(
        left = %left.display(),
        right = %right.display(),
        differing_files = result.iter().map(|c| c.diff_count).sum::<usize>(),
        "目录对比完成"
    );
    Ok(result)
}
