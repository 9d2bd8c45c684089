// ==========================================
// 排产仿真快照分析 - 引擎层
// ==========================================
// 职责: 纯函数式分析，不做 I/O，输入快照实体、输出分析实体
// 红线: 所有缺量结论必须带 reason（未归类时为空串，不报错）
// ==========================================

pub mod demand_trend;
pub mod process_output;
pub mod setup_shift;
pub mod setup_transition;
pub mod shortage;
pub mod target_capa;
pub mod time_bucket;
pub mod utilization;
pub mod wip;

// 重导出核心引擎
pub use demand_trend::{demand_trend, DemandTrend};
pub use process_output::{process_output, production_oper_ids, ProcessOutput};
pub use setup_shift::{ShiftSetupCounter, ShiftWindow};
pub use setup_transition::{LabeledSetup, SetupTransitionDetector};
pub use shortage::{ReasonBucket, ReasonRule, ShortageAttributor, ShortageSummary};
pub use target_capa::target_capa;
pub use utilization::{group_utilization, resource_utilization, standard_filters, CapaFilter};
pub use wip::{buffer_lot_wip, buffer_plan_wip, item_wip};
