// ==========================================
// 排产仿真快照分析 - 领域层
// ==========================================
// 职责: 快照行实体与分析输出实体
// ==========================================

pub mod capacity;
pub mod demand;
pub mod lot;
pub mod routing;
pub mod schedule;
pub mod types;

pub use capacity::{CapaAllocation, CapaBreakdown, CapaUtilization, ResourceMaster};
pub use demand::{DemandLine, FulfillmentRecord, ShortageAttribution, ShortageEvent};
pub use lot::{BufferWip, ItemWip, LotEvent, PeriodQty};
pub use routing::{OperResource, RoutingOper, TargetCapa, TargetPlan};
pub use schedule::{
    FactoryConfig, PartitionKey, ScheduledOperation, SetupTransitionCount, ShiftSetupCount,
};
pub use types::{AllocationType, Shift, ShortReason, TimeGrain};
