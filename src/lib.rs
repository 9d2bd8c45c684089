// ==========================================
// 排产仿真快照分析 - 核心库
// ==========================================
// 输入: 排产仿真引擎导出的快照表（CSV / Excel）
// 输出: 缺量原因归因、换型分析及配套报表
// 系统定位: 只读分析，不回写快照
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 快照层 - 表读取与实体映射
pub mod snapshot;

// 引擎层 - 分析规则
pub mod engine;

// 配置层 - 分析参数
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 报表接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AllocationType, Shift, ShortReason, TimeGrain};

// 领域实体
pub use domain::{
    DemandLine, FulfillmentRecord, ScheduledOperation, SetupTransitionCount, ShortageAttribution,
    ShortageEvent,
};

// 引擎
pub use engine::{SetupTransitionDetector, ShiftSetupCounter, ShortageAttributor};

// 快照
pub use snapshot::{FolderSnapshotStore, InMemorySnapshotStore, SnapshotError, SnapshotStore, Table};

// API
pub use api::{ApiError, ApiResult, ReportApi};

// 配置
pub use config::{AnalysisConfig, ConfigManager};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "APS 仿真快照分析";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
