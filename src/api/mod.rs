// ==========================================
// 排产仿真快照分析 - API层
// ==========================================
// 职责: 面向调用方（CLI / 上层界面）的报表接口
// ==========================================

pub mod error;
pub mod report_api;

pub use error::{ApiError, ApiResult};
pub use report_api::{
    compare_runs, BufferWipReport, ReportApi, SetupTransitionReport, ShortageReport,
    UtilizationView,
};
