// ==========================================
// 排产仿真快照分析 - 配置层
// ==========================================
// 职责: 分析参数配置 + 仿真结果目录登记
// 存储: <系统配置目录>/aps-snapshot-analysis/*.json
// ==========================================

pub mod config_manager;
pub mod error;
pub mod folder_registry;

// 重导出核心配置管理器
pub use config_manager::{config_keys, default_config_dir, AnalysisConfig, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use folder_registry::{FolderRegistry, RegisteredFolder};
