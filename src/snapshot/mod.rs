// ==========================================
// 排产仿真快照分析 - 快照层
// ==========================================
// 职责: 仿真引擎输出快照的定位、解析与类型映射
// 支持: CSV, Excel
// ==========================================

pub mod compare;
pub mod error;
pub mod file_parser;
pub mod row_mapper;
pub mod store;
pub mod table;

pub use compare::{compare_run_folders, FileRowDiff, FolderComparison};
pub use error::{SnapshotError, SnapshotResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, ParquetParser, UniversalFileParser};
pub use store::{tables, FolderSnapshotStore, InMemorySnapshotStore, SnapshotStore};
pub use table::Table;
