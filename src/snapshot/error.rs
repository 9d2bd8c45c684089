// ==========================================
// 排产仿真快照分析 - 快照层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 快照层错误类型
#[derive(Error, Debug)]
pub enum SnapshotError {
    // ===== 输入缺失 =====
    /// 必需的快照表无法解析，计算不继续（fail-closed）
    #[error("缺少必需的快照表: {logical_name}")]
    MissingInput { logical_name: String },

    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .parquet/.csv/.xlsx/.xls）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("Parquet 解析失败: {0}")]
    ParquetParseError(String),

    // ===== 数据映射错误 =====
    #[error("缺少列 (表 {table}): {column}")]
    MissingColumn { table: String, column: String },

    #[error("类型转换失败 (表 {table}, 行 {row}, 字段 {field}): {value}")]
    TypeConversionError {
        table: String,
        row: usize,
        field: String,
        value: String,
    },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnapshotError {
    pub fn missing_input(logical_name: impl Into<String>) -> Self {
        SnapshotError::MissingInput {
            logical_name: logical_name.into(),
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for SnapshotError {
    fn from(err: csv::Error) -> Self {
        SnapshotError::CsvParseError(err.to_string())
    }
}

// 实现 From<parquet::errors::ParquetError>
impl From<parquet::errors::ParquetError> for SnapshotError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        SnapshotError::ParquetParseError(err.to_string())
    }
}

// 实现 From<arrow::error::ArrowError>
impl From<arrow::error::ArrowError> for SnapshotError {
    fn from(err: arrow::error::ArrowError) -> Self {
        SnapshotError::ParquetParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for SnapshotError {
    fn from(err: calamine::Error) -> Self {
        SnapshotError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type SnapshotResult<T> = Result<T, SnapshotError>;
