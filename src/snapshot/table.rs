// ==========================================
// 排产仿真快照分析 - 内存表
// ==========================================
// 保留表头顺序与单元格原文，类型转换由 row_mapper 负责
// ==========================================

use crate::snapshot::error::{SnapshotError, SnapshotResult};
use serde::{Deserialize, Serialize};

/// 快照表: 有序列名 + 行（单元格原文）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// 由字面量构建（测试与调用方已持有数据时使用）
    pub fn from_rows(name: &str, columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = Table::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|v| v.to_string()).collect());
        }
        table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 追加一行；短行以空串补齐，长行截断到列数
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// 必需列，不存在时返回 MissingColumn
    pub fn require_column(&self, column: &str) -> SnapshotResult<usize> {
        self.column_index(column)
            .ok_or_else(|| SnapshotError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// 取单元格原文（去首尾空白）
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|v| v.trim())
            .unwrap_or("")
    }

    /// 按行迭代 (列名, 原值)
    pub fn row_pairs(&self, row: usize) -> Vec<(String, String)> {
        self.columns
            .iter()
            .cloned()
            .zip(self.rows[row].iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut table = Table::new("T", vec!["A".into(), "B".into(), "C".into()]);
        table.push_row(vec!["1".into()]);
        assert_eq!(table.rows()[0], vec!["1", "", ""]);
    }

    #[test]
    fn test_require_column_reports_table_name() {
        let table = Table::from_rows("DEMAND", &["DEMAND_ID"], &[]);
        let err = table.require_column("DEMAND_QTY").unwrap_err();
        assert!(err.to_string().contains("DEMAND"));
        assert!(err.to_string().contains("DEMAND_QTY"));
    }

    #[test]
    fn test_cell_trims_and_defaults() {
        let table = Table::from_rows("T", &["A"], &[&[" x "]]);
        assert_eq!(table.cell(0, 0), "x");
        assert_eq!(table.cell(5, 0), "");
    }
}
