// ==========================================
// 排产仿真快照分析 - 快照仓库
// ==========================================
// 职责: 按逻辑表名解析快照表
// 实现: 目录扫描 (FolderSnapshotStore) / 内存 (InMemorySnapshotStore)
// ==========================================

use crate::snapshot::error::{SnapshotError, SnapshotResult};
use crate::snapshot::file_parser::{table_name_of, UniversalFileParser};
use crate::snapshot::table::Table;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// 逻辑表名（与仿真引擎输出文件名一致）
pub mod tables {
    pub const DEMAND: &str = "DEMAND";
    pub const SHIPMENT_PLAN: &str = "SHIPMENT_PLAN";
    pub const SHORT_LOG: &str = "SHORT_LOG";
    pub const RES_PLAN: &str = "RES_PLAN";
    pub const FACTORY_CONFIG: &str = "FACTORY_CONFIG";
    pub const CAPA_ALLOCATION_INFO: &str = "CAPA_ALLOCATION_INFO";
    pub const RES_MASTER: &str = "RES_MASTER";
    pub const LOT_HISTORY: &str = "LOT_HISTORY";
    pub const TARGET_PLAN: &str = "TARGET_PLAN";
    pub const ROUTING_OPER: &str = "ROUTING_OPER";
    pub const OPER_RES: &str = "OPER_RES";
}

/// 快照仓库接口
pub trait SnapshotStore {
    /// 解析逻辑表名；不存在时返回 MissingInput
    fn resolve(&self, logical_name: &str) -> SnapshotResult<Table>;

    /// 是否存在该逻辑表
    fn contains(&self, logical_name: &str) -> bool;

    /// 全部可用逻辑表名（有序）
    fn table_names(&self) -> Vec<String>;
}

// ==========================================
// FolderSnapshotStore - 仿真结果目录
// ==========================================
// 递归扫描目录下所有 .parquet/.csv/.xlsx/.xls，文件名主干即逻辑表名
pub struct FolderSnapshotStore {
    index: BTreeMap<String, PathBuf>,
}

impl FolderSnapshotStore {
    /// 扫描目录建立索引（只建索引，不读文件）
    pub fn open<P: AsRef<Path>>(root: P) -> SnapshotResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(SnapshotError::FileNotFound(root.display().to_string()));
        }

        let index = scan_snapshot_files(&root)?;
        info!(root = %root.display(), tables = index.len(), "快照目录扫描完成");

        Ok(Self { index })
    }
}

impl SnapshotStore for FolderSnapshotStore {
    fn resolve(&self, logical_name: &str) -> SnapshotResult<Table> {
        let path = self
            .index
            .get(logical_name)
            .ok_or_else(|| SnapshotError::missing_input(logical_name))?;

        debug!(logical_name, path = %path.display(), "读取快照表");
        let table = UniversalFileParser.parse(path)?;
        debug!(logical_name, rows = table.len(), "快照表读取完成");
        Ok(table)
    }

    fn contains(&self, logical_name: &str) -> bool {
        self.index.contains_key(logical_name)
    }

    fn table_names(&self) -> Vec<String> {
        self.index.keys().cloned().collect()
    }
}

/// 递归扫描快照文件: 表名 → 路径
///
/// 同名文件按路径字典序取第一个，保证结果与遍历顺序无关
pub fn scan_snapshot_files(root: &Path) -> SnapshotResult<BTreeMap<String, PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| SnapshotError::FileReadError(e.to_string()))?;
        if entry.file_type().is_file() && UniversalFileParser::is_supported(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let mut index = BTreeMap::new();
    for path in files {
        index.entry(table_name_of(&path)).or_insert(path);
    }
    Ok(index)
}

// ==========================================
// InMemorySnapshotStore - 内存快照
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    tables: BTreeMap<String, Table>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以表名注册（同名覆盖）
    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name().to_string(), table);
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.insert(table);
        self
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn resolve(&self, logical_name: &str) -> SnapshotResult<Table> {
        self.tables
            .get(logical_name)
            .cloned()
            .ok_or_else(|| SnapshotError::missing_input(logical_name))
    }

    fn contains(&self, logical_name: &str) -> bool {
        self.tables.contains_key(logical_name)
    }

    fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store_missing_table() {
        let store = InMemorySnapshotStore::new()
            .with_table(Table::from_rows(tables::DEMAND, &["DEMAND_ID"], &[]));

        assert!(store.contains(tables::DEMAND));
        match store.resolve(tables::SHORT_LOG) {
            Err(SnapshotError::MissingInput { logical_name }) => {
                assert_eq!(logical_name, "SHORT_LOG")
            }
            other => panic!("期望 MissingInput, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_folder_store_rejects_missing_root() {
        let result = FolderSnapshotStore::open("/nonexistent/run_folder");
        assert!(matches!(result, Err(SnapshotError::FileNotFound(_))));
    }
}
