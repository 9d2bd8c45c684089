// ==========================================
// 排产仿真快照分析 - 仿真结果目录登记
// ==========================================
// 职责: 记录分析员登记过的仿真结果目录（名称 → 路径）
// 存储: folders.json，调用方持有，分析引擎不依赖
// ==========================================

use crate::config::error::ConfigResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredFolder {
    pub name: String,
    pub path: PathBuf,
}

pub struct FolderRegistry {
    file: PathBuf,
    folders: BTreeMap<String, PathBuf>,
}

impl FolderRegistry {
    /// 加载登记文件；不存在时为空
    pub fn load<P: AsRef<Path>>(file: P) -> ConfigResult<Self> {
        let file = file.as_ref().to_path_buf();
        let folders = if file.exists() {
            serde_json::from_str(&fs::read_to_string(&file)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { file, folders })
    }

    /// 登记（同名覆盖），返回被覆盖的旧路径
    pub fn register(&mut self, name: &str, path: &Path) -> Option<PathBuf> {
        self.folders.insert(name.to_string(), path.to_path_buf())
    }

    pub fn remove(&mut self, name: &str) -> Option<PathBuf> {
        self.folders.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.folders.get(name).map(PathBuf::as_path)
    }

    pub fn list(&self) -> Vec<RegisteredFolder> {
        self.folders
            .iter()
            .map(|(name, path)| RegisteredFolder {
                name: name.clone(),
                path: path.clone(),
            })
            .collect()
    }

    pub fn save(&self) -> ConfigResult<()> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.file, serde_json::to_string_pretty(&self.folders)?)?;
        info!(file = %self.file.display(), folders = self.folders.len(), "目录登记已保存");
        Ok(())
    }
}
