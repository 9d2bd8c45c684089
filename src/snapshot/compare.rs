// ==========================================
// 排产仿真快照分析 - 仿真结果目录对比
// ==========================================
// 职责: 两次仿真结果目录按文件名逐一对比行数
// 范围: Data / Experiment 1 两个子目录
// ==========================================

use crate::snapshot::error::{SnapshotError, SnapshotResult};
use crate::snapshot::file_parser::UniversalFileParser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// 参与对比的子目录
pub const COMPARED_SUBFOLDERS: [&str; 2] = ["Data", "Experiment 1"];

/// 单个文件行数对比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRowDiff {
    pub file_name: String,
    pub left_rows: Option<usize>,
    pub right_rows: Option<usize>,
    /// left_rows - right_rows
    pub diff: Option<i64>,
    /// 任一侧读取失败时的错误信息
    pub error: Option<String>,
}

impl FileRowDiff {
    /// 行数不一致（读取失败不计入）
    pub fn has_difference(&self) -> bool {
        matches!(self.diff, Some(d) if d != 0)
    }
}

/// 子目录对比结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderComparison {
    pub subfolder: String,
    pub files: Vec<FileRowDiff>,
    pub diff_count: usize,
}

/// 对比两个仿真结果目录
pub fn compare_run_folders(left: &Path, right: &Path) -> SnapshotResult<Vec<FolderComparison>> {
    let mut result = Vec::with_capacity(COMPARED_SUBFOLDERS.len());
    for subfolder in COMPARED_SUBFOLDERS {
        let comparison = compare_subfolder(&left.join(subfolder), &right.join(subfolder))?;
        info!(
            subfolder,
            files = comparison.len(),
            "子目录对比完成"
        );
        let diff_count = comparison.iter().filter(|f| f.has_difference()).count();
        result.push(FolderComparison {
            subfolder: subfolder.to_string(),
            files: comparison,
            diff_count,
        });
    }
    Ok(result)
}

/// 对比两个目录中同名快照文件的行数（只对比两侧都存在的文件）
pub fn compare_subfolder(left: &Path, right: &Path) -> SnapshotResult<Vec<FileRowDiff>> {
    let left_files = files_by_name(left)?;
    let right_files = files_by_name(right)?;

    let mut out = Vec::new();
    for (file_name, left_path) in &left_files {
        let Some(right_path) = right_files.get(file_name) else {
            continue;
        };

        let diff = match (count_rows(left_path), count_rows(right_path)) {
            (Ok(l), Ok(r)) => FileRowDiff {
                file_name: file_name.clone(),
                left_rows: Some(l),
                right_rows: Some(r),
                diff: Some(l as i64 - r as i64),
                error: None,
            },
            (l, r) => {
                let error = [l.err(), r.err()]
                    .into_iter()
                    .flatten()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                warn!(file_name = %file_name, error = %error, "快照文件读取失败");
                FileRowDiff {
                    file_name: file_name.clone(),
                    left_rows: None,
                    right_rows: None,
                    diff: None,
                    error: Some(error),
                }
            }
        };
        out.push(diff);
    }
    Ok(out)
}

/// 文件名 → 路径；目录不存在时为空
fn files_by_name(dir: &Path) -> SnapshotResult<BTreeMap<String, PathBuf>> {
    let mut files = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(files);
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| SnapshotError::FileReadError(e.to_string()))?;
        if entry.file_type().is_file() && UniversalFileParser::is_supported(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    for path in paths {
        if let Some(name) = path.file_name() {
            files
                .entry(name.to_string_lossy().to_string())
                .or_insert(path);
        }
    }
    Ok(files)
}

fn count_rows(path: &Path) -> SnapshotResult<usize> {
    Ok(UniversalFileParser.parse(path)?.len())
}
