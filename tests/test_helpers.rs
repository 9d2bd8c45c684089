// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 在临时目录中生成仿真结果快照（CSV），供集成测试读取
// ==========================================
#![allow(dead_code)]

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// 临时仿真结果目录（需要保持存活）
pub struct RunFolder {
    dir: TempDir,
}

impl RunFolder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("创建临时目录失败"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 写入 <root>/<subfolder>/<name>.csv
    pub fn write_table_in(
        &self,
        subfolder: &str,
        name: &str,
        header: &[&str],
        rows: &[&[&str]],
    ) -> PathBuf {
        let dir = self.dir.path().join(subfolder);
        fs::create_dir_all(&dir).expect("创建子目录失败");
        let path = dir.join(format!("{}.csv", name));
        fs::write(&path, csv_text(header, rows)).expect("写入 CSV 失败");
        path
    }

    /// 写入 <root>/<subfolder>/<name>.parquet（全部为字符串列，空串写为 null）
    pub fn write_parquet_in(
        &self,
        subfolder: &str,
        name: &str,
        header: &[&str],
        rows: &[&[&str]],
    ) -> PathBuf {
        let dir = self.dir.path().join(subfolder);
        fs::create_dir_all(&dir).expect("创建子目录失败");
        let path = dir.join(format!("{}.parquet", name));

        let schema = Arc::new(Schema::new(
            header
                .iter()
                .map(|h| Field::new(*h, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));
        let columns: Vec<ArrayRef> = (0..header.len())
            .map(|col| {
                let values: Vec<Option<&str>> = rows
                    .iter()
                    .map(|row| row.get(col).copied().filter(|v| !v.is_empty()))
                    .collect();
                Arc::new(StringArray::from(values)) as ArrayRef
            })
            .collect();
        let batch = RecordBatch::try_new(schema.clone(), columns).expect("构建记录批失败");

        let file = fs::File::create(&path).expect("创建 Parquet 文件失败");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("创建 Parquet 写入器失败");
        writer.write(&batch).expect("写入 Parquet 失败");
        writer.close().expect("关闭 Parquet 写入器失败");
        path
    }

    /// 写入 <root>/<name>.csv
    pub fn write_table(&self, name: &str, header: &[&str], rows: &[&[&str]]) -> PathBuf {
        self.write_table_in("", name, header, rows)
    }
}

pub fn csv_text(header: &[&str], rows: &[&[&str]]) -> String {
    let mut text = header.join(",");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    text
}

// ==========================================
// 常用快照表
// ==========================================

pub const DEMAND_HEADER: [&str; 5] = ["DEMAND_ID", "ITEM_ID", "DEMAND_QTY", "DUE_DATE", "CUSTOMER"];
pub const SHIPMENT_HEADER: [&str; 3] = ["DEMAND_ID", "ON_TIME_QTY", "LATE_QTY"];
pub const SHORT_LOG_HEADER: [&str; 3] = ["DEMAND_ID", "SHORT_REASON", "OPER_ID"];
pub const RES_PLAN_HEADER: [&str; 8] = [
    "RES_GROUP_ID",
    "RES_ID",
    "PLAN_DATE",
    "ALLOCATION_TYPE",
    "ITEM_ID",
    "START_DATETIME",
    "END_DATETIME",
    "OPER_ID",
];

/// D1 缺 40（NoOpResourceInfo@OP5），D2 足量，D3 无出货且无日志
pub fn write_shortage_scenario(folder: &RunFolder) {
    folder.write_table(
        "DEMAND",
        &DEMAND_HEADER,
        &[
            &["D1", "ITEM_A", "100", "2024-01-05", "C1"],
            &["D2", "ITEM_B", "50", "2024-01-06", "C2"],
            &["D3", "ITEM_C", "30", "2024-01-10", "C1"],
        ],
    );
    folder.write_table(
        "SHIPMENT_PLAN",
        &SHIPMENT_HEADER,
        &[&["D1", "40", "20"], &["D2", "50", "0"]],
    );
    folder.write_table(
        "SHORT_LOG",
        &SHORT_LOG_HEADER,
        &[
            &["D1", "NoOpResourceInfo", "OP5"],
            &["D2", "RemainingLots", "OP1"],
        ],
    );
}

/// R1 @ 2024-01-01: Allocate(A) → Setup → Allocate(B)
pub fn write_setup_scenario(folder: &RunFolder) {
    folder.write_table(
        "RES_PLAN",
        &RES_PLAN_HEADER,
        &[
            &["G1", "R1", "2024-01-01", "Allocate", "B", "2024-01-01 10:00:00", "2024-01-01 12:00:00", "OP10"],
            &["G1", "R1", "2024-01-01", "Setup", "", "2024-01-01 09:00:00", "2024-01-01 10:00:00", ""],
            &["G1", "R1", "2024-01-01", "Allocate", "A", "2024-01-01 06:00:00", "2024-01-01 09:00:00", "OP10"],
        ],
    );
    folder.write_table(
        "FACTORY_CONFIG",
        &["FACTORY_START_TIME", "SHIFT_NAME"],
        &[&["08:00:00", "\"Day,Night\""]],
    );
}
