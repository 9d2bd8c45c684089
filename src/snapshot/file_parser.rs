// ==========================================
// 排产仿真快照分析 - 文件解析器实现
// ==========================================
// 支持: Parquet (.parquet) / CSV (.csv) / Excel (.xlsx/.xls)
// 输出: Table（保留表头顺序）
// ==========================================

use crate::snapshot::error::{SnapshotError, SnapshotResult};
use crate::snapshot::table::Table;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::ReaderBuilder;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 文件解析接口
pub trait FileParser {
    /// 解析文件为内存表，表名取文件名主干
    fn parse_to_table(&self, file_path: &Path) -> SnapshotResult<Table>;
}

/// 表名 = 文件名去扩展名
pub fn table_name_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 日期时间单元格统一输出为 "%Y-%m-%d %H:%M:%S"
const DATETIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// Parquet Parser 实现
// ==========================================
pub struct ParquetParser;

impl FileParser for ParquetParser {
    fn parse_to_table(&self, file_path: &Path) -> SnapshotResult<Table> {
        let path = file_path;

        if !path.exists() {
            return Err(SnapshotError::FileNotFound(path.display().to_string()));
        }

        let ext = extension_of(path);
        if ext != "parquet" {
            return Err(SnapshotError::UnsupportedFormat(ext));
        }

        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
        let headers: Vec<String> = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().trim().to_string())
            .collect();
        let reader = builder.build()?;

        // 空值输出为空串，与 CSV 空单元格一致
        let options = FormatOptions::default();
        let mut table = Table::new(table_name_of(path), headers);
        for batch in reader {
            let batch = batch?;
            let formatters = batch
                .columns()
                .iter()
                .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
                .collect::<Result<Vec<_>, _>>()?;

            for row in 0..batch.num_rows() {
                table.push_row(
                    formatters
                        .iter()
                        .map(|f| f.value(row).to_string().trim().to_string())
                        .collect(),
                );
            }
        }

        Ok(table)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_table(&self, file_path: &Path) -> SnapshotResult<Table> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(SnapshotError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = extension_of(path);
        if ext != "csv" {
            return Err(SnapshotError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头（去除 UTF-8 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut table = Table::new(table_name_of(path), headers);
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行
            if row.iter().all(|v| v.is_empty()) {
                continue;
            }

            table.push_row(row);
        }

        Ok(table)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_table(&self, file_path: &Path) -> SnapshotResult<Table> {
        let path = file_path;

        if !path.exists() {
            return Err(SnapshotError::FileNotFound(path.display().to_string()));
        }

        let ext = extension_of(path);
        if ext != "xlsx" && ext != "xls" {
            return Err(SnapshotError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;

        // 只读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| SnapshotError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| SnapshotError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row.iter().map(excel_cell_text).collect();

        let mut table = Table::new(table_name_of(path), headers);
        for data_row in rows {
            let row: Vec<String> = data_row.iter().map(excel_cell_text).collect();

            if row.iter().all(|v| v.is_empty()) {
                continue;
            }

            table.push_row(row);
        }

        Ok(table)
    }
}

/// Excel 单元格文本；日期单元格按日期时间输出，不输出序列号
fn excel_cell_text(cell: &Data) -> String {
    let text = match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| dt.format(DATETIME_TEXT_FORMAT).to_string())
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string(),
    };
    text.trim().to_string()
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 是否为可解析的快照文件
    pub fn is_supported(path: &Path) -> bool {
        matches!(extension_of(path).as_str(), "parquet" | "csv" | "xlsx" | "xls")
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> SnapshotResult<Table> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "parquet" => ParquetParser.parse_to_table(path),
            "csv" => CsvParser.parse_to_table(path),
            "xlsx" | "xls" => ExcelParser.parse_to_table(path),
            other => Err(SnapshotError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::row_mapper::parse_datetime_text;
    use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampSecondArray};
    use arrow::datatypes::{DataType as ArrowType, Field, Schema, TimeUnit};
    use arrow::record_batch::RecordBatch;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;
    use parquet::arrow::ArrowWriter;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::{Builder, TempDir};

    #[test]
    fn test_csv_parser_keeps_header_order() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "\u{feff}DEMAND_ID,ITEM_ID,DEMAND_QTY,DUE_DATE").unwrap();
        writeln!(temp_file, "D1, ITEM_A ,100,2024-01-05").unwrap();
        writeln!(temp_file, ",,,").unwrap();
        writeln!(temp_file, "D2,ITEM_B,50").unwrap();
        temp_file.flush().unwrap();

        let table = CsvParser.parse_to_table(temp_file.path()).unwrap();

        assert_eq!(table.columns(), ["DEMAND_ID", "ITEM_ID", "DEMAND_QTY", "DUE_DATE"]);
        // 空白行跳过
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), "ITEM_A");
        // 短行补齐
        assert_eq!(table.cell(1, 3), "");
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_table(Path::new("/nonexistent/DEMAND.csv"));
        assert!(matches!(result, Err(SnapshotError::FileNotFound(_))));
    }

    #[test]
    fn test_excel_date_cells_as_datetime_text() {
        // 45292.375 = 2024-01-01 09:00:00
        let serial = Data::DateTime(ExcelDateTime::new(
            45292.375,
            ExcelDateTimeType::DateTime,
            false,
        ));
        assert_eq!(excel_cell_text(&serial), "2024-01-01 09:00:00");

        let iso = Data::DateTimeIso("2024-01-02T10:30:00".to_string());
        assert_eq!(excel_cell_text(&iso), "2024-01-02 10:30:00");

        assert_eq!(excel_cell_text(&Data::String(" R1 ".to_string())), "R1");
        assert_eq!(excel_cell_text(&Data::Float(4.5)), "4.5");
        assert_eq!(excel_cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_parquet_parser_reads_typed_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("RES_PLAN.parquet");
        write_res_plan_parquet(&path);

        let table = UniversalFileParser.parse(&path).unwrap();

        assert_eq!(table.name(), "RES_PLAN");
        assert_eq!(table.columns(), ["RES_ID", "START_DATETIME", "PLAN_QTY"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 0), "R1");
        assert_eq!(
            parse_datetime_text(table.cell(0, 1)),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 0, 0)
        );
        assert_eq!(table.cell(0, 2), "4.5");
        // 空值 → 空串
        assert_eq!(table.cell(1, 1), "");
        assert_eq!(table.cell(1, 2), "");
    }

    fn write_res_plan_parquet(path: &Path) {
        let schema = Arc::new(Schema::new(vec![
            Field::new("RES_ID", ArrowType::Utf8, false),
            Field::new("START_DATETIME", ArrowType::Timestamp(TimeUnit::Second, None), true),
            Field::new("PLAN_QTY", ArrowType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["R1", "R2"])) as ArrayRef,
                // 1704099600 = 2024-01-01 09:00:00
                Arc::new(TimestampSecondArray::from(vec![Some(1_704_099_600), None])),
                Arc::new(Float64Array::from(vec![Some(4.5), None])),
            ],
        )
        .unwrap();

        let mut writer = ArrowWriter::try_new(File::create(path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let result = UniversalFileParser.parse(temp_file.path());
        assert!(matches!(result, Err(SnapshotError::UnsupportedFormat(_))));
        assert!(!UniversalFileParser::is_supported(temp_file.path()));
    }
}
