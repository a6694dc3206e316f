//! Excel 表格读取：按位置取前两列，归一化为显式的下载记录。

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use thiserror::Error;
use tracing::warn;

/// 一条下载记录：包名必填，应用名可为空。
///
/// 一条记录只驱动一次下载尝试（内部含一次候选 URL 回退）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRecord {
    pub package_id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("无法打开表格 {path}: {source}")]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },
    #[error("读取表 {sheet} 失败: {source}")]
    Sheet {
        sheet: String,
        source: calamine::Error,
    },
}

/// 读取指定表的记录列表。
///
/// 固定模式：第 0 列包名、第 1 列应用名，首行视为表头跳过。空白单元格、
/// 纯空白字符串以及数值 0 填充值在这里统一归一化为“无应用名”，后续
/// 流程不再出现数值哨兵。包名为空的行直接丢弃。
pub fn load_records(path: &Path, sheet_name: &str) -> Result<Vec<AppRecord>, SheetError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| SheetError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|source| SheetError::Sheet {
            sheet: sheet_name.to_string(),
            source,
        })?;

    let mut records = Vec::new();
    for (idx, row) in range.rows().enumerate().skip(1) {
        let package_id = row.first().and_then(cell_to_text);
        let display_name = row.get(1).and_then(cell_to_text);

        match package_id {
            Some(package_id) => records.push(AppRecord {
                package_id,
                display_name,
            }),
            None => warn!("第 {} 行包名为空，已跳过", idx + 1),
        }
    }
    Ok(records)
}

fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        // pandas 风格的 fillna(0) 哨兵：数值 0 等价于空
        Data::Float(f) => {
            if *f == 0.0 {
                None
            } else if f.fract() == 0.0 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Int(i) => (*i != 0).then(|| i.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Cell, write_xlsx};

    #[test]
    fn reads_two_columns_and_skips_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("apps.xlsx");
        write_xlsx(
            &path,
            "Sheet1",
            &[
                vec![Cell::Text("app_id"), Cell::Text("app_name")],
                vec![Cell::Text("com.example.app"), Cell::Text("My Game")],
                vec![Cell::Text("com.example.other"), Cell::Empty],
            ],
        );

        let records = load_records(&path, "Sheet1").expect("load_records");
        assert_eq!(
            records,
            vec![
                AppRecord {
                    package_id: "com.example.app".to_string(),
                    display_name: Some("My Game".to_string()),
                },
                AppRecord {
                    package_id: "com.example.other".to_string(),
                    display_name: None,
                },
            ]
        );
    }

    #[test]
    fn zero_fill_sentinel_means_no_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("apps.xlsx");
        write_xlsx(
            &path,
            "Sheet1",
            &[
                vec![Cell::Text("app_id"), Cell::Text("app_name")],
                vec![Cell::Text("com.example.app"), Cell::Number(0.0)],
            ],
        );

        let records = load_records(&path, "Sheet1").expect("load_records");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name, None);
    }

    #[test]
    fn blank_package_rows_are_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("apps.xlsx");
        write_xlsx(
            &path,
            "Sheet1",
            &[
                vec![Cell::Text("app_id"), Cell::Text("app_name")],
                vec![Cell::Text("  "), Cell::Text("Nameless")],
                vec![Cell::Text("com.example.app"), Cell::Text("My Game")],
            ],
        );

        let records = load_records(&path, "Sheet1").expect("load_records");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].package_id, "com.example.app");
    }

    #[test]
    fn missing_sheet_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("apps.xlsx");
        write_xlsx(
            &path,
            "Sheet1",
            &[vec![Cell::Text("app_id"), Cell::Text("app_name")]],
        );

        let err = load_records(&path, "不存在的表").unwrap_err();
        assert!(matches!(err, SheetError::Sheet { .. }));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.xlsx");

        let err = load_records(&path, "Sheet1").unwrap_err();
        assert!(matches!(err, SheetError::Workbook { .. }));
    }
}
