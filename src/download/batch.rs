//! 单个表格的批处理驱动。
//!
//! 逐条（严格串行）走完 解析候选 URL → 请求下载页 → 转存 的流程；
//! 未命中的记录追加写入 `download_failed_{表名}.txt`。除表格本身读不出
//! 之外，任何一条记录的失败都不会中断其余记录。

use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};

use super::transfer::{self, TransferError, TransferOutcome};
use crate::base_system::context::Config;
use crate::network_parser::network::{MirrorNetwork, PageFetch};
use crate::sheet_parser::{self, AppRecord, SheetError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SheetSummary {
    pub total: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub missed: usize,
    pub failed: usize,
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error("无法创建输出目录 {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// 处理一个表格：输出目录为 `{save_path}/{表名}`，未命中日志与该目录同级。
pub fn run_sheet(
    net: &MirrorNetwork,
    config: &Config,
    sheet_path: &Path,
) -> Result<SheetSummary, BatchError> {
    let stem = sheet_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sheet".to_string());

    // 表格读不出时整个文件跳过，由调用方决定是否继续下一个文件
    let records = sheet_parser::load_records(sheet_path, &config.sheet_name)?;

    let base_dir = config.base_save_dir();
    let dest_dir = base_dir.join(&stem);
    fs::create_dir_all(&dest_dir).map_err(|source| BatchError::CreateDir {
        path: dest_dir.clone(),
        source,
    })?;
    let miss_log = base_dir.join(format!("download_failed_{stem}.txt"));

    info!("开始处理 {}：共 {} 条记录", sheet_path.display(), records.len());

    let mut summary = SheetSummary {
        total: records.len(),
        ..SheetSummary::default()
    };
    for (idx, record) in records.iter().enumerate() {
        process_record(net, record, idx + 1, &dest_dir, &miss_log, &mut summary);
    }

    info!(
        "{} 处理完成：共 {} 条，下载 {}，跳过 {}，未命中 {}，失败 {}",
        sheet_path.display(),
        summary.total,
        summary.downloaded,
        summary.skipped,
        summary.missed,
        summary.failed
    );
    Ok(summary)
}

fn process_record(
    net: &MirrorNetwork,
    record: &AppRecord,
    no: usize,
    dest_dir: &Path,
    miss_log: &Path,
    summary: &mut SheetSummary,
) {
    info!("开始下载 NO.{no}: {}", record.package_id);
    let response = match net.fetch_download_page(record) {
        PageFetch::Page(response) => response,
        PageFetch::Miss => {
            record_miss(miss_log, no, &record.package_id);
            summary.missed += 1;
            return;
        }
    };

    match transfer::transfer(net, response, dest_dir, &record.package_id) {
        Ok(TransferOutcome::Downloaded { bytes }) => {
            info!(
                "{} 下载完成（{:.1} MB）",
                record.package_id,
                bytes as f64 / (1024.0 * 1024.0)
            );
            summary.downloaded += 1;
        }
        Ok(TransferOutcome::Skipped) => {
            summary.skipped += 1;
        }
        Err(TransferError::Extract(err)) => {
            // 页面结构对不上，等同于这条记录没找到
            error!("NO.{no} {} 页面解析失败: {err}", record.package_id);
            record_miss(miss_log, no, &record.package_id);
            summary.missed += 1;
        }
        Err(err) => {
            error!("NO.{no} {} 下载失败: {err}", record.package_id);
            summary.failed += 1;
        }
    }
}

fn record_miss(miss_log: &Path, no: usize, package_id: &str) {
    let line = format!("Error: couldn't find NO.{no} apk<{package_id}> on this web!");
    error!("{line}");
    if let Err(err) = append_line(miss_log, &line) {
        error!("写入未命中日志失败: {err}");
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}
