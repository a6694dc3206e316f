//! 单个 apk 的提取、跳过判断与分块流式写盘。

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use reqwest::blocking::Response;
use thiserror::Error;
use tracing::{debug, info};

use super::progress::TransferProgress;
use crate::network_parser::network::MirrorNetwork;
use crate::network_parser::page::{self, ExtractError};

/// 每次读 10 MiB，边下边写，避免整包驻留内存
const CHUNK_SIZE: usize = 10 * 1024 * 1024;
/// 已有文件与声明大小之间允许的误差（MB），吸收声明值与实际传输量的舍入差
const SIZE_TOLERANCE_MB: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// 本地文件已达到声明大小，未发起二进制请求
    Skipped,
    /// 完整写入 `bytes` 字节
    Downloaded { bytes: u64 },
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("网络错误: {0}")]
    Http(#[from] reqwest::Error),
    #[error("写盘失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 把一个下载页响应落成 `{dest_dir}/{base_name}.apk`。
///
/// 完整性只按字节数对声明大小判断，页面不提供校验和。下载一半被打断的
/// 文件会低于容差线，下次运行时整体重下。
pub fn transfer(
    net: &MirrorNetwork,
    page_response: Response,
    dest_dir: &Path,
    base_name: &str,
) -> Result<TransferOutcome, TransferError> {
    let html = page_response.text()?;
    let info = page::extract_download_info(&html)?;
    let declared_mb = info.size.as_mb();

    let dest = dest_dir.join(format!("{base_name}.apk"));
    if already_complete(&dest, declared_mb) {
        info!("{base_name}.apk 已存在且大小完整，跳过");
        return Ok(TransferOutcome::Skipped);
    }

    debug!("真实下载地址: {}", info.download_url);
    let mut body = net.fetch_binary(&info.download_url)?;

    let mut file = File::create(&dest)?;
    let progress = TransferProgress::new(base_name, declared_mb);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut written: u64 = 0;
    loop {
        let n = body.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        file.write_all(&chunk[..n])?;
        written += n as u64;
        progress.update(written);
    }
    file.flush()?;
    progress.finish();

    Ok(TransferOutcome::Downloaded { bytes: written })
}

/// 跳过判断：文件已存在且大小（MB）不低于声明大小减容差。
fn already_complete(dest: &Path, declared_mb: f64) -> bool {
    match fs::metadata(dest) {
        Ok(meta) => meta.len() as f64 / (1024.0 * 1024.0) >= declared_mb - SIZE_TOLERANCE_MB,
        Err(_) => false,
    }
}
