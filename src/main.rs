//! APK 镜像批量下载器。
//!
//! 读取 Excel 表格中的包名/应用名清单，在镜像站点上定位每个应用的
//! 下载页，解析出真实下载地址后流式落盘；找不到的记录写入未命中日志。
//!
//! 代码结构（读代码入口）：
//! - `base_system`    — 配置/日志等基础设施
//! - `sheet_parser`   — Excel 记录读取与归一化
//! - `network_parser` — 候选 URL 构造、下载页请求与 HTML 提取
//! - `download`       — 转存流程（跳过判断/分块写盘/进度/逐表驱动）

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{error, info, warn};

mod base_system;
mod download;
mod network_parser;
mod sheet_parser;
#[cfg(test)]
mod test_support;

use base_system::config::load_or_create;
use base_system::context::Config;
use base_system::logging::{LogOptions, LogSystem};
use network_parser::network::{MirrorConfig, MirrorNetwork};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "apk-mirror-downloader")]
#[command(about = "APK Mirror Downloader (batch)")]
struct Cli {
    /// 启用调试日志输出
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// 配置文件路径（默认当前目录下的 config.yml）
    #[arg(long)]
    config: Option<String>,

    /// 数据目录路径（用于存放 config.yml 和 logs 等文件，方便挂载）
    #[arg(long)]
    data_dir: Option<String>,

    /// 显示版本信息后退出
    #[arg(long, default_value_t = false)]
    version: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("APK Mirror Downloader v{VERSION}");
        return Ok(());
    }

    let data_dir = cli.data_dir.as_deref().map(Path::new);
    let _log = init_logging(cli.debug, data_dir)?;

    let config_path = cli.config.as_deref().map(Path::new);
    let config: Config =
        load_or_create(config_path, data_dir).map_err(|e| anyhow!(e.to_string()))?;

    if config.file_list.is_empty() {
        warn!("file_list 为空：请在 config.yml 中填写待处理的表格路径");
        return Ok(());
    }

    let net =
        MirrorNetwork::new(MirrorConfig::from(&config)).context("初始化 HTTP 客户端失败")?;

    info!("当前版本: v{VERSION}，待处理表格 {} 个", config.file_list.len());
    for entry in &config.file_list {
        // 单个表格读不出只跳过该表，不中断整个任务
        if let Err(err) = download::batch::run_sheet(&net, &config, Path::new(entry)) {
            error!("处理 {entry} 失败: {err}");
        }
    }

    Ok(())
}

fn init_logging(debug: bool, base_dir: Option<&Path>) -> Result<LogSystem> {
    let opts = LogOptions {
        debug,
        use_color: true,
        archive_on_exit: true,
    };
    LogSystem::init(opts, base_dir).map_err(|e| anyhow!(e))
}
