//! 下载流程模块入口。
//!
//! 子模块：
//! - `transfer` — 单个 apk 的提取、跳过判断与分块流式写盘
//! - `progress` — 下载进度条
//! - `batch`    — 单个表格的逐条驱动与未命中日志

pub mod batch;
pub(crate) mod progress;
pub mod transfer;
