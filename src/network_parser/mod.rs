//! 网络与页面解析。
//!
//! - `network` — 候选 URL 构造与下载页请求（含一次回退）
//! - `page`    — 从下载页 HTML 提取真实下载地址与声明大小

pub mod network;
pub mod page;
