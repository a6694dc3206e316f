use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, warn};

use crate::base_system::context::Config;
use crate::sheet_parser::AppRecord;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://apkpure.com/cn".to_string(),
            request_timeout: Duration::from_secs(15),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3770.142 Safari/537.36".to_string(),
        }
    }
}

impl From<&Config> for MirrorConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.mirror_base_url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout.max(1)),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// 一次下载页请求的结果：命中则携带响应，两个候选都失败则为未命中。
pub enum PageFetch {
    Page(Response),
    Miss,
}

pub struct MirrorNetwork {
    /// 下载页请求：带整体超时
    page_client: Client,
    /// 二进制流式请求：文件可能很大，只限制连接超时
    stream_client: Client,
    config: MirrorConfig,
}

impl MirrorNetwork {
    pub fn new(config: MirrorConfig) -> anyhow::Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or(HeaderValue::from_static("Mozilla/5.0")),
        );

        let page_client = Client::builder()
            .default_headers(default_headers.clone())
            .timeout(config.request_timeout)
            .build()?;
        let stream_client = Client::builder()
            .default_headers(default_headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            page_client,
            stream_client,
            config,
        })
    }

    /// 驱动协议：先请求首选候选，状态非成功且存在回退候选时再请求一次；
    /// 任一候选命中即交给下一阶段，否则判为未命中。
    pub fn fetch_download_page(&self, record: &AppRecord) -> PageFetch {
        let candidates = candidate_urls(
            &self.config.base_url,
            &record.package_id,
            record.display_name.as_deref(),
        );
        for url in &candidates {
            debug!("请求下载页: {url}");
            match self.page_client.get(url).send() {
                Ok(resp) if resp.status().is_success() => return PageFetch::Page(resp),
                Ok(resp) => {
                    debug!("下载页状态码 {}: {url}", resp.status().as_u16());
                }
                Err(err) => {
                    warn!("请求下载页失败: {err}");
                }
            }
        }
        PageFetch::Miss
    }

    /// 请求真实下载地址，流式返回响应体。
    pub fn fetch_binary(&self, url: &str) -> reqwest::Result<Response> {
        self.stream_client.get(url).send()?.error_for_status()
    }
}

/// 按优先级构造 1~2 个候选下载页 URL。
///
/// 应用名存在时先试“应用名 + 包名”形式（应用名乱码会导致 404，回退到
/// 仅包名形式同样可达）；应用名为空时只有仅包名一种。
pub fn candidate_urls(base: &str, package_id: &str, display_name: Option<&str>) -> Vec<String> {
    let base = base.trim_end_matches('/');
    match display_name {
        Some(name) if !name.trim().is_empty() => {
            let sanitized = sanitize_display_name(name);
            vec![
                format!("{base}/{sanitized}/{package_id}/download?from=details"),
                format!("{base}/{package_id}/download?from=details"),
            ]
        }
        _ => vec![format!("{base}/{package_id}/download?from=details")],
    }
}

/// 应用名中的连续空白统一替换为单个连字符。
pub fn sanitize_display_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-")
}
