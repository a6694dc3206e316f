//! 下载页 HTML 提取。
//!
//! 镜像站点的页面结构随时可能变化，这里把易碎的部分收敛成一个窄接口：
//! `extract_download_info(html)`，换站点时只动这一处。

use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("下载页中没有 iframe#iframe_download 元素")]
    MissingFrame,
    #[error("下载页中没有 span.fsize 大小标签")]
    MissingSizeLabel,
    #[error("大小标签无法解析: {0:?}")]
    BadSizeLabel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Mb,
    Gb,
}

/// 页面上声明的包大小。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeclaredSize {
    pub value: f64,
    pub unit: SizeUnit,
}

impl DeclaredSize {
    /// 统一换算为 MB。
    pub fn as_mb(self) -> f64 {
        match self.unit {
            SizeUnit::Mb => self.value,
            SizeUnit::Gb => self.value * 1024.0,
        }
    }
}

/// 从一个下载页提取出的信息；每个响应解析一次，不做持久化。
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub download_url: String,
    pub size: DeclaredSize,
}

/// 定位承载真实下载地址的 iframe 与大小标签。
///
/// 任一元素缺失都立即失败，由上层按未命中处理，不做重试。
pub fn extract_download_info(html: &str) -> Result<PageInfo, ExtractError> {
    let document = Html::parse_document(html);

    let frame_selector = Selector::parse("iframe#iframe_download").expect("静态选择器");
    let download_url = document
        .select(&frame_selector)
        .next()
        .and_then(|frame| frame.value().attr("src"))
        .map(|src| src.trim().to_string())
        .filter(|src| !src.is_empty())
        .ok_or(ExtractError::MissingFrame)?;

    let size_selector = Selector::parse("span.fsize").expect("静态选择器");
    let size_label = document
        .select(&size_selector)
        .next()
        .map(|span| span.text().collect::<String>())
        .ok_or(ExtractError::MissingSizeLabel)?;
    let size = parse_size_label(size_label.trim())?;

    Ok(PageInfo { download_url, size })
}

/// 解析形如 `"+45.2 MB"` 的大小标签：可选符号 + 数值 + 单位（MB/GB）。
pub(crate) fn parse_size_label(label: &str) -> Result<DeclaredSize, ExtractError> {
    let pattern = Regex::new(r"^[+-]?([0-9]+(?:\.[0-9]+)?)\s+(MB|GB)$").expect("静态正则");
    let caps = pattern
        .captures(label)
        .ok_or_else(|| ExtractError::BadSizeLabel(label.to_string()))?;

    let value: f64 = caps[1]
        .parse()
        .map_err(|_| ExtractError::BadSizeLabel(label.to_string()))?;
    let unit = if &caps[2] == "GB" {
        SizeUnit::Gb
    } else {
        SizeUnit::Mb
    };

    Ok(DeclaredSize { value, unit })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download_page(src: &str, fsize: &str) -> String {
        format!(
            r#"<html><body>
<div class="download-box">
<iframe id="iframe_download" src="{src}"></iframe>
<span class="file">game.apk</span>
<span class="fsize">{fsize}</span>
</div>
</body></html>"#
        )
    }

    #[test]
    fn extracts_url_and_size() {
        let html = download_page("https://cdn.example.com/x.apk", "+45.2 MB");
        let info = extract_download_info(&html).expect("extract");
        assert_eq!(info.download_url, "https://cdn.example.com/x.apk");
        assert_eq!(
            info.size,
            DeclaredSize {
                value: 45.2,
                unit: SizeUnit::Mb,
            }
        );
    }

    #[test]
    fn missing_frame_fails() {
        let html = r#"<html><body><span class="fsize">+45.2 MB</span></body></html>"#;
        assert!(matches!(
            extract_download_info(html),
            Err(ExtractError::MissingFrame)
        ));
    }

    #[test]
    fn missing_size_label_fails() {
        let html =
            r#"<html><body><iframe id="iframe_download" src="https://cdn/x.apk"></iframe></body></html>"#;
        assert!(matches!(
            extract_download_info(html),
            Err(ExtractError::MissingSizeLabel)
        ));
    }

    #[test]
    fn gb_converts_to_mb_exactly() {
        let size = parse_size_label("+1.5 GB").expect("parse");
        assert_eq!(size.unit, SizeUnit::Gb);
        assert_eq!(size.as_mb(), 1.5 * 1024.0);
    }

    #[test]
    fn sign_is_dropped() {
        assert_eq!(parse_size_label("+45.2 MB").unwrap().value, 45.2);
        assert_eq!(parse_size_label("-45.2 MB").unwrap().value, 45.2);
        assert_eq!(parse_size_label("45.2 MB").unwrap().value, 45.2);
    }

    #[test]
    fn garbage_label_is_rejected() {
        for label in ["", "45.2", "45.2 KB", "big MB", "45.2MB"] {
            assert!(
                matches!(parse_size_label(label), Err(ExtractError::BadSizeLabel(_))),
                "label {label:?} should be rejected"
            );
        }
    }
}
