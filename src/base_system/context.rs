//! 全局配置结构（Config）与默认值。
//!
//! 该模块同时提供生成 `config.yml` 的字段元信息。

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::{ConfigSpec, FieldMeta};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // 输入配置
    #[serde(default)]
    pub file_list: Vec<String>,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    // 路径配置
    #[serde(default)]
    pub save_path: String,

    // 网络配置
    #[serde(default = "default_mirror_base_url")]
    pub mirror_base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_list: Vec::new(),
            sheet_name: default_sheet_name(),
            save_path: String::new(),
            mirror_base_url: default_mirror_base_url(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ConfigSpec for Config {
    const FILE_NAME: &'static str = "config.yml";

    fn fields() -> &'static [FieldMeta] {
        static FIELDS: [FieldMeta; 6] = [
            FieldMeta {
                name: "file_list",
                description: "待读取的 Excel 文件列表（按顺序逐个处理）",
            },
            FieldMeta {
                name: "sheet_name",
                description: "表名",
            },
            FieldMeta {
                name: "save_path",
                description: "保存路径（留空表示当前目录，每个表格会生成同名子目录）",
            },
            FieldMeta {
                name: "mirror_base_url",
                description: "镜像站点前缀",
            },
            FieldMeta {
                name: "request_timeout",
                description: "下载页请求超时时间（秒）",
            },
            FieldMeta {
                name: "user_agent",
                description: "请求使用的 User-Agent",
            },
        ];
        &FIELDS
    }
}

impl Config {
    /// 输出根目录；`save_path` 留空时使用当前目录。
    pub fn base_save_dir(&self) -> PathBuf {
        if self.save_path.trim().is_empty() {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        } else {
            PathBuf::from(&self.save_path)
        }
    }
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

fn default_mirror_base_url() -> String {
    "https://apkpure.com/cn".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/75.0.3770.142 Safari/537.36"
        .to_string()
}
