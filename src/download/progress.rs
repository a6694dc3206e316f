//! 下载进度条（stderr，仅提示用途）。

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub(crate) struct TransferProgress {
    bar: ProgressBar,
    declared_bytes: f64,
    declared_mb: f64,
}

impl TransferProgress {
    pub(crate) fn new(label: &str, declared_mb: f64) -> Self {
        let declared_bytes = declared_mb * 1024.0 * 1024.0;
        let bar = ProgressBar::with_draw_target(
            Some(declared_bytes.max(0.0) as u64),
            ProgressDrawTarget::stderr(),
        );
        let style = ProgressStyle::with_template("{prefix} [{elapsed_precise}] {wide_bar} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        bar.set_style(style);
        bar.set_prefix(label.to_string());
        Self {
            bar,
            declared_bytes,
            declared_mb,
        }
    }

    /// 每写完一块更新一次：百分比 + 已写入量（MB）/ 声明大小（MB）。
    pub(crate) fn update(&self, bytes_so_far: u64) {
        self.bar
            .set_position((bytes_so_far as f64).min(self.declared_bytes) as u64);
        self.bar.set_message(format!(
            "{:.1}%({:.1} MB/{:.1} MB)",
            percentage(bytes_so_far, self.declared_bytes),
            bytes_so_far as f64 / (1024.0 * 1024.0),
            self.declared_mb
        ));
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// 进度百分比：已写入字节 / 声明大小换算出的字节数，截断到一位小数。
/// 声明大小为 0 时直接报 0，避免除零。
pub(crate) fn percentage(bytes_so_far: u64, declared_bytes: f64) -> f64 {
    if declared_bytes <= 0.0 {
        return 0.0;
    }
    truncate_one_decimal(bytes_so_far as f64 / declared_bytes * 100.0)
}

fn truncate_one_decimal(value: f64) -> f64 {
    (value * 10.0).trunc() / 10.0
}
