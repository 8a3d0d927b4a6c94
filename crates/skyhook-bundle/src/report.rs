//! 実行結果の記録と表示
//!
//! イメージごとの試行結果を積み上げ、実行終了時のサマリーを出力する。
//! 1件の失敗は実行を止めないので、失敗一覧はここで必ず可視化する。

use colored::Colorize;
use skyhook_core::ImageReference;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// イメージ1件の試行結果
#[derive(Debug, Clone)]
pub enum PullOutcome {
    /// pull と保存に成功
    Succeeded { archive: PathBuf, bytes: u64 },
    /// pull または保存に失敗
    Failed { reason: String },
}

/// 試行したイメージ参照と結果の組
#[derive(Debug, Clone)]
pub struct PullResult {
    pub image: ImageReference,
    pub outcome: PullOutcome,
}

impl PullResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, PullOutcome::Succeeded { .. })
    }

    /// 成功時の保存先 tar
    pub fn archive(&self) -> Option<&Path> {
        match &self.outcome {
            PullOutcome::Succeeded { archive, .. } => Some(archive),
            PullOutcome::Failed { .. } => None,
        }
    }
}

/// 実行1回分の試行結果
#[derive(Debug, Default)]
pub struct RunReport {
    results: Vec<PullResult>,
}

impl RunReport {
    pub fn new(results: Vec<PullResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[PullResult] {
        &self.results
    }

    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &PullResult> {
        self.results.iter().filter(|result| result.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &PullResult> {
        self.results.iter().filter(|result| !result.is_success())
    }

    /// 成功分の保存先 tar 一覧（マニフェスト順）
    pub fn archives(&self) -> Vec<PathBuf> {
        self.succeeded()
            .filter_map(|result| result.archive().map(Path::to_path_buf))
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|result| result.is_success())
    }
}

/// イメージごとの進行ログ出力器
pub struct RunLogger {
    start_time: Instant,
    current: Option<Instant>,
}

impl RunLogger {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            current: None,
        }
    }

    fn timestamp() -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }

    /// イメージの試行開始
    pub fn image_start(&mut self, index: usize, total: usize, image: &ImageReference) {
        println!(
            "[{}] {} [{}/{}] {}",
            Self::timestamp().dimmed(),
            "▶".cyan(),
            index,
            total,
            image.pull_reference().cyan()
        );
        self.current = Some(Instant::now());
    }

    /// 試行成功
    pub fn image_success(&mut self, archive: &Path, bytes: u64) {
        let elapsed = self.take_elapsed();
        println!(
            "[{}] {} {} ({}, {})",
            Self::timestamp().dimmed(),
            "✓".green().bold(),
            archive
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default(),
            format_bytes(bytes).dimmed(),
            format_duration(elapsed).dimmed()
        );
    }

    /// 試行失敗（実行は続行する）
    pub fn image_failed(&mut self, reason: &str) {
        let elapsed = self.take_elapsed();
        println!(
            "[{}] {} {} ({})",
            Self::timestamp().dimmed(),
            "✗".red().bold(),
            reason.red(),
            format_duration(elapsed).dimmed()
        );
    }

    fn take_elapsed(&mut self) -> Duration {
        self.current
            .take()
            .map(|start| start.elapsed())
            .unwrap_or_default()
    }

    /// 実行終了時のサマリーを出力
    pub fn print_summary(&self, report: &RunReport) {
        let succeeded = report.succeeded().count();
        let failed = report.failed().count();

        println!();
        println!("{}", "═".repeat(44));
        println!("Bundle Summary");
        println!("{}", "─".repeat(44));
        println!(
            "Total time:    {}",
            format_duration(self.start_time.elapsed()).green()
        );
        println!("Attempted:     {}", report.attempted());
        println!("Succeeded:     {}", succeeded.to_string().green());

        if failed > 0 {
            println!("Failed:        {}", failed.to_string().red().bold());
            println!();
            println!("{}", "失敗したイメージ（個別に再試行してください）:".yellow());
            for result in report.failed() {
                println!("  {} {}", "✗".red(), result.image.pull_reference());
            }
        } else {
            println!("Failed:        {}", "0".green());
        }
        println!("{}", "═".repeat(44));
    }
}

impl Default for RunLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Duration を読みやすい形式にフォーマット
fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let minutes = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", minutes, secs)
    } else if total_secs >= 1 {
        format!("{}.{}s", total_secs, millis / 100)
    } else {
        format!("{}ms", millis)
    }
}

/// バイト数を読みやすい形式にフォーマット
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
