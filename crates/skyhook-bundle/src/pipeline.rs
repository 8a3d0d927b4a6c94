//! pull → save パイプライン
//!
//! マニフェストの各イメージを順番に1回ずつ試行する。並列化はしない。
//! 個別イメージの失敗は記録して続行し、実行全体は止めない。
//!
//! 外部コマンド相当の操作は `Puller` / `Saver` のケイパビリティとして
//! 切り出してあり、テストではフェイクに差し替えられる。

use crate::error::Result;
use crate::report::{PullOutcome, PullResult, RunLogger, RunReport};
use skyhook_core::{ImageReference, Manifest, RunContext};
use std::io::Write;
use std::path::Path;

/// イメージをレジストリから取得するケイパビリティ
#[allow(async_fn_in_trait)]
pub trait Puller {
    async fn pull(&self, image: &ImageReference) -> Result<()>;
}

/// 取得済みイメージをファイルに保存するケイパビリティ
///
/// 成功時は書き込んだバイト数を返す
#[allow(async_fn_in_trait)]
pub trait Saver {
    async fn save(&self, image: &ImageReference, dest: &Path) -> Result<u64>;
}

/// pull → save を実行するパイプライン
pub struct BundlePipeline<'a, P, S> {
    puller: &'a P,
    saver: &'a S,
    context: &'a RunContext,
}

impl<'a, P: Puller, S: Saver> BundlePipeline<'a, P, S> {
    pub fn new(puller: &'a P, saver: &'a S, context: &'a RunContext) -> Self {
        Self {
            puller,
            saver,
            context,
        }
    }

    /// マニフェストの全イメージを順番に試行する
    ///
    /// 各参照は試行前に監査リストへ追記する。中断された実行でも
    /// 試行済みの参照が記録に残る
    pub async fn run(&self, manifest: &Manifest) -> Result<RunReport> {
        let mut audit = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.context.audit_list_path())?;

        let total = manifest.len();
        let mut logger = RunLogger::new();
        let mut results = Vec::with_capacity(total);

        for (index, image) in manifest.iter().enumerate() {
            writeln!(audit, "{}", image.pull_reference())?;

            logger.image_start(index + 1, total, image);

            let outcome = self.attempt(image).await;
            match &outcome {
                PullOutcome::Succeeded { archive, bytes } => {
                    logger.image_success(archive, *bytes);
                }
                PullOutcome::Failed { reason } => {
                    tracing::warn!("イメージの取得に失敗: {}: {}", image, reason);
                    logger.image_failed(reason);
                }
            }

            results.push(PullResult {
                image: image.clone(),
                outcome,
            });
        }

        let report = RunReport::new(results);
        logger.print_summary(&report);
        Ok(report)
    }

    async fn attempt(&self, image: &ImageReference) -> PullOutcome {
        if let Err(e) = self.puller.pull(image).await {
            return PullOutcome::Failed {
                reason: e.to_string(),
            };
        }

        let dest = self.context.archive_path(image);
        match self.saver.save(image, &dest).await {
            Ok(bytes) => PullOutcome::Succeeded {
                archive: dest,
                bytes,
            },
            Err(e) => PullOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}
