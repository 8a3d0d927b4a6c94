//! 最終バンドルの作成
//!
//! 保存済みのイメージ tar 群を1つの tar.gz に束ねる。入力が空のときは
//! 失敗する（全 pull 失敗の実行ではバンドルを作らない）。

use crate::error::{BundleError, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::Builder;

/// バンドル作成のケイパビリティ
pub trait Archiver {
    /// `archives` を `dest` に束ね、バンドルのバイト数を返す
    fn archive(&self, archives: &[PathBuf], dest: &Path) -> Result<u64>;
}

/// tar + gzip によるバンドル作成
pub struct TarGzArchiver;

impl Archiver for TarGzArchiver {
    fn archive(&self, archives: &[PathBuf], dest: &Path) -> Result<u64> {
        if archives.is_empty() {
            return Err(BundleError::NothingToArchive);
        }

        tracing::debug!("{} 件を {} に梱包", archives.len(), dest.display());

        let file = File::create(dest)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut tar = Builder::new(encoder);

        for archive in archives {
            let name = archive
                .file_name()
                .ok_or_else(|| BundleError::SaveFailed {
                    reference: archive.display().to_string(),
                    message: "ファイル名を解決できません".to_string(),
                })?;
            // バンドル直下にフラットに格納する（展開後すぐ docker load できる形）
            tar.append_path_with_name(archive, name)?;
        }

        let encoder = tar.into_inner()?;
        encoder.finish()?;

        Ok(std::fs::metadata(dest)?.len())
    }
}
