//! 実行コンテキスト
//!
//! 作業ディレクトリ内のパス（監査リスト・イメージごとの tar・最終バンドル）を
//! 1つの値に束ね、各ステップに明示的に渡す。前回実行の残骸の掃除もここ。

use crate::error::Result;
use crate::image::ImageReference;
use std::path::{Path, PathBuf};

/// 監査リストのファイル名
pub const AUDIT_LIST_FILE: &str = "images.list";

/// 最終バンドルのファイル名（実行ごとに固定）
pub const BUNDLE_FILE: &str = "images.tar.gz";

/// 1回の実行が使うファイルシステム上のパス一式
#[derive(Debug, Clone)]
pub struct RunContext {
    work_dir: PathBuf,
}

impl RunContext {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// 試行した全イメージ参照を記録するリストファイル
    pub fn audit_list_path(&self) -> PathBuf {
        self.work_dir.join(AUDIT_LIST_FILE)
    }

    /// 最終バンドルのパス
    pub fn bundle_path(&self) -> PathBuf {
        self.work_dir.join(BUNDLE_FILE)
    }

    /// イメージごとの保存先 tar のパス
    pub fn archive_path(&self, image: &ImageReference) -> PathBuf {
        self.work_dir.join(image.archive_file_name())
    }

    /// 前回実行の成果物を削除し、作業ディレクトリを用意する
    ///
    /// マニフェスト解決より前に必ず1回呼ぶ。作業ディレクトリ内の
    /// イメージ tar・監査リスト・バンドルだけを消し、無関係なファイルには
    /// 触らない
    pub fn reset(&self) -> Result<()> {
        if self.work_dir.exists() {
            for entry in std::fs::read_dir(&self.work_dir)? {
                let path = entry?.path();
                if Self::is_run_artifact(&path) {
                    tracing::debug!("前回の成果物を削除: {}", path.display());
                    std::fs::remove_file(&path)?;
                }
            }
        } else {
            std::fs::create_dir_all(&self.work_dir)?;
        }

        Ok(())
    }

    fn is_run_artifact(path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };

        name == AUDIT_LIST_FILE || name == BUNDLE_FILE || name.ends_with(".tar")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_paths() {
        let ctx = RunContext::new("/tmp/bundle");
        assert_eq!(ctx.audit_list_path(), PathBuf::from("/tmp/bundle/images.list"));
        assert_eq!(ctx.bundle_path(), PathBuf::from("/tmp/bundle/images.tar.gz"));

        let image = ImageReference::parse("blackducksoftware/blackduck-webapp:2024.7.0").unwrap();
        assert_eq!(
            ctx.archive_path(&image),
            PathBuf::from("/tmp/bundle/blackduck-webapp-2024.7.0.tar")
        );
    }

    #[test]
    fn test_reset_creates_missing_work_dir() {
        let temp = tempdir().unwrap();
        let ctx = RunContext::new(temp.path().join("bundle"));

        ctx.reset().unwrap();
        assert!(ctx.work_dir().is_dir());
    }

    #[test]
    fn test_reset_removes_prior_artifacts_only() {
        let temp = tempdir().unwrap();
        let ctx = RunContext::new(temp.path());

        fs::write(ctx.audit_list_path(), "old").unwrap();
        fs::write(ctx.bundle_path(), "old").unwrap();
        fs::write(temp.path().join("blackduck-webapp-2024.7.0.tar"), "old").unwrap();
        fs::write(temp.path().join("notes.md"), "keep me").unwrap();

        ctx.reset().unwrap();

        assert!(!ctx.audit_list_path().exists());
        assert!(!ctx.bundle_path().exists());
        assert!(!temp.path().join("blackduck-webapp-2024.7.0.tar").exists());
        assert!(temp.path().join("notes.md").exists());
    }
}
