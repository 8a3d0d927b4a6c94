//! 実行1回分のマニフェスト
//!
//! 選択バージョン＋フィーチャーフラグから一度だけ構築される、
//! 重複なしの順序付きイメージ参照列。

use crate::config::RunConfig;
use crate::error::{CoreError, Result};
use crate::features;
use crate::image::ImageReference;

/// 順序付き・重複なしのイメージ参照列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    images: Vec<ImageReference>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 末尾に追加する。既に同じ参照があれば何もしない
    pub fn push(&mut self, image: ImageReference) {
        if !self.images.contains(&image) {
            self.images.push(image);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageReference> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[ImageReference] {
        &self.images
    }
}

impl FromIterator<ImageReference> for Manifest {
    fn from_iter<T: IntoIterator<Item = ImageReference>>(iter: T) -> Self {
        let mut manifest = Manifest::new();
        for image in iter {
            manifest.push(image);
        }
        manifest
    }
}

/// ベースのイメージ列と実行設定からマニフェストを解決する
///
/// 順序は決定的: ベース列の順 → 有効化した拡張を登録順に追加。
/// ハードンフラグが立っていれば最後に全参照をハードン版へ書き換える。
pub fn resolve(base: Vec<ImageReference>, config: &RunConfig) -> Result<Manifest> {
    let mut manifest: Manifest = base.into_iter().collect();

    for extension in features::extensions() {
        if config.is_extension_enabled(extension.id) {
            tracing::debug!("フィーチャー拡張を追加: {}", extension.id);
            for image in (extension.images)(&config.version) {
                manifest.push(image);
            }
        }
    }

    if config.hardened {
        manifest = manifest.iter().map(|image| image.hardened()).collect();
    }

    if manifest.is_empty() {
        return Err(CoreError::EmptyManifest);
    }

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;

    fn base_images() -> Vec<ImageReference> {
        vec![
            ImageReference::parse("blackducksoftware/blackduck-webapp:2024.7.0").unwrap(),
            ImageReference::parse("blackducksoftware/blackduck-postgres:15-1.10").unwrap(),
        ]
    }

    #[test]
    fn test_push_dedupes() {
        let mut manifest = Manifest::new();
        let image = ImageReference::parse("a/b:1").unwrap();
        manifest.push(image.clone());
        manifest.push(image);
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_resolve_base_only() {
        let config = RunConfig::new("2024.7.0");
        let manifest = resolve(base_images(), &config).unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.images(), base_images().as_slice());
    }

    #[test]
    fn test_resolve_extensions_strictly_append() {
        let mut config = RunConfig::new("2024.7.0");
        config.with_bdba = true;
        config.with_rl = true;

        let manifest = resolve(base_images(), &config).unwrap();

        // 先頭はベース列のまま
        assert_eq!(&manifest.images()[..2], base_images().as_slice());
        assert!(manifest.len() > 2);
        assert!(
            manifest
                .iter()
                .any(|image| image.repository.contains("bdba-worker"))
        );
        assert!(
            manifest
                .iter()
                .any(|image| image.repository.contains("rl-service"))
        );
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let mut config = RunConfig::new("2024.7.0");
        config.with_bdba = true;

        let first = resolve(base_images(), &config).unwrap();
        let second = resolve(base_images(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_hardened_rewrites_every_entry() {
        let mut config = RunConfig::new("2024.7.0");
        config.hardened = true;

        let manifest = resolve(base_images(), &config).unwrap();

        assert_eq!(manifest.len(), 2);
        for image in manifest.iter() {
            assert_eq!(image.registry, crate::image::Registry::Hardened);
            assert!(image.tag.ends_with("-ubi"));
        }
        // リポジトリ名（論理イメージ）は保たれる
        assert_eq!(
            manifest.images()[0].repository,
            "blackducksoftware/blackduck-webapp"
        );
    }

    #[test]
    fn test_resolve_empty_base_fails() {
        let config = RunConfig::new("2024.7.0");
        let err = resolve(Vec::new(), &config).unwrap_err();
        assert!(matches!(err, CoreError::EmptyManifest));
    }
}
