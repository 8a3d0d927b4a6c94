//! イメージ参照モデル
//!
//! `repo/name:tag` 形式の文字列を検証付きでパースし、pull 先レジストリの
//! 切り替え（Docker Hub / Iron Bank）を一箇所で扱う。

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Iron Bank レジストリのホスト名
pub const HARDENED_REGISTRY: &str = "registry1.dso.mil";

/// Iron Bank 上のリポジトリプレフィックス
pub const HARDENED_REPOSITORY_PREFIX: &str = "ironbank/synopsys/blackduck";

/// ハードン版イメージのタグサフィックス
pub const HARDENED_TAG_SUFFIX: &str = "-ubi";

/// pull 元レジストリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Registry {
    /// Docker Hub（デフォルト）
    DockerHub,
    /// Iron Bank（ハードン版イメージ用）
    Hardened,
}

/// 解決済みのイメージ参照。一度構築したら変更しない
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageReference {
    pub repository: String,
    pub tag: String,
    pub registry: Registry,
}

// PartialOrd/Ord は repository → tag → registry の順で比較したいので
// registry をフィールド末尾に置いている（derive はフィールド順で比較する）

impl ImageReference {
    /// `repo/name:tag` 形式の文字列からパース
    ///
    /// タグ省略・空セグメント・許可外文字は `InvalidImageReference` になる。
    pub fn parse(s: &str) -> Result<Self> {
        let (repository, tag) = s
            .rsplit_once(':')
            .ok_or_else(|| CoreError::InvalidImageReference(s.to_string()))?;

        if repository.is_empty() || tag.is_empty() {
            return Err(CoreError::InvalidImageReference(s.to_string()));
        }

        // リポジトリは `/` 区切りの各セグメントが英数・ピリオド・ハイフン・
        // アンダースコアのみ。タグも同じ文字種
        let segment_ok = |seg: &str| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        };

        if !repository.split('/').all(segment_ok) || !segment_ok(tag) {
            return Err(CoreError::InvalidImageReference(s.to_string()));
        }

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.to_string(),
            registry: Registry::DockerHub,
        })
    }

    /// リポジトリ末尾のイメージ名
    ///
    /// 例: `blackducksoftware/blackduck-webapp` -> `blackduck-webapp`
    pub fn short_name(&self) -> &str {
        self.repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository)
    }

    /// docker pull に渡す完全な参照文字列
    ///
    /// Iron Bank の場合はレジストリホストと固定プレフィックスを付け、
    /// イメージ名はリポジトリ末尾のみを使う
    pub fn pull_reference(&self) -> String {
        match self.registry {
            Registry::DockerHub => format!("{}:{}", self.repository, self.tag),
            Registry::Hardened => format!(
                "{}/{}/{}:{}",
                HARDENED_REGISTRY,
                HARDENED_REPOSITORY_PREFIX,
                self.short_name(),
                self.tag
            ),
        }
    }

    /// 保存先 tar のファイル名（イメージ名とタグから決定的に決まる）
    pub fn archive_file_name(&self) -> String {
        format!("{}-{}.tar", self.short_name(), self.tag)
    }

    /// ハードン版への書き換え
    ///
    /// レジストリを Iron Bank に切り替え、タグに `-ubi` サフィックスを
    /// 付ける（既に付いていればそのまま）。リポジトリ名は変えない
    pub fn hardened(&self) -> Self {
        let tag = if self.tag.ends_with(HARDENED_TAG_SUFFIX) {
            self.tag.clone()
        } else {
            format!("{}{}", self.tag, HARDENED_TAG_SUFFIX)
        };

        Self {
            repository: self.repository.clone(),
            tag,
            registry: Registry::Hardened,
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pull_reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let image = ImageReference::parse("blackducksoftware/blackduck-webapp:2024.7.0").unwrap();
        assert_eq!(image.repository, "blackducksoftware/blackduck-webapp");
        assert_eq!(image.tag, "2024.7.0");
        assert_eq!(image.registry, Registry::DockerHub);
    }

    #[test]
    fn test_parse_single_segment() {
        let image = ImageReference::parse("postgres:15").unwrap();
        assert_eq!(image.repository, "postgres");
        assert_eq!(image.short_name(), "postgres");
    }

    #[test]
    fn test_parse_rejects_missing_tag() {
        assert!(ImageReference::parse("blackducksoftware/blackduck-webapp").is_err());
        assert!(ImageReference::parse("webapp:").is_err());
        assert!(ImageReference::parse(":2024.7.0").is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_characters() {
        assert!(ImageReference::parse("bad image/name:tag").is_err());
        assert!(ImageReference::parse("repo//name:tag").is_err());
        assert!(ImageReference::parse("repo/name:ta g").is_err());
    }

    #[test]
    fn test_short_name() {
        let image = ImageReference::parse("blackducksoftware/blackduck-cfssl:1.0.27").unwrap();
        assert_eq!(image.short_name(), "blackduck-cfssl");
    }

    #[test]
    fn test_pull_reference_docker_hub() {
        let image = ImageReference::parse("blackducksoftware/blackduck-webapp:2024.7.0").unwrap();
        assert_eq!(
            image.pull_reference(),
            "blackducksoftware/blackduck-webapp:2024.7.0"
        );
    }

    #[test]
    fn test_hardened_rewrite() {
        let image = ImageReference::parse("blackducksoftware/blackduck-webapp:2024.7.0").unwrap();
        let hardened = image.hardened();

        assert_eq!(hardened.registry, Registry::Hardened);
        assert_eq!(hardened.repository, image.repository);
        assert_eq!(hardened.tag, "2024.7.0-ubi");
        assert_eq!(
            hardened.pull_reference(),
            "registry1.dso.mil/ironbank/synopsys/blackduck/blackduck-webapp:2024.7.0-ubi"
        );
    }

    #[test]
    fn test_hardened_rewrite_is_idempotent_on_tag() {
        let image = ImageReference::parse("blackducksoftware/blackduck-nginx:1.0.0-ubi").unwrap();
        let hardened = image.hardened();
        assert_eq!(hardened.tag, "1.0.0-ubi");
    }

    #[test]
    fn test_archive_file_name() {
        let image = ImageReference::parse("blackducksoftware/blackduck-webapp:2024.7.0").unwrap();
        assert_eq!(image.archive_file_name(), "blackduck-webapp-2024.7.0.tar");

        // ハードン版でも名前とタグから同じ規則で決まる
        assert_eq!(
            image.hardened().archive_file_name(),
            "blackduck-webapp-2024.7.0-ubi.tar"
        );
    }
}
