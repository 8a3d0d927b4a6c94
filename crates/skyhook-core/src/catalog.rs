//! バージョンカタログ
//!
//! サポート対象のリリースバージョン一覧と、バージョン → ベースイメージ列の
//! 解決を担う。解決元は2系統:
//!
//! - リモート: リリースタグに固定された docker-swarm compose ファイル群
//!   （取得自体はCLI側の仕事。ここでは compose YAML からの抽出のみ）
//! - ローカル: `version "X" { image "repo:tag" ... }` 形式の KDL カタログ

use crate::error::{CoreError, Result};
use crate::image::ImageReference;
use kdl::KdlDocument;
use std::collections::BTreeMap;
use std::path::Path;

/// サポート対象のリリースバージョン（降順）
pub const SUPPORTED_VERSIONS: &[&str] = &[
    "2024.7.0", "2024.4.1", "2024.4.0", "2024.1.1", "2024.1.0", "2023.10.2", "2023.10.1",
    "2023.10.0", "2023.7.3", "2023.7.2", "2023.7.1", "2023.7.0", "2023.4.2", "2023.4.1",
    "2023.4.0", "2023.1.2", "2023.1.1", "2023.1.0",
];

/// バージョン未指定時のデフォルト
pub const DEFAULT_VERSION: &str = "2024.7.0";

/// サポート対象のバージョンか
pub fn is_supported(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// ユーザー入力からバージョン番号を抽出・正規化する
///
/// `2024.7.0` / `v2024.7.0` / `2024.7.0 ` などを受け付け、
/// `YYYY.minor.patch` 形式に揃える。形式外の入力は `None`
pub fn normalize_version(input: &str) -> Option<String> {
    let pattern = regex::Regex::new(r"(\d{4}\.\d+\.\d+)").expect("バージョン抽出の正規表現");
    pattern
        .captures(input)
        .map(|captures| captures[1].to_string())
}

/// サポート確認込みのバージョン解決
pub fn resolve_version(input: &str) -> Result<String> {
    let version = normalize_version(input)
        .ok_or_else(|| CoreError::UnsupportedVersion(input.to_string()))?;

    if !is_supported(&version) {
        return Err(CoreError::UnsupportedVersion(version));
    }

    Ok(version)
}

/// compose YAML の `services.*.image` からイメージ参照を抽出する
///
/// 参照形式が不正なエントリはログに残してスキップする（1件の不正で
/// 全体を失敗させない）
pub fn parse_compose_images(yaml: &str) -> Result<Vec<ImageReference>> {
    let doc: serde_yaml::Value = serde_yaml::from_str(yaml)?;

    let mut images = Vec::new();
    let services = doc
        .get("services")
        .and_then(|services| services.as_mapping());

    let Some(services) = services else {
        return Ok(images);
    };

    for (name, service) in services {
        let Some(image) = service.get("image").and_then(|image| image.as_str()) else {
            continue;
        };

        match ImageReference::parse(image) {
            Ok(reference) => images.push(reference),
            Err(_) => {
                tracing::warn!(
                    "サービス {:?} のイメージ参照をスキップ: {}",
                    name.as_str().unwrap_or("?"),
                    image
                );
            }
        }
    }

    Ok(images)
}

/// 複数の compose ドキュメントからベースイメージ列を構築する
///
/// 抽出結果をソート・重複排除した決定的な列を返す。1件も解決できなければ
/// `EmptyManifest`
pub fn base_images_from_compose<'a, I>(documents: I) -> Result<Vec<ImageReference>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut images = Vec::new();
    for document in documents {
        images.extend(parse_compose_images(document)?);
    }

    images.sort();
    images.dedup();

    if images.is_empty() {
        return Err(CoreError::EmptyManifest);
    }

    Ok(images)
}

/// ローカルカタログ: バージョン → イメージ参照列
#[derive(Debug, Default)]
pub struct Catalog {
    versions: BTreeMap<String, Vec<ImageReference>>,
}

impl Catalog {
    /// KDLカタログファイルをパース
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// KDL文字列をパース
    ///
    /// 文法:
    /// ```kdl
    /// version "2024.7.0" {
    ///     image "blackducksoftware/blackduck-webapp:2024.7.0"
    ///     image "blackducksoftware/blackduck-postgres:15-1.10"
    /// }
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let doc: KdlDocument = content.parse()?;

        let mut catalog = Catalog::default();

        for node in doc.nodes() {
            match node.name().value() {
                "version" => {
                    let version = node
                        .entries()
                        .first()
                        .and_then(|entry| entry.value().as_string())
                        .ok_or_else(|| {
                            CoreError::InvalidCatalog("version にはバージョン名が必要です".into())
                        })?
                        .to_string();

                    let mut images = Vec::new();
                    if let Some(children) = node.children() {
                        for child in children.nodes() {
                            if child.name().value() != "image" {
                                continue;
                            }
                            let reference = child
                                .entries()
                                .first()
                                .and_then(|entry| entry.value().as_string())
                                .ok_or_else(|| {
                                    CoreError::InvalidCatalog(format!(
                                        "version \"{}\" の image には参照文字列が必要です",
                                        version
                                    ))
                                })?;
                            images.push(ImageReference::parse(reference)?);
                        }
                    }

                    catalog.versions.insert(version, images);
                }
                _ => {
                    // 不明なノードはスキップ
                }
            }
        }

        if catalog.versions.is_empty() {
            return Err(CoreError::InvalidCatalog(
                "version ノードが1つも定義されていません".into(),
            ));
        }

        Ok(catalog)
    }

    /// 指定バージョンのベースイメージ列を解決する
    pub fn resolve(&self, version: &str) -> Result<Vec<ImageReference>> {
        let images = self
            .versions
            .get(version)
            .ok_or_else(|| CoreError::VersionNotInCatalog(version.to_string()))?;

        if images.is_empty() {
            return Err(CoreError::EmptyManifest);
        }

        let mut images = images.clone();
        images.sort();
        images.dedup();
        Ok(images)
    }

    /// 定義済みバージョンと各イメージ数の一覧（カタログ検証用）
    pub fn summary(&self) -> Vec<(&str, usize)> {
        self.versions
            .iter()
            .map(|(version, images)| (version.as_str(), images.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CATALOG: &str = r#"
version "2024.7.0" {
    image "blackducksoftware/blackduck-webapp:2024.7.0"
    image "blackducksoftware/blackduck-postgres:15-1.10"
    image "blackducksoftware/blackduck-nginx:2.0.65"
}

version "2024.4.1" {
    image "blackducksoftware/blackduck-webapp:2024.4.1"
}
"#;

    const SAMPLE_COMPOSE: &str = r#"
services:
  webapp:
    image: blackducksoftware/blackduck-webapp:2024.7.0
    ports:
      - "8443:8443"
  postgres:
    image: blackducksoftware/blackduck-postgres:15-1.10
  logstash:
    image: blackducksoftware/blackduck-logstash:1.0.37
  jobrunner:
    build: ./jobrunner
"#;

    #[test]
    fn test_supported_versions_non_empty_and_default_supported() {
        assert!(!SUPPORTED_VERSIONS.is_empty());
        assert!(is_supported(DEFAULT_VERSION));
    }

    #[test]
    fn test_normalize_version() {
        assert_eq!(normalize_version("2024.7.0"), Some("2024.7.0".to_string()));
        assert_eq!(normalize_version("v2024.7.0"), Some("2024.7.0".to_string()));
        assert_eq!(
            normalize_version("2023.10.2"),
            Some("2023.10.2".to_string())
        );
        assert_eq!(normalize_version("latest"), None);
        assert_eq!(normalize_version(""), None);
    }

    #[test]
    fn test_resolve_version_rejects_unsupported() {
        assert!(resolve_version("2024.7.0").is_ok());
        let err = resolve_version("1999.1.0").unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedVersion(_)));
    }

    #[test]
    fn test_parse_compose_images() {
        let images = parse_compose_images(SAMPLE_COMPOSE).unwrap();
        assert_eq!(images.len(), 3);
        assert!(
            images
                .iter()
                .any(|image| image.short_name() == "blackduck-webapp")
        );
    }

    #[test]
    fn test_parse_compose_without_services() {
        let images = parse_compose_images("volumes: {}\n").unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn test_base_images_from_compose_sorted_and_deduped() {
        let second = r#"
services:
  webapp:
    image: blackducksoftware/blackduck-webapp:2024.7.0
  registration:
    image: blackducksoftware/blackduck-registration:2024.7.0
"#;
        let images = base_images_from_compose([SAMPLE_COMPOSE, second]).unwrap();

        // webapp は両方に居るが1件に畳まれる
        assert_eq!(images.len(), 4);
        let mut sorted = images.clone();
        sorted.sort();
        assert_eq!(images, sorted);
    }

    #[test]
    fn test_base_images_from_compose_empty_fails() {
        let err = base_images_from_compose(["services: {}\n"]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyManifest));
    }

    #[test]
    fn test_catalog_parse_and_resolve() {
        let catalog = Catalog::parse(SAMPLE_CATALOG).unwrap();

        let images = catalog.resolve("2024.7.0").unwrap();
        assert_eq!(images.len(), 3);

        // 重複なし・非空のプロパティ
        let mut deduped = images.clone();
        deduped.dedup();
        assert_eq!(images.len(), deduped.len());
    }

    #[test]
    fn test_catalog_resolve_unknown_version() {
        let catalog = Catalog::parse(SAMPLE_CATALOG).unwrap();
        let err = catalog.resolve("2023.1.0").unwrap_err();
        assert!(matches!(err, CoreError::VersionNotInCatalog(_)));
    }

    #[test]
    fn test_catalog_rejects_empty_document() {
        let err = Catalog::parse("// コメントだけ\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidCatalog(_)));
    }

    #[test]
    fn test_catalog_rejects_invalid_image() {
        let kdl = r#"
version "2024.7.0" {
    image "not a reference"
}
"#;
        let err = Catalog::parse(kdl).unwrap_err();
        assert!(matches!(err, CoreError::InvalidImageReference(_)));
    }

    #[test]
    fn test_catalog_summary() {
        let catalog = Catalog::parse(SAMPLE_CATALOG).unwrap();
        let summary = catalog.summary();
        assert_eq!(summary.len(), 2);
        assert!(summary.contains(&("2024.7.0", 3)));
    }
}
