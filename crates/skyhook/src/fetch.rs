//! リモートカタログ取得
//!
//! リリースタグに固定された docker-swarm compose ファイル群を取得し、
//! ベースイメージ列を解決する。閉域に入る前の準備側でだけ動く。

use skyhook_core::ImageReference;

/// バージョン定義を持つ上流リポジトリ
const CATALOG_REPOSITORY: &str = "blackducksoftware/hub";

/// 取得対象の compose ファイル（bool は必須かどうか）
///
/// スキャナ連携の compose はフィーチャー拡張側で扱うため取得しない
const COMPOSE_FILES: &[(&str, bool)] = &[
    ("docker-compose.yml", true),
    ("docker-compose.dbmigrate.yml", false),
    ("docker-compose.externaldb.yml", false),
];

fn compose_url(version: &str, file: &str) -> String {
    format!(
        "https://raw.githubusercontent.com/{}/v{}/docker-swarm/{}",
        CATALOG_REPOSITORY, version, file
    )
}

/// 指定バージョンのベースイメージ列をリモートから解決する
pub async fn fetch_base_images(version: &str) -> anyhow::Result<Vec<ImageReference>> {
    let client = reqwest::Client::new();
    let mut documents = Vec::new();

    for (file, required) in COMPOSE_FILES {
        let url = compose_url(version, file);
        tracing::debug!("compose ファイルを取得: {}", url);

        let response = client
            .get(&url)
            .header("User-Agent", "skyhook")
            .send()
            .await?;

        if !response.status().is_success() {
            if *required {
                return Err(anyhow::anyhow!(
                    "バージョン定義を取得できませんでした: {} ({})\n\
                     ヒント: バージョン {} のリリースタグが存在するか、ネットワークが\n\
                     上流リポジトリに到達できるかを確認してください",
                    url,
                    response.status(),
                    version
                ));
            }
            // 任意ファイルはリリースによって存在しない
            tracing::debug!("{} はこのリリースに存在しません ({})", file, response.status());
            continue;
        }

        documents.push(response.text().await?);
    }

    let images =
        skyhook_core::catalog::base_images_from_compose(documents.iter().map(String::as_str))?;

    tracing::info!(
        "バージョン {} のベースイメージ {} 件を解決",
        version,
        images.len()
    );

    Ok(images)
}
