//! skyhook validate コマンドハンドラ
//!
//! ローカルカタログファイルをパースして、定義済みバージョンと
//! イメージ数を表示する。pull は一切行わない。

use colored::Colorize;
use skyhook_core::{Catalog, catalog};
use std::path::Path;

pub fn handle(catalog_path: &Path) -> anyhow::Result<()> {
    let loaded = Catalog::load(catalog_path)?;

    println!(
        "{} カタログを読み込みました: {}",
        "✓".green().bold(),
        catalog_path.display().to_string().cyan()
    );
    println!();

    for (version, image_count) in loaded.summary() {
        if catalog::is_supported(version) {
            println!("  {:<12} {} images", version.green(), image_count);
        } else {
            println!(
                "  {:<12} {} images {}",
                version.yellow(),
                image_count,
                "(サポート対象外のバージョン)".dimmed()
            );
        }
    }

    Ok(())
}
