//! skyhook versions コマンドハンドラ

use colored::Colorize;
use skyhook_core::{DEFAULT_VERSION, SUPPORTED_VERSIONS};

pub fn handle() {
    println!("{}", "サポート対象バージョン:".bold());
    println!();
    print_version_table();
    println!();
    println!(
        "  {} デフォルトは {} です",
        "ヒント:".dimmed(),
        DEFAULT_VERSION.cyan()
    );
}

/// バージョン一覧を降順・4列で表示
pub fn print_version_table() {
    const COLUMN_COUNT: usize = 4;

    // SUPPORTED_VERSIONS は降順で宣言されている
    let versions: Vec<&str> = SUPPORTED_VERSIONS.to_vec();

    let row_count = versions.len().div_ceil(COLUMN_COUNT);
    let mut columns: Vec<Vec<&str>> = vec![Vec::new(); COLUMN_COUNT];
    for (index, version) in versions.into_iter().enumerate() {
        columns[index % COLUMN_COUNT].push(version);
    }

    for row in 0..row_count {
        for column in columns.iter() {
            if let Some(version) = column.get(row) {
                print!("{:<15} ", version);
            }
        }
        println!();
    }
}
