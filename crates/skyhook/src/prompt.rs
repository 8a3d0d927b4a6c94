//! 対話プロンプト
//!
//! フラグで与えられなかった入力を標準入力から補う。すべてのプロンプトに
//! デフォルトがあり、Enter だけで先に進める。

use colored::Colorize;
use skyhook_core::{DEFAULT_VERSION, RegistryCredentials, catalog};
use std::io::Write;

fn read_line(question: &str) -> anyhow::Result<String> {
    print!("{}", question);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// リリースバージョンの入力
///
/// `list` で一覧を表示して聞き直す。サポート外の入力も聞き直す
pub fn prompt_version() -> anyhow::Result<String> {
    loop {
        let input = read_line(&format!(
            "リリースバージョンを入力してください（`list` で一覧表示）[{}]: ",
            DEFAULT_VERSION
        ))?;

        if input.is_empty() {
            return Ok(DEFAULT_VERSION.to_string());
        }

        if input.eq_ignore_ascii_case("list") {
            crate::commands::versions::print_version_table();
            continue;
        }

        match catalog::resolve_version(&input) {
            Ok(version) => return Ok(version),
            Err(e) => {
                println!("{} {}", "✗".red(), e);
            }
        }
    }
}

/// yes/no 確認（デフォルトは no）
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    let input = read_line(&format!("{} [y/N]: ", question))?;
    Ok(input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes"))
}

/// ハードンレジストリの認証情報の入力
pub fn prompt_credentials(
    registry: &str,
    username: Option<String>,
) -> anyhow::Result<RegistryCredentials> {
    println!("{} の認証情報を入力してください:", registry.cyan());

    let username = match username {
        Some(username) => username,
        None => loop {
            let input = read_line("  ユーザー名: ")?;
            if !input.is_empty() {
                break input;
            }
        },
    };

    let secret = loop {
        let input = read_line("  CLIシークレット: ")?;
        if !input.is_empty() {
            break input;
        }
    };

    Ok(RegistryCredentials { username, secret })
}
