mod commands;
mod fetch;
mod prompt;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skyhook")]
#[command(about = "積んで、固めて、運ぶ。閉域への配送は、ひとつの梱包で。", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// リリースのイメージ一式を取得してバンドルを作成
    Bundle {
        /// リリースバージョン (例: 2024.7.0)。省略時は対話プロンプト
        version: Option<String>,
        /// BDBA スキャナ連携イメージを含める
        #[arg(long)]
        bdba: bool,
        /// Reversing Labs スキャナ連携イメージを含める
        #[arg(long)]
        rl: bool,
        /// ハードン版（Iron Bank）イメージに切り替える
        #[arg(long)]
        hardened: bool,
        /// ローカルカタログファイル（KDL）。省略時はリモートから取得
        #[arg(short, long)]
        catalog: Option<PathBuf>,
        /// 作業ディレクトリ（イメージ tar とバンドルの出力先）
        #[arg(short, long, default_value = "bundle")]
        output: PathBuf,
        /// ハードンレジストリのユーザー名
        #[arg(short = 'u', long, env = "SKYHOOK_REGISTRY_USER")]
        username: Option<String>,
        /// 確認なしで実行
        #[arg(short, long)]
        yes: bool,
    },
    /// サポート対象バージョンの一覧を表示
    Versions,
    /// ローカルカタログファイルを検証
    Validate {
        /// カタログファイル（KDL）
        #[arg(short, long)]
        catalog: PathBuf,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    match cli.command {
        Commands::Version => {
            println!("skyhook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Versions => {
            commands::versions::handle();
            Ok(())
        }
        Commands::Validate { catalog } => commands::validate::handle(&catalog),
        Commands::Bundle {
            version,
            bdba,
            rl,
            hardened,
            catalog,
            output,
            username,
            yes,
        } => {
            commands::bundle::handle(commands::bundle::BundleArgs {
                version,
                bdba,
                rl,
                hardened,
                catalog,
                output,
                username,
                yes,
            })
            .await
        }
    }
}
