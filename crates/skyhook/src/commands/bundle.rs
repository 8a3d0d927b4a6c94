//! skyhook bundle コマンドハンドラ
//!
//! 実行順序は固定: Docker 接続確認 → 作業ディレクトリ初期化（前回成果物の
//! 掃除）→ バージョン・フィーチャー選択 → マニフェスト解決 →（ハードン時のみ）
//! レジストリ認証 → pull/save パイプライン → バンドル作成 → 搬送手順の案内。
//! 掃除は必ずマニフェスト解決より前に行う。

use crate::{fetch, prompt};
use colored::Colorize;
use skyhook_bundle::{
    Archiver, Authenticator, BundlePipeline, BundleProgress, DockerCliAuthenticator, DockerEngine,
    StoredCredentials, TarGzArchiver, to_docker_credentials,
};
use skyhook_core::{
    Catalog, RunConfig, RunContext, catalog, image::HARDENED_REGISTRY, manifest,
};
use std::path::PathBuf;

pub struct BundleArgs {
    pub version: Option<String>,
    pub bdba: bool,
    pub rl: bool,
    pub hardened: bool,
    pub catalog: Option<PathBuf>,
    pub output: PathBuf,
    pub username: Option<String>,
    pub yes: bool,
}

pub async fn handle(args: BundleArgs) -> anyhow::Result<()> {
    // Docker 接続確認
    println!("{}", "▶ Docker デーモンへの接続を確認".bold());
    let engine = DockerEngine::connect()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    println!("  {} 接続しました", "✓".green().bold());
    println!();

    // 作業ディレクトリの初期化。前回実行の tar・監査リスト・バンドルを
    // ここで消す（マニフェスト解決より前）
    let context = RunContext::new(&args.output);
    context.reset()?;

    // バージョン選択
    let interactive = args.version.is_none() && !args.yes;
    let version = match &args.version {
        Some(input) => catalog::resolve_version(input)?,
        // --yes 指定時はプロンプトを出さずデフォルトバージョンを使う
        None if args.yes => skyhook_core::DEFAULT_VERSION.to_string(),
        None => prompt::prompt_version()?,
    };

    // 実行設定（ここから先は読み取り専用）
    let mut config = RunConfig::new(version.as_str());
    config.with_bdba = args.bdba || (interactive && prompt::confirm("BDBA コンテナを含めますか？")?);
    config.with_rl = args.rl
        || (interactive && prompt::confirm("Reversing Labs コンテナを含めますか？")?);
    config.hardened = args.hardened
        || (interactive && prompt::confirm("ハードン版（Iron Bank）イメージを使用しますか？")?);

    // ベースイメージの解決
    println!(
        "{} バージョン {} のイメージ定義を解決",
        "▶".cyan(),
        version.cyan().bold()
    );
    let base = match &args.catalog {
        Some(path) => Catalog::load(path)?.resolve(&version)?,
        None => fetch::fetch_base_images(&version).await?,
    };

    // フィーチャー適用とマニフェスト確定
    let manifest = manifest::resolve(base, &config)?;

    println!();
    println!(
        "{}  {} ({} images)",
        "Manifest:".bold(),
        version.cyan().bold(),
        manifest.len()
    );
    for image in manifest.iter() {
        println!("  {} {}", "•".dimmed(), image.pull_reference());
    }
    println!();

    // ハードンレジストリ認証（pull より前に検証し、拒否されたら即中止）
    if config.hardened {
        let credentials = match StoredCredentials::new().lookup(HARDENED_REGISTRY) {
            Some(credentials) => {
                println!(
                    "  {} {} の保存済み認証情報を使用します",
                    "→".dimmed(),
                    HARDENED_REGISTRY.cyan()
                );
                credentials
            }
            None => prompt::prompt_credentials(HARDENED_REGISTRY, args.username.clone())?,
        };

        DockerCliAuthenticator
            .login(HARDENED_REGISTRY, &credentials)
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        println!(
            "  {} {} にログインしました",
            "✓".green().bold(),
            HARDENED_REGISTRY.cyan()
        );

        config.credentials = Some(credentials);
    }

    // 確認（--yesが指定されていない場合）
    if !args.yes && !prompt::confirm("このマニフェストで取得を開始しますか？")? {
        println!("{}", "中止しました。".yellow());
        return Ok(());
    }
    println!();

    // pull 認証情報を設定（ハードン時のみ Some）
    let engine = engine.with_credentials(
        config
            .credentials
            .as_ref()
            .map(|credentials| to_docker_credentials(HARDENED_REGISTRY, credentials)),
    );

    // pull → save パイプライン（逐次実行、個別失敗は続行）
    let pipeline = BundlePipeline::new(&engine, &engine, &context);
    let report = pipeline.run(&manifest).await?;

    // バンドル作成（1件も成功していなければここで実行全体が失敗する）
    println!();
    let archives = report.archives();
    let progress = BundleProgress::new("バンドルを作成中...");
    match TarGzArchiver.archive(&archives, &context.bundle_path()) {
        Ok(_) => {
            progress.finish(&format!(
                "バンドルを作成しました: {}",
                context.bundle_path().display()
            ));
        }
        Err(e) => {
            progress.finish_error(&e.to_string());
            return Err(anyhow::anyhow!(e.user_message()));
        }
    }

    print_transfer_notes(&context);
    Ok(())
}

/// 搬送・展開手順の案内（対象サーバー側の操作はこの表示のみ）
fn print_transfer_notes(context: &RunContext) {
    println!();
    println!("{}", "次の手順:".bold());
    println!(
        "  1. {} を踏み台経由で対象サーバーへ転送してください",
        context.bundle_path().display().to_string().cyan()
    );
    println!("  2. 対象サーバーで展開します: {}", "tar xvf images.tar.gz".cyan());
    println!("  3. 個々のイメージ tar は展開不要で、そのまま読み込めます:");
    println!(
        "     {}",
        "for i in $(ls *.tar); do docker load -i $i; done".cyan()
    );
}
