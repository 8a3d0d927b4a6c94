//! skyhook-core エラー型

use thiserror::Error;

/// カタログ解決・マニフェスト構築のエラー
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(
        "サポート外のバージョンです: {0}\nヒント: `skyhook versions` でサポート対象の一覧を確認してください"
    )]
    UnsupportedVersion(String),

    #[error("カタログにバージョン {0} の定義がありません")]
    VersionNotInCatalog(String),

    #[error("不正なイメージ参照です: {0}")]
    InvalidImageReference(String),

    #[error("マニフェストが空です: 対象バージョンのイメージが1件も解決できませんでした")]
    EmptyManifest,

    #[error("KDL パースエラー: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("不正なカタログ定義: {0}")]
    InvalidCatalog(String),

    #[error("compose ファイルのパースエラー: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
