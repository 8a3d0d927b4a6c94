use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Docker接続エラー: {0}")]
    DockerUnavailable(String),

    #[error("レジストリ認証に失敗しました: {registry}\n理由: {message}")]
    AuthFailed { registry: String, message: String },

    #[error("イメージの pull に失敗しました: {reference}\n理由: {message}")]
    PullFailed { reference: String, message: String },

    #[error("イメージの保存に失敗しました: {reference}\n理由: {message}")]
    SaveFailed { reference: String, message: String },

    #[error("アーカイブ対象がありません: すべてのイメージの取得に失敗しました")]
    NothingToArchive,

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

impl BundleError {
    /// ユーザー向けの分かりやすいエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            BundleError::DockerUnavailable(msg) => {
                format!(
                    "Dockerに接続できません: {}\n\
                     \n\
                     解決方法:\n\
                     1. Dockerデーモンが起動しているか確認してください\n\
                     2. docker ps コマンドが正常に動作するか確認してください",
                    msg
                )
            }
            BundleError::AuthFailed { registry, message } => {
                format!(
                    "レジストリ {} へのログインが拒否されました: {}\n\
                     \n\
                     ユーザー名とCLIシークレットを確認してください。",
                    registry, message
                )
            }
            BundleError::NothingToArchive => {
                "バンドルを作成できません: 1件もイメージを取得できませんでした。\n\
                 \n\
                 サマリーに表示された失敗イメージを確認し、ネットワークと\n\
                 レジストリへの到達性を見直してから再実行してください。"
                    .to_string()
            }
            _ => format!("{}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
