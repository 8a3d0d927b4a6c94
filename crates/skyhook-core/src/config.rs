//! 実行設定
//!
//! 1回の実行の冒頭でユーザー入力から一度だけ構築され、以降は読み取り専用。

use std::fmt;

/// ハードンレジストリの認証情報
#[derive(Clone)]
pub struct RegistryCredentials {
    pub username: String,
    pub secret: String,
}

// シークレットをログやエラーメッセージに出さない
impl fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// 1回の実行の設定
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// 選択されたリリースバージョン
    pub version: String,
    /// BDBA スキャナ連携イメージを含める
    pub with_bdba: bool,
    /// Reversing Labs スキャナ連携イメージを含める
    pub with_rl: bool,
    /// ハードン版（Iron Bank）イメージに切り替える
    pub hardened: bool,
    /// ハードンレジストリの認証情報（hardened のときのみ Some）
    pub credentials: Option<RegistryCredentials>,
}

impl RunConfig {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            with_bdba: false,
            with_rl: false,
            hardened: false,
            credentials: None,
        }
    }

    /// フィーチャー拡張IDが有効化されているか
    pub fn is_extension_enabled(&self, id: &str) -> bool {
        match id {
            "bdba" => self.with_bdba,
            "rl" => self.with_rl,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_flags() {
        let mut config = RunConfig::new("2024.7.0");
        assert!(!config.is_extension_enabled("bdba"));

        config.with_bdba = true;
        assert!(config.is_extension_enabled("bdba"));
        assert!(!config.is_extension_enabled("rl"));
        assert!(!config.is_extension_enabled("unknown"));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = RegistryCredentials {
            username: "operator".to_string(),
            secret: "super-secret".to_string(),
        };
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("operator"));
        assert!(!rendered.contains("super-secret"));
    }
}
