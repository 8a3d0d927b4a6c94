//! ハードンレジストリ認証
//!
//! ハードンフラグが立っているときだけ呼ばれる。`docker login` で資格情報を
//! 検証してから pull に進む（検証に失敗したら1件も pull しない）。
//! 既に `docker login` 済みなら ~/.docker/config.json の認証情報を再利用できる。

use crate::error::{BundleError, Result};
use base64::Engine;
use bollard::auth::DockerCredentials;
use serde::Deserialize;
use skyhook_core::RegistryCredentials;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// レジストリへのログインを検証するケイパビリティ
#[allow(async_fn_in_trait)]
pub trait Authenticator {
    async fn login(&self, registry: &str, credentials: &RegistryCredentials) -> Result<()>;
}

/// `docker login --password-stdin` によるログイン検証
pub struct DockerCliAuthenticator;

impl Authenticator for DockerCliAuthenticator {
    async fn login(&self, registry: &str, credentials: &RegistryCredentials) -> Result<()> {
        tracing::debug!("docker login {}", registry);

        let mut child = Command::new("docker")
            .arg("login")
            .arg(registry)
            .arg("-u")
            .arg(&credentials.username)
            .arg("--password-stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BundleError::AuthFailed {
                registry: registry.to_string(),
                message: format!("docker login を起動できません: {}", e),
            })?;

        // シークレットは stdin 経由でのみ渡す（コマンドラインに残さない）
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(credentials.secret.as_bytes()).ok();
        }

        let output = child
            .wait_with_output()
            .map_err(|e| BundleError::AuthFailed {
                registry: registry.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(BundleError::AuthFailed {
                registry: registry.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Docker config.json の構造
#[derive(Debug, Deserialize)]
struct DockerConfig {
    #[serde(default)]
    auths: HashMap<String, AuthEntry>,
}

/// 認証エントリ
#[derive(Debug, Deserialize)]
struct AuthEntry {
    /// Base64エンコードされた "username:password"
    auth: Option<String>,
}

/// ~/.docker/config.json に保存済みの認証情報を読む
#[derive(Debug)]
pub struct StoredCredentials {
    config_path: PathBuf,
}

impl Default for StoredCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl StoredCredentials {
    /// デフォルトで DOCKER_CONFIG / ~/.docker の config.json を使用
    pub fn new() -> Self {
        let config_path = std::env::var("DOCKER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".docker"))
                    .unwrap_or_else(|| PathBuf::from(".docker"))
            })
            .join("config.json");

        Self { config_path }
    }

    /// 指定したパスの config.json を使用
    pub fn with_config_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// 指定レジストリの保存済み認証情報を取得
    ///
    /// config.json が無い・エントリが無い・デコードできない場合は `None`
    pub fn lookup(&self, registry: &str) -> Option<RegistryCredentials> {
        if !self.config_path.exists() {
            tracing::debug!("Docker config.json が見つかりません: {:?}", self.config_path);
            return None;
        }

        let content = std::fs::read_to_string(&self.config_path).ok()?;
        let config: DockerConfig = serde_json::from_str(&content).ok()?;

        let auth_b64 = config.auths.get(registry)?.auth.as_deref()?;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(auth_b64)
            .ok()?;
        let auth_str = String::from_utf8(decoded).ok()?;
        let (username, secret) = auth_str.split_once(':')?;

        tracing::debug!("{} の保存済み認証情報を再利用", registry);
        Some(RegistryCredentials {
            username: username.to_string(),
            secret: secret.to_string(),
        })
    }
}

/// bollard に渡す DockerCredentials へ変換
pub fn to_docker_credentials(
    registry: &str,
    credentials: &RegistryCredentials,
) -> DockerCredentials {
    DockerCredentials {
        username: Some(credentials.username.clone()),
        password: Some(credentials.secret.clone()),
        serveraddress: Some(registry.to_string()),
        ..Default::default()
    }
}
