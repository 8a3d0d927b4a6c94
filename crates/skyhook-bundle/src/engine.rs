//! bollard による Docker エンジンアダプタ
//!
//! `Puller` / `Saver` ケイパビリティの実装。pull は Docker API の
//! create_image ストリーム、保存は export_image ストリームをそのまま
//! ファイルに流し込む。

use crate::error::{BundleError, Result};
use crate::pipeline::{Puller, Saver};
use bollard::Docker;
use bollard::auth::DockerCredentials;
use futures_util::StreamExt;
use skyhook_core::ImageReference;
use std::io::Write as _;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Docker デーモンへの接続と認証情報を束ねたアダプタ
pub struct DockerEngine {
    docker: Docker,
    credentials: Option<DockerCredentials>,
}

impl DockerEngine {
    /// ローカルデフォルトで接続し、疎通を確認する
    pub async fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| BundleError::DockerUnavailable(e.to_string()))?;

        docker
            .ping()
            .await
            .map_err(|e| BundleError::DockerUnavailable(e.to_string()))?;

        Ok(Self {
            docker,
            credentials: None,
        })
    }

    /// pull 時に使う認証情報を設定する（ハードンレジストリ用）
    pub fn with_credentials(mut self, credentials: Option<DockerCredentials>) -> Self {
        self.credentials = credentials;
        self
    }
}

impl Puller for DockerEngine {
    async fn pull(&self, image: &ImageReference) -> Result<()> {
        let reference = image.pull_reference();
        let (from_image, tag) = reference
            .rsplit_once(':')
            .unwrap_or((reference.as_str(), "latest"));

        tracing::debug!("docker pull {}", reference);

        #[allow(deprecated)]
        let options = bollard::image::CreateImageOptions {
            from_image,
            tag,
            ..Default::default()
        };

        #[allow(deprecated)]
        let mut stream = self
            .docker
            .create_image(Some(options), None, self.credentials.clone());

        let mut error_message: Option<String> = None;

        while let Some(info) = stream.next().await {
            match info {
                Ok(info) => {
                    if let Some(err) = info.error {
                        error_message = Some(err);
                    } else if let Some(status) = info.status {
                        // 進捗を同じ行に上書き表示
                        match info.progress {
                            Some(progress) => print!("\r  ↓ {}: {}", status, progress),
                            None => print!("\r  ↓ {}                    ", status),
                        }
                        std::io::stdout().flush()?;
                    }
                }
                Err(e) => {
                    println!();
                    return Err(BundleError::PullFailed {
                        reference: reference.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        println!();

        if let Some(message) = error_message {
            return Err(BundleError::PullFailed {
                reference: reference.clone(),
                message,
            });
        }

        Ok(())
    }
}

impl Saver for DockerEngine {
    async fn save(&self, image: &ImageReference, dest: &Path) -> Result<u64> {
        let reference = image.pull_reference();

        tracing::debug!("docker save {} -> {}", reference, dest.display());

        let mut stream = self.docker.export_image(&reference);
        let mut file = tokio::fs::File::create(dest).await?;
        let mut bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| BundleError::SaveFailed {
                reference: reference.clone(),
                message: e.to_string(),
            })?;
            bytes += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }

        file.flush().await?;

        if bytes == 0 {
            // 空ストリームは保存失敗として扱う（壊れた tar を残さない）
            tokio::fs::remove_file(dest).await.ok();
            return Err(BundleError::SaveFailed {
                reference,
                message: "エンジンが空のイメージストリームを返しました".to_string(),
            });
        }

        Ok(bytes)
    }
}
