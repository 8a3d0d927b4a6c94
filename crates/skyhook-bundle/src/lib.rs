//! skyhook-bundle — pull / save / archive パイプライン
//!
//! マニフェストに載ったイメージを順番に pull して tar に保存し、
//! 最後に1つの tar.gz バンドルへ束ねる。外部コマンド相当の操作は
//! すべてケイパビリティ（`Puller` / `Saver` / `Archiver` /
//! `Authenticator`）として切り出してあり、テストではフェイクに
//! 差し替えられる。本番実装は bollard（Docker API）と
//! tar + flate2、`docker login` CLI。

pub mod archiver;
pub mod auth;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod report;

pub use archiver::{Archiver, TarGzArchiver};
pub use auth::{Authenticator, DockerCliAuthenticator, StoredCredentials, to_docker_credentials};
pub use engine::DockerEngine;
pub use error::{BundleError, Result};
pub use pipeline::{BundlePipeline, Puller, Saver};
pub use progress::BundleProgress;
pub use report::{PullOutcome, PullResult, RunLogger, RunReport};
