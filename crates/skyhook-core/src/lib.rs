//! skyhook-core — エアギャップ配送のドメインモデル
//!
//! skyhook は、閉域環境へのデプロイに必要なコンテナイメージ一式を
//! オフライン転送用に梱包するツール。このクレートはその中核となる
//! ドメインモデルを提供する:
//!
//! - **Version Catalog**: リリースバージョン → ベースイメージ列の解決
//! - **Feature Selector**: 名前付き拡張（スキャナ連携）とハードン版書き換え
//! - **Manifest**: 実行1回分の、重複なし順序付きイメージ参照列
//! - **RunContext**: 作業ディレクトリと実行前クリーンアップ
//!
//! ネットワークにも Docker にも触らないため、すべて単体テスト可能。

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod features;
pub mod image;
pub mod manifest;

pub use catalog::{Catalog, DEFAULT_VERSION, SUPPORTED_VERSIONS};
pub use config::{RegistryCredentials, RunConfig};
pub use context::RunContext;
pub use error::{CoreError, Result};
pub use features::FeatureExtension;
pub use image::{ImageReference, Registry};
pub use manifest::Manifest;
