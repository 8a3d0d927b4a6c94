//! フィーチャー拡張レジストリ
//!
//! オプションのスキャナ連携イメージ群を「名前付き拡張」として登録する。
//! 各拡張は選択バージョンに対して固定のイメージ参照リストを返すだけで、
//! 既存のマニフェストエントリには一切手を触れない。

use crate::image::ImageReference;

/// 名前付きフィーチャー拡張
///
/// `images` は選択バージョンを受け取り、その拡張が追加するイメージ参照の
/// 固定リストを返す
pub struct FeatureExtension {
    /// フラグ名に対応するID
    pub id: &'static str,
    /// 表示名
    pub name: &'static str,
    pub images: fn(version: &str) -> Vec<ImageReference>,
}

/// 登録済みの全拡張（適用順）
static EXTENSIONS: &[FeatureExtension] = &[
    FeatureExtension {
        id: "bdba",
        name: "BDBA (Binary Analysis)",
        images: bdba_images,
    },
    FeatureExtension {
        id: "rl",
        name: "Reversing Labs",
        images: rl_images,
    },
];

pub fn extensions() -> &'static [FeatureExtension] {
    EXTENSIONS
}

/// IDから拡張を引く
pub fn find(id: &str) -> Option<&'static FeatureExtension> {
    extensions().iter().find(|extension| extension.id == id)
}

fn bdba_images(version: &str) -> Vec<ImageReference> {
    vec![
        ImageReference::parse(&format!("blackducksoftware/bdba-worker:{}", version))
            .expect("固定イメージ参照"),
    ]
}

fn rl_images(version: &str) -> Vec<ImageReference> {
    vec![
        ImageReference::parse(&format!("blackducksoftware/rl-service:{}", version))
            .expect("固定イメージ参照"),
    ]
}
