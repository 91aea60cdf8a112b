//! Asset loading for the playfield scene.
//!
//! Assets are acquired once, before the frame loop starts, through the async
//! [`AssetLoader`] collaborator. Loaded bytes are registered in a
//! content-addressed [`AssetStore`]; the scene refers to assets by
//! [`AssetId`], never by raw file paths.
//!
//! # Invariants
//! - A failed load is terminal for that resource for the session; no retries.
//! - Only the avatar model gates its actor. Every other failure degrades to
//!   "feature absent" with a warning.

mod decode;
mod loader;
mod manifest;
mod store;

pub use decode::{AnimationAsset, AudioClip, AudioFormat, AvatarAsset, ImageFormat, ModelAsset, TextureAsset};
pub use loader::{AssetLoader, FileAssetLoader};
pub use manifest::{AssetManifest, SceneAssets, load_scene_assets};
pub use store::{AssetId, AssetKind, AssetRecord, AssetStore};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("cannot decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn crate_info() -> &'static str {
    "playfield-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
