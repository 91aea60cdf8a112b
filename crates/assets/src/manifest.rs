use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::AssetError;
use crate::decode::{AnimationAsset, AudioClip, AvatarAsset, ModelAsset, TextureAsset};
use crate::loader::AssetLoader;

/// Paths of every asset the scene uses, relative to the asset root.
///
/// A `None` entry means the feature is not wanted at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub player_model: Option<String>,
    pub prop_model: Option<String>,
    pub avatar: Option<String>,
    pub avatar_animation: Option<String>,
    pub particle_texture: Option<String>,
    pub sprite_texture: Option<String>,
    pub background_music: Option<String>,
    pub jump_sound: Option<String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            player_model: Some("model/Soldier.glb".into()),
            prop_model: Some("model/tree.glb".into()),
            avatar: Some("model/void.vrm".into()),
            avatar_animation: Some("model/sample.vrma".into()),
            particle_texture: Some("textures/particle2.png".into()),
            sprite_texture: Some("textures/sprite1.png".into()),
            background_music: Some("sounds/bgm_maoudamashii_healing13.mp3".into()),
            jump_sound: Some("sounds/ping_pong.mp3".into()),
        }
    }
}

impl AssetManifest {
    pub fn from_json_str(src: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Whatever survived startup loading.
#[derive(Debug, Clone, Default)]
pub struct SceneAssets {
    pub player_model: Option<ModelAsset>,
    pub prop_model: Option<ModelAsset>,
    pub avatar: Option<AvatarAsset>,
    pub avatar_animation: Option<AnimationAsset>,
    pub particle_texture: Option<TextureAsset>,
    pub sprite_texture: Option<TextureAsset>,
    pub background_music: Option<AudioClip>,
    pub jump_sound: Option<AudioClip>,
    /// One line per asset that failed to load.
    pub warnings: Vec<String>,
}

impl SceneAssets {
    /// Whether the avatar actor can be created.
    pub fn has_avatar(&self) -> bool {
        self.avatar.is_some()
    }

    fn degrade<T>(&mut self, what: &str, result: Result<T, AssetError>) -> Option<T> {
        match result {
            Ok(asset) => Some(asset),
            Err(e) => {
                tracing::warn!(asset = what, error = %e, "asset unavailable");
                self.warnings.push(format!("{what}: {e}"));
                None
            }
        }
    }
}

/// Load everything in `manifest`, one asset at a time.
///
/// Never fails as a whole. The avatar animation is only requested once the
/// avatar itself loaded, and an avatar animation without clips is dropped.
pub async fn load_scene_assets<L: AssetLoader>(loader: &mut L, manifest: &AssetManifest) -> SceneAssets {
    let mut out = SceneAssets::default();

    if let Some(path) = &manifest.background_music {
        let r = loader.load_audio_clip(path).await;
        out.background_music = out.degrade("background_music", r);
    }
    if let Some(path) = &manifest.jump_sound {
        let r = loader.load_audio_clip(path).await;
        out.jump_sound = out.degrade("jump_sound", r);
    }
    if let Some(path) = &manifest.prop_model {
        let r = loader.load_model(path).await;
        out.prop_model = out.degrade("prop_model", r);
    }
    if let Some(path) = &manifest.player_model {
        let r = loader.load_model(path).await;
        out.player_model = out.degrade("player_model", r);
    }
    if let Some(path) = &manifest.particle_texture {
        let r = loader.load_texture(path).await;
        out.particle_texture = out.degrade("particle_texture", r);
    }
    if let Some(path) = &manifest.sprite_texture {
        let r = loader.load_texture(path).await;
        out.sprite_texture = out.degrade("sprite_texture", r);
    }
    if let Some(path) = &manifest.avatar {
        let r = loader.load_avatar(path).await;
        out.avatar = out.degrade("avatar", r);
    }
    if let (true, Some(path)) = (out.has_avatar(), &manifest.avatar_animation) {
        let r = loader.load_avatar_animation(path).await;
        out.avatar_animation = out.degrade("avatar_animation", r).filter(|a| {
            if a.clips == 0 {
                tracing::warn!(path = %a.source, "avatar animation has no clips");
            }
            a.clips > 0
        });
    }

    tracing::info!(
        warnings = out.warnings.len(),
        avatar = out.has_avatar(),
        "scene assets loaded"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::fixtures;
    use crate::loader::FileAssetLoader;
    use serde_json::json;

    fn write(root: &Path, rel: &str, bytes: &[u8]) {
        let full = root.join(rel);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, bytes).unwrap();
    }

    fn full_tree(root: &Path) {
        write(root, "model/Soldier.glb", &fixtures::glb(&json!({"meshes": [{"name": "Soldier"}]})));
        write(root, "model/tree.glb", &fixtures::glb(&json!({"meshes": [{"name": "Tree"}]})));
        write(
            root,
            "model/void.vrm",
            &fixtures::glb(&json!({"extensions": {"VRMC_vrm": {"specVersion": "1.0"}}})),
        );
        write(
            root,
            "model/sample.vrma",
            &fixtures::glb(&json!({"extensions": {"VRMC_vrm_animation": {}}, "animations": [{}]})),
        );
        write(root, "textures/particle2.png", &fixtures::png(16, 16));
        write(root, "textures/sprite1.png", &fixtures::png(128, 64));
        write(root, "sounds/bgm_maoudamashii_healing13.mp3", b"ID3\x04bgm");
        write(root, "sounds/ping_pong.mp3", b"ID3\x04ping");
    }

    #[test]
    fn full_manifest_loads_everything() {
        let dir = tempfile::tempdir().unwrap();
        full_tree(dir.path());
        let mut loader = FileAssetLoader::new(dir.path());
        let assets = pollster::block_on(load_scene_assets(&mut loader, &AssetManifest::default()));
        assert!(assets.warnings.is_empty(), "{:?}", assets.warnings);
        assert!(assets.has_avatar());
        assert_eq!(assets.avatar_animation.unwrap().clips, 1);
        assert_eq!(assets.sprite_texture.unwrap().dimensions, (128, 64));
        assert_eq!(loader.store().len(), 8);
    }

    #[test]
    fn missing_animation_only_warns() {
        let dir = tempfile::tempdir().unwrap();
        full_tree(dir.path());
        std::fs::remove_file(dir.path().join("model/sample.vrma")).unwrap();
        let mut loader = FileAssetLoader::new(dir.path());
        let assets = pollster::block_on(load_scene_assets(&mut loader, &AssetManifest::default()));
        assert!(assets.has_avatar());
        assert!(assets.avatar_animation.is_none());
        assert_eq!(assets.warnings.len(), 1);
    }

    #[test]
    fn broken_avatar_skips_animation() {
        let dir = tempfile::tempdir().unwrap();
        full_tree(dir.path());
        write(dir.path(), "model/void.vrm", &fixtures::glb(&json!({})));
        let mut loader = FileAssetLoader::new(dir.path());
        let assets = pollster::block_on(load_scene_assets(&mut loader, &AssetManifest::default()));
        assert!(!assets.has_avatar());
        assert!(assets.avatar_animation.is_none());
        assert!(assets.player_model.is_some());
        assert_eq!(assets.warnings.len(), 1);
    }

    #[test]
    fn empty_directory_degrades_without_failing() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = FileAssetLoader::new(dir.path());
        let assets = pollster::block_on(load_scene_assets(&mut loader, &AssetManifest::default()));
        assert_eq!(assets.warnings.len(), 7);
        assert!(assets.player_model.is_none());
    }

    #[test]
    fn manifest_json_fills_defaults() {
        let m = AssetManifest::from_json_str(r#"{"avatar": null, "jump_sound": "a.wav"}"#).unwrap();
        assert_eq!(m.avatar, None);
        assert_eq!(m.jump_sound.as_deref(), Some("a.wav"));
        assert_eq!(m.prop_model.as_deref(), Some("model/tree.glb"));
    }
}
