use std::path::{Path, PathBuf};

use crate::AssetError;
use crate::decode::{self, AnimationAsset, AudioClip, AvatarAsset, ModelAsset, TextureAsset};
use crate::store::{AssetKind, AssetStore};

/// Asset acquisition collaborator. Each call resolves to a ready resource
/// or a load error.
#[allow(async_fn_in_trait)]
pub trait AssetLoader {
    async fn load_model(&mut self, path: &str) -> Result<ModelAsset, AssetError>;
    async fn load_texture(&mut self, path: &str) -> Result<TextureAsset, AssetError>;
    async fn load_audio_clip(&mut self, path: &str) -> Result<AudioClip, AssetError>;
    async fn load_avatar(&mut self, path: &str) -> Result<AvatarAsset, AssetError>;
    async fn load_avatar_animation(&mut self, path: &str) -> Result<AnimationAsset, AssetError>;
}

/// Loads assets from a directory and registers them in an [`AssetStore`].
#[derive(Debug)]
pub struct FileAssetLoader {
    root: PathBuf,
    store: AssetStore,
}

impl FileAssetLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            store: AssetStore::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn into_store(self) -> AssetStore {
        self.store
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.root.join(path);
        tracing::debug!(path = %full.display(), "loading asset");
        match std::fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl AssetLoader for FileAssetLoader {
    async fn load_model(&mut self, path: &str) -> Result<ModelAsset, AssetError> {
        let bytes = self.read(path)?;
        let json = decode::gltf_json(path, &bytes)?;
        let id = self.store.register(AssetKind::Model, path, &bytes);
        Ok(decode::model(id, path, &json))
    }

    async fn load_texture(&mut self, path: &str) -> Result<TextureAsset, AssetError> {
        let bytes = self.read(path)?;
        let id = self.store.register(AssetKind::Texture, path, &bytes);
        decode::texture(id, path, &bytes)
    }

    async fn load_audio_clip(&mut self, path: &str) -> Result<AudioClip, AssetError> {
        let bytes = self.read(path)?;
        let id = self.store.register(AssetKind::AudioClip, path, &bytes);
        decode::audio(id, path, &bytes)
    }

    async fn load_avatar(&mut self, path: &str) -> Result<AvatarAsset, AssetError> {
        let bytes = self.read(path)?;
        let json = decode::gltf_json(path, &bytes)?;
        let id = self.store.register(AssetKind::Avatar, path, &bytes);
        decode::avatar(id, path, &json)
    }

    async fn load_avatar_animation(&mut self, path: &str) -> Result<AnimationAsset, AssetError> {
        let bytes = self.read(path)?;
        let json = decode::gltf_json(path, &bytes)?;
        let id = self.store.register(AssetKind::AvatarAnimation, path, &bytes);
        decode::animation(id, path, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::fixtures;
    use serde_json::json;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = FileAssetLoader::new(dir.path());
        let err = pollster::block_on(loader.load_model("nope.glb")).unwrap_err();
        assert!(matches!(err, AssetError::NotFound(p) if p == "nope.glb"));
    }

    #[test]
    fn loads_model_and_registers_it() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("model")).unwrap();
        let bytes = fixtures::glb(&json!({"meshes": [{"name": "Soldier"}]}));
        std::fs::write(dir.path().join("model/Soldier.glb"), &bytes).unwrap();

        let mut loader = FileAssetLoader::new(dir.path());
        let model = pollster::block_on(loader.load_model("model/Soldier.glb")).unwrap();
        assert_eq!(model.meshes, vec!["Soldier_0"]);
        let record = loader.store().get(model.id).unwrap();
        assert_eq!(record.kind, AssetKind::Model);
        assert_eq!(record.byte_len, bytes.len());
    }

    #[test]
    fn undecodable_texture_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"not an image").unwrap();
        let mut loader = FileAssetLoader::new(dir.path());
        let err = pollster::block_on(loader.load_texture("bad.png")).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }
}
