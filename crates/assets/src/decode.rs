//! Header-level decoding: enough to validate a file and describe it.

use std::io::Cursor;

use image::ImageReader;
use serde_json::Value;

use crate::AssetError;
use crate::store::AssetId;

/// Summary of a glTF/GLB scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    pub id: AssetId,
    pub source: String,
    pub meshes: Vec<String>,
    pub materials: usize,
    pub nodes: usize,
}

/// A humanoid model carrying VRM metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarAsset {
    pub model: ModelAsset,
    /// `"0.x"` for legacy VRM, otherwise the declared spec version.
    pub vrm_version: String,
}

/// VRM animation clips.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationAsset {
    pub id: AssetId,
    pub source: String,
    pub clips: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureAsset {
    pub id: AssetId,
    pub source: String,
    pub format: ImageFormat,
    /// Width and height in pixels.
    pub dimensions: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub id: AssetId,
    pub source: String,
    pub format: AudioFormat,
    pub byte_len: usize,
}

fn decode_err(path: &str, reason: impl Into<String>) -> AssetError {
    AssetError::Decode {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn le_u32(bytes: &[u8], at: usize) -> Option<u32> {
    bytes.get(at..at + 4)?.try_into().ok().map(u32::from_le_bytes)
}

/// The JSON document of a `.gltf` file or the first chunk of a `.glb`.
pub(crate) fn gltf_json(path: &str, bytes: &[u8]) -> Result<Value, AssetError> {
    if bytes.starts_with(b"glTF") {
        let version = le_u32(bytes, 4).ok_or_else(|| decode_err(path, "truncated GLB header"))?;
        if version != 2 {
            return Err(decode_err(path, format!("unsupported GLB version {version}")));
        }
        let chunk_len =
            le_u32(bytes, 12).ok_or_else(|| decode_err(path, "missing JSON chunk"))? as usize;
        if bytes.get(16..20) != Some(b"JSON".as_slice()) {
            return Err(decode_err(path, "first chunk is not JSON"));
        }
        let chunk = bytes
            .get(20..20 + chunk_len)
            .ok_or_else(|| decode_err(path, "JSON chunk overruns file"))?;
        return Ok(serde_json::from_slice(chunk)?);
    }
    if bytes.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{') {
        return Ok(serde_json::from_slice(bytes)?);
    }
    Err(decode_err(path, "not a glTF document"))
}

fn array_len(json: &Value, key: &str) -> usize {
    json.get(key).and_then(|v| v.as_array()).map_or(0, Vec::len)
}

pub(crate) fn model(id: AssetId, path: &str, json: &Value) -> ModelAsset {
    let meshes = json
        .get("meshes")
        .and_then(|m| m.as_array())
        .map(|meshes| {
            meshes
                .iter()
                .enumerate()
                .map(|(i, mesh)| {
                    let name = mesh.get("name").and_then(|n| n.as_str()).unwrap_or("unnamed");
                    format!("{name}_{i}")
                })
                .collect()
        })
        .unwrap_or_default();
    ModelAsset {
        id,
        source: path.to_string(),
        meshes,
        materials: array_len(json, "materials"),
        nodes: array_len(json, "nodes"),
    }
}

pub(crate) fn avatar(id: AssetId, path: &str, json: &Value) -> Result<AvatarAsset, AssetError> {
    let extensions = json.get("extensions");
    let vrm_version = if let Some(vrm1) = extensions.and_then(|e| e.get("VRMC_vrm")) {
        vrm1.get("specVersion")
            .and_then(|v| v.as_str())
            .unwrap_or("1.0")
            .to_string()
    } else if extensions.and_then(|e| e.get("VRM")).is_some() {
        "0.x".to_string()
    } else {
        return Err(decode_err(path, "no VRM extension"));
    };
    Ok(AvatarAsset {
        model: model(id, path, json),
        vrm_version,
    })
}

pub(crate) fn animation(id: AssetId, path: &str, json: &Value) -> Result<AnimationAsset, AssetError> {
    if json
        .get("extensions")
        .and_then(|e| e.get("VRMC_vrm_animation"))
        .is_none()
    {
        return Err(decode_err(path, "no VRM animation extension"));
    }
    Ok(AnimationAsset {
        id,
        source: path.to_string(),
        clips: array_len(json, "animations"),
    })
}

/// Sniff the container and read the image dimensions without decoding pixels.
pub(crate) fn texture(id: AssetId, path: &str, bytes: &[u8]) -> Result<TextureAsset, AssetError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = match reader.format() {
        Some(image::ImageFormat::Png) => ImageFormat::Png,
        Some(image::ImageFormat::Jpeg) => ImageFormat::Jpeg,
        Some(other) => return Err(decode_err(path, format!("unsupported image format {other:?}"))),
        None => return Err(decode_err(path, "unknown image format")),
    };
    let dimensions = reader
        .into_dimensions()
        .map_err(|error| decode_err(path, format!("image header: {error}")))?;
    Ok(TextureAsset {
        id,
        source: path.to_string(),
        format,
        dimensions,
    })
}

pub(crate) fn audio(id: AssetId, path: &str, bytes: &[u8]) -> Result<AudioClip, AssetError> {
    let mpeg_sync = matches!(bytes, [0xff, second, ..] if second & 0xe0 == 0xe0);
    let format = if bytes.starts_with(b"ID3") || mpeg_sync {
        AudioFormat::Mp3
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WAVE".as_slice()) {
        AudioFormat::Wav
    } else if bytes.starts_with(b"OggS") {
        AudioFormat::Ogg
    } else {
        return Err(decode_err(path, "unknown audio format"));
    };
    Ok(AudioClip {
        id,
        source: path.to_string(),
        format,
        byte_len: bytes.len(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID: AssetId = AssetId(1);

    #[test]
    fn glb_json_chunk_is_read() {
        let bytes = fixtures::glb(&json!({
            "meshes": [{"name": "Tree"}, {}],
            "materials": [{}],
            "nodes": [{}, {}, {}]
        }));
        let doc = gltf_json("tree.glb", &bytes).unwrap();
        let m = model(ID, "tree.glb", &doc);
        assert_eq!(m.meshes, vec!["Tree_0", "unnamed_1"]);
        assert_eq!(m.materials, 1);
        assert_eq!(m.nodes, 3);
    }

    #[test]
    fn plain_gltf_json_is_accepted() {
        let doc = gltf_json("a.gltf", b"  {\"asset\": {\"version\": \"2.0\"}}").unwrap();
        assert_eq!(model(ID, "a.gltf", &doc).meshes.len(), 0);
    }

    #[test]
    fn truncated_glb_is_a_decode_error() {
        let mut bytes = fixtures::glb(&json!({}));
        bytes.truncate(22);
        assert!(matches!(
            gltf_json("x.glb", &bytes),
            Err(AssetError::Decode { .. })
        ));
        assert!(matches!(
            gltf_json("x.glb", b"garbage"),
            Err(AssetError::Decode { .. })
        ));
    }

    #[test]
    fn avatar_versions() {
        let v1 = json!({"extensions": {"VRMC_vrm": {"specVersion": "1.0"}}});
        assert_eq!(avatar(ID, "a.vrm", &v1).unwrap().vrm_version, "1.0");
        let v0 = json!({"extensions": {"VRM": {}}});
        assert_eq!(avatar(ID, "a.vrm", &v0).unwrap().vrm_version, "0.x");
        assert!(avatar(ID, "a.vrm", &json!({})).is_err());
    }

    #[test]
    fn animation_counts_clips() {
        let doc = json!({"extensions": {"VRMC_vrm_animation": {}}, "animations": [{}, {}]});
        assert_eq!(animation(ID, "a.vrma", &doc).unwrap().clips, 2);
        assert!(animation(ID, "a.vrma", &json!({"animations": []})).is_err());
    }

    #[test]
    fn png_and_jpeg_dimensions() {
        let t = texture(ID, "s.png", &fixtures::png(64, 32)).unwrap();
        assert_eq!(t.format, ImageFormat::Png);
        assert_eq!(t.dimensions, (64, 32));
        let j = texture(ID, "s.jpg", &fixtures::jpeg(24, 8)).unwrap();
        assert_eq!(j.format, ImageFormat::Jpeg);
        assert_eq!(j.dimensions, (24, 8));
    }

    #[test]
    fn unknown_or_truncated_images_are_decode_errors() {
        assert!(matches!(
            texture(ID, "s.txt", b"plain text"),
            Err(AssetError::Decode { .. })
        ));
        let mut png = fixtures::png(8, 8);
        png.truncate(12);
        assert!(matches!(
            texture(ID, "s.png", &png),
            Err(AssetError::Decode { .. })
        ));
    }

    #[test]
    fn audio_formats() {
        assert_eq!(audio(ID, "a.mp3", b"ID3\x04").unwrap().format, AudioFormat::Mp3);
        assert_eq!(audio(ID, "a.mp3", &[0xff, 0xfb, 0x90]).unwrap().format, AudioFormat::Mp3);
        assert_eq!(
            audio(ID, "a.wav", b"RIFF\0\0\0\0WAVEfmt ").unwrap().format,
            AudioFormat::Wav
        );
        assert_eq!(audio(ID, "a.ogg", b"OggS").unwrap().format, AudioFormat::Ogg);
        assert!(audio(ID, "a.txt", b"hello").is_err());
    }
}
