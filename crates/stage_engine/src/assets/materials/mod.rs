//! Material loading subsystem
//!
//! Materials come from either RON material files or Wavefront .mtl
//! libraries; both funnel into the same [`MaterialAsset`] shape.

pub mod mtl_parser;

pub use mtl_parser::{MtlData, MtlParser};

use serde::{Deserialize, Serialize};

use crate::assets::TextureHandle;
use crate::foundation::math::Vec4;

/// A loaded surface material
///
/// Shared by every mesh node that references the same material file, so
/// editing one through [`crate::assets::Assets::material_mut`] retints
/// all of them at once.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialAsset {
    /// Display name, usually derived from the file stem
    pub name: String,

    /// Albedo color factor (RGBA)
    pub albedo: Vec4,

    /// Optional albedo texture
    pub albedo_texture: Option<TextureHandle>,
}

impl MaterialAsset {
    /// Create a plain untextured material
    pub fn new(name: impl Into<String>, albedo: Vec4) -> Self {
        Self {
            name: name.into(),
            albedo,
            albedo_texture: None,
        }
    }
}

impl Default for MaterialAsset {
    fn default() -> Self {
        Self {
            name: String::new(),
            albedo: Vec4::new(1.0, 1.0, 1.0, 1.0),
            albedo_texture: None,
        }
    }
}

/// On-disk RON description of a material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialFile {
    /// Material name
    pub name: String,

    /// Albedo color factor (RGBA)
    #[serde(default = "default_albedo")]
    pub albedo: [f32; 4],

    /// Path to an albedo texture, resolved against the search paths
    #[serde(default)]
    pub albedo_texture: Option<String>,
}

fn default_albedo() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

impl MaterialFile {
    /// Parse a RON material description
    pub fn parse(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Convert to the runtime material shape, texture still unresolved
    pub fn into_asset(self) -> MaterialAsset {
        MaterialAsset::new(self.name, Vec4::from(self.albedo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_material_file() {
        let contents = r#"
MaterialFile(
    name: "marble",
    albedo: (0.9, 0.9, 0.85, 1.0),
    albedo_texture: Some("textures/marble.png"),
)
"#;
        let file = MaterialFile::parse(contents).unwrap();
        assert_eq!(file.name, "marble");
        assert_eq!(file.albedo_texture.as_deref(), Some("textures/marble.png"));

        let asset = file.into_asset();
        assert_eq!(asset.albedo, Vec4::new(0.9, 0.9, 0.85, 1.0));
        assert!(asset.albedo_texture.is_none());
    }

    #[test]
    fn test_albedo_defaults_to_white() {
        let contents = r#"MaterialFile(name: "plain")"#;
        let file = MaterialFile::parse(contents).unwrap();
        assert_eq!(file.albedo, [1.0, 1.0, 1.0, 1.0]);
        assert!(file.albedo_texture.is_none());
    }
}
