// material.rs - material handle owned by a panorama

use image::RgbaImage;
use std::sync::Arc;

/// Decoded texture, shared with whoever uploads it to the GPU.
pub type Texture = Arc<RgbaImage>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone)]
pub struct Material {
    pub map: Option<Texture>,
    pub opacity: f32,
    pub transparent: bool,
    pub visible: bool,
    pub side: Side,
    /// Set when the renderer must re-upload the material.
    pub needs_update: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            map: None,
            opacity: 1.0,
            transparent: false,
            visible: true,
            side: Side::Front,
            needs_update: false,
        }
    }
}

impl Material {
    /// Fully transparent material, ready to be faded in.
    pub fn transparent() -> Self {
        Self {
            opacity: 0.0,
            transparent: true,
            ..Self::default()
        }
    }
}
