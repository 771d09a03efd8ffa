//! Texture compositing
//!
//! Each model has a fixed recipe that paints a flat base color and, when the
//! user supplied one, an image positioned on the model's printable region.
//! Output surfaces are allocated fresh on every call, so nothing (including
//! transform state) carries over between calls.

mod canvas;
mod recipe;

pub use canvas::Canvas;
pub use recipe::{DrawRecipe, Fit, Rotation, fit_contain};

use image::RgbaImage;

use crate::color::Color;
use crate::model::ModelKind;

/// Width and height of every composite texture
pub const TEXTURE_SIZE: u32 = 2048;

impl ModelKind {
    /// Drawing recipe for this model
    pub fn recipe(&self) -> &'static DrawRecipe {
        match self {
            ModelKind::Cup => &DrawRecipe::CUP,
            ModelKind::Cushion => &DrawRecipe::CUSHION,
        }
    }
}

/// Paint the material texture for `kind`
pub fn composite(kind: ModelKind, color: Color, image: Option<&RgbaImage>) -> RgbaImage {
    let mut canvas = Canvas::new(TEXTURE_SIZE, TEXTURE_SIZE);
    kind.recipe().paint(&mut canvas, color, image);
    canvas.into_image()
}

/// Paint the material texture for a model named by identifier.
///
/// Returns `None` when no recipe exists for `id`; the caller keeps whatever
/// material is currently bound.
pub fn composite_id(id: &str, color: Color, image: Option<&RgbaImage>) -> Option<RgbaImage> {
    let kind = id.parse::<ModelKind>().ok()?;
    Some(composite(kind, color, image))
}
