//! Per-model drawing recipes

use glam::{Affine2, Mat2, Vec2};
use image::RgbaImage;

use super::canvas::{Canvas, transformed_rect};
use crate::color::Color;

/// Right-angle rotation of the drawing context. Matrices are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Clockwise rotation in raster (y-down) space
    pub fn matrix(&self) -> Mat2 {
        let (sin, cos) = match self {
            Rotation::Deg0 => (0.0, 1.0),
            Rotation::Deg90 => (1.0, 0.0),
            Rotation::Deg180 => (0.0, -1.0),
            Rotation::Deg270 => (-1.0, 0.0),
        };
        Mat2::from_cols(Vec2::new(cos, sin), Vec2::new(-sin, cos))
    }
}

/// Size and centering offset of an image fitted into a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Drawn size, never larger than the region on either axis
    pub size: Vec2,
    /// Half of the unused space on each axis; zero on the clamped axis
    pub offset: Vec2,
}

/// Fit `image` (width, height) inside `region` without distorting it.
///
/// An image relatively wider than the region fills the region's width and
/// is centered vertically; a relatively taller one fills the height and is
/// centered horizontally.
pub fn fit_contain(image: Vec2, region: Vec2) -> Fit {
    let image_aspect = image.x / image.y;
    let region_aspect = region.x / region.y;

    let size = if image_aspect > region_aspect {
        Vec2::new(region.x, region.x / image_aspect)
    } else {
        Vec2::new(region.y * image_aspect, region.y)
    };

    Fit {
        size,
        offset: (region - size) * 0.5,
    }
}

/// Geometric constants that place a user image onto one model's UV layout.
///
/// The context transform is `translate · scale · rotate`; the image is then
/// drawn at `inset + fit.offset` in the rotated, scaled space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRecipe {
    pub translate: Vec2,
    pub scale: Vec2,
    pub rotation: Rotation,
    pub inset: Vec2,
    pub region: Vec2,
}

impl DrawRecipe {
    /// Side panel of the cup. The 180° turn puts the region above the
    /// origin, so the context is shifted down by the surface height.
    pub const CUP: DrawRecipe = DrawRecipe {
        translate: Vec2::new(0.0, 2048.0),
        scale: Vec2::new(-0.25, 0.5),
        rotation: Rotation::Deg180,
        inset: Vec2::new(150.0, 150.0),
        region: Vec2::new(7600.0, 3700.0),
    };

    /// Face of the cushion
    pub const CUSHION: DrawRecipe = DrawRecipe {
        translate: Vec2::ZERO,
        scale: Vec2::new(-0.5, 0.5),
        rotation: Rotation::Deg90,
        inset: Vec2::new(200.0, 200.0),
        region: Vec2::new(3600.0, 3600.0),
    };

    /// Paint `color`, then `image` fitted into this recipe's region
    pub fn paint(&self, canvas: &mut Canvas, color: Color, image: Option<&RgbaImage>) {
        canvas.fill(color.to_rgba());

        let Some(image) = image else {
            return;
        };
        if image.width() == 0 || image.height() == 0 {
            return;
        }

        let fit = fit_contain(image_size(image), self.region);
        canvas.translate(self.translate);
        canvas.scale(self.scale);
        canvas.rotate(self.rotation);
        canvas.draw_image(image, self.inset + fit.offset, fit.size);
    }

    /// Surface-space `(min, max)` corners covered by an image of the given
    /// size, or `None` for an empty image, which [`DrawRecipe::paint`] skips
    pub fn device_rect(&self, image_width: u32, image_height: u32) -> Option<(Vec2, Vec2)> {
        if image_width == 0 || image_height == 0 {
            return None;
        }
        let fit = fit_contain(
            Vec2::new(image_width as f32, image_height as f32),
            self.region,
        );
        Some(transformed_rect(self.transform(), self.inset + fit.offset, fit.size))
    }

    /// Surface-space `(min, max)` corners of the whole printable region
    pub fn print_area(&self) -> (Vec2, Vec2) {
        transformed_rect(self.transform(), self.inset, self.region)
    }

    fn transform(&self) -> Affine2 {
        Affine2::from_translation(self.translate)
            * Affine2::from_scale(self.scale)
            * Affine2::from_mat2(self.rotation.matrix())
    }
}

fn image_size(image: &RgbaImage) -> Vec2 {
    Vec2::new(image.width() as f32, image.height() as f32)
}
