//! Raster drawing surface with a canvas-style transform

use glam::{Affine2, Vec2};
use image::{Rgba, RgbaImage};

use super::Rotation;

/// A square raster surface plus the current drawing transform.
///
/// Transforms compose like a 2D canvas context: each call post-multiplies
/// the current transform, so the operation applied last acts first on the
/// coordinates passed to [`Canvas::draw_image`].
pub struct Canvas {
    surface: RgbaImage,
    transform: Affine2,
}

impl Canvas {
    /// Allocate a fully transparent surface with an identity transform
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: RgbaImage::new(width, height),
            transform: Affine2::IDENTITY,
        }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Fill the entire surface, ignoring the transform
    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.surface.pixels_mut() {
            *pixel = color;
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.transform = self.transform * Affine2::from_translation(offset);
    }

    /// Scale the axes; a negative factor mirrors that axis
    pub fn scale(&mut self, factors: Vec2) {
        self.transform = self.transform * Affine2::from_scale(factors);
    }

    pub fn rotate(&mut self, rotation: Rotation) {
        self.transform = self.transform * Affine2::from_mat2(rotation.matrix());
    }

    /// Draw `image` stretched over the user-space rectangle `origin..origin + size`.
    ///
    /// Every covered surface pixel samples the nearest source texel through
    /// the inverse transform and is blended source-over.
    pub fn draw_image(&mut self, image: &RgbaImage, origin: Vec2, size: Vec2) {
        if image.width() == 0 || image.height() == 0 || size.x <= 0.0 || size.y <= 0.0 {
            return;
        }

        let Some((min, max)) = self.device_bounds(origin, size) else {
            return;
        };
        let inverse = self.transform.inverse();
        let texel_scale = Vec2::new(image.width() as f32, image.height() as f32) / size;

        for py in min.1..max.1 {
            for px in min.0..max.0 {
                let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let local = inverse.transform_point2(center) - origin;
                if local.x < 0.0 || local.y < 0.0 || local.x >= size.x || local.y >= size.y {
                    continue;
                }

                let texel = local * texel_scale;
                let tx = (texel.x as u32).min(image.width() - 1);
                let ty = (texel.y as u32).min(image.height() - 1);
                let src = *image.get_pixel(tx, ty);
                let dst = self.surface.get_pixel_mut(px, py);
                *dst = blend_over(src, *dst);
            }
        }
    }

    /// Surface-space rectangle covered by a user-space rectangle, as
    /// `(min_x, min_y)..(max_x, max_y)` clipped to the surface
    fn device_bounds(&self, origin: Vec2, size: Vec2) -> Option<((u32, u32), (u32, u32))> {
        let (lo, hi) = transformed_rect(self.transform, origin, size);
        let clip = |v: f32, limit: u32| v.clamp(0.0, limit as f32);

        let min_x = clip(lo.x.floor(), self.width()) as u32;
        let min_y = clip(lo.y.floor(), self.height()) as u32;
        let max_x = clip(hi.x.ceil(), self.width()) as u32;
        let max_y = clip(hi.y.ceil(), self.height()) as u32;

        (min_x < max_x && min_y < max_y).then_some(((min_x, min_y), (max_x, max_y)))
    }

    /// Finish drawing and hand over the surface
    pub fn into_image(self) -> RgbaImage {
        self.surface
    }
}

/// Axis-aligned bounds of a rectangle after `transform`
pub(crate) fn transformed_rect(transform: Affine2, origin: Vec2, size: Vec2) -> (Vec2, Vec2) {
    let corners = [
        origin,
        origin + Vec2::new(size.x, 0.0),
        origin + Vec2::new(0.0, size.y),
        origin + size,
    ];
    corners
        .iter()
        .map(|&c| transform.transform_point2(c))
        .fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(p), hi.max(p)),
        )
}

/// Source-over compositing of straight-alpha pixels
fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as u32;
    match sa {
        0 => dst,
        255 => src,
        _ => {
            let da = dst[3] as u32;
            // Output alpha scaled by 255
            let out_a = sa * 255 + da * (255 - sa);
            if out_a == 0 {
                return Rgba([0, 0, 0, 0]);
            }
            let mut out = [0u8; 4];
            for c in 0..3 {
                let premul = src[c] as u32 * sa * 255 + dst[c] as u32 * da * (255 - sa);
                out[c] = ((premul + out_a / 2) / out_a) as u8;
            }
            out[3] = ((out_a + 127) / 255) as u8;
            Rgba(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> RgbaImage {
        // 2x2: red, green / blue, white
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        img
    }

    #[test]
    fn test_identity_draw() {
        let mut canvas = Canvas::new(8, 8);
        canvas.draw_image(&checker(), Vec2::new(2.0, 2.0), Vec2::new(4.0, 4.0));
        let out = canvas.into_image();

        assert_eq!(out.get_pixel(2, 2), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(5, 2), &Rgba([0, 255, 0, 255]));
        assert_eq!(out.get_pixel(2, 5), &Rgba([0, 0, 255, 255]));
        assert_eq!(out.get_pixel(5, 5), &Rgba([255, 255, 255, 255]));
        // Outside the rectangle stays untouched
        assert_eq!(out.get_pixel(1, 1), &Rgba([0, 0, 0, 0]));
        assert_eq!(out.get_pixel(6, 6), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_mirror_with_translation() {
        let mut canvas = Canvas::new(4, 2);
        canvas.translate(Vec2::new(4.0, 0.0));
        canvas.scale(Vec2::new(-1.0, 1.0));
        canvas.draw_image(&checker(), Vec2::ZERO, Vec2::new(4.0, 2.0));
        let out = canvas.into_image();

        // Left and right swapped
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
        assert_eq!(out.get_pixel(3, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_quarter_turn() {
        // rotate(90°) maps (x, y) to (-y, x)
        let mut canvas = Canvas::new(2, 2);
        canvas.translate(Vec2::new(2.0, 0.0));
        canvas.rotate(Rotation::Deg90);
        canvas.draw_image(&checker(), Vec2::ZERO, Vec2::new(2.0, 2.0));
        let out = canvas.into_image();

        assert_eq!(out.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(1, 1), &Rgba([0, 255, 0, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_offscreen_draw_is_clipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill(Rgba([9, 9, 9, 255]));
        canvas.draw_image(&checker(), Vec2::new(-10.0, -10.0), Vec2::new(4.0, 4.0));
        let out = canvas.into_image();
        assert!(out.pixels().all(|p| *p == Rgba([9, 9, 9, 255])));
    }

    #[test]
    fn test_blend_over() {
        let dst = Rgba([0, 0, 255, 255]);
        assert_eq!(blend_over(Rgba([255, 0, 0, 0]), dst), dst);
        assert_eq!(blend_over(Rgba([255, 0, 0, 255]), dst), Rgba([255, 0, 0, 255]));

        let half = blend_over(Rgba([255, 0, 0, 128]), dst);
        assert_eq!(half[3], 255);
        assert!((half[0] as i32 - 128).abs() <= 1);
        assert!((half[2] as i32 - 127).abs() <= 1);
    }
}
