//! Axis-aligned bounding boxes.

use glam::{Mat4, Vec3};
use preview_core::Mesh;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds stored on a parsed mesh.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self::new(Vec3::from(mesh.bbox_min), Vec3::from(mesh.bbox_max))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Bounds of the eight transformed corners.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = matrix.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_translates_corners() {
        let bounds = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
        let moved = bounds.transform(&Mat4::from_translation(Vec3::new(2.0, 0.0, -1.0)));
        assert_eq!(moved.min, Vec3::new(2.0, 0.0, -1.0));
        assert_eq!(moved.max, Vec3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_transform_rotation_stays_axis_aligned() {
        let bounds = BoundingBox::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let turned = bounds.transform(&Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert_relative_eq!(turned.size().x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(turned.size().z, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
        let b = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(0.5));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::splat(-1.0));
        assert_eq!(u.max, Vec3::ONE);
        assert_eq!(u.center(), Vec3::ZERO);
    }
}
