//! Orthographic camera for lab diagrams

use glam::{Mat4, Vec2};

/// Extra room around a fitted diagram
const FIT_MARGIN: f32 = 1.1;

/// 2D orthographic camera
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub position: Vec2,
    /// Half of the visible height in world units
    pub zoom: f32,
    pub aspect_ratio: f32,
}

impl Camera2D {
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            aspect_ratio,
        }
    }

    /// Centre on `bounds` and zoom so the whole region is visible.
    pub fn fit(&mut self, (min, max): (Vec2, Vec2)) {
        let half = (max - min) * 0.5;
        self.position = min + half;
        self.zoom = (half.y.max(half.x / self.aspect_ratio) * FIT_MARGIN).max(0.01);
    }

    /// Get the view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        let half_width = self.zoom * self.aspect_ratio;
        let half_height = self.zoom;

        let projection = Mat4::orthographic_rh(
            -half_width,
            half_width,
            -half_height,
            half_height,
            -1.0,
            1.0,
        );

        projection * Mat4::from_translation(-self.position.extend(0.0))
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera_2d(camera: &Camera2D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn to_ndc(camera: &Camera2D, p: Vec2) -> Vec3 {
        camera.view_projection().project_point3(p.extend(0.0))
    }

    #[test]
    fn test_fit_keeps_bounds_visible() {
        for aspect in [0.5, 1.0, 16.0 / 9.0] {
            let mut camera = Camera2D::new(aspect);
            let bounds = (Vec2::new(-6.0, -3.5), Vec2::new(6.0, 3.5));
            camera.fit(bounds);

            for corner in [bounds.0, bounds.1, Vec2::new(bounds.0.x, bounds.1.y)] {
                let ndc = to_ndc(&camera, corner);
                assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "{corner} -> {ndc}");
            }
        }
    }

    #[test]
    fn test_fit_centres_diagram() {
        let mut camera = Camera2D::new(1.0);
        camera.fit((Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0)));
        assert_eq!(camera.position, Vec2::new(2.0, 1.0));
        let ndc = to_ndc(&camera, Vec2::new(2.0, 1.0));
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
    }
}
