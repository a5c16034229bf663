use campfire_render::RenderView;
use glam::{Mat4, Vec3};

/// Fixed orthographic camera looking down -Z.
///
/// One world unit covers `zoom` pixels, so the visible region grows with the
/// window instead of stretching the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    pub position: Vec3,
    pub zoom: f32,
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        let view = RenderView::default();
        Self {
            position: view.eye,
            zoom: RenderView::ZOOM,
            width: 1280.0,
            height: 720.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl OrthoCamera {
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    /// Visible region in world units.
    pub fn view(&self) -> RenderView {
        RenderView {
            eye: self.position,
            viewport: glam::Vec2::new(self.width, self.height) / self.zoom,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position - Vec3::Z, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let half = self.view().viewport / 2.0;
        Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = OrthoCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 100.0));
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn origin_projects_to_center() {
        let cam = OrthoCamera::default();
        let clip = cam.view_projection().project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-6 && clip.y.abs() < 1e-6);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn viewport_edge_maps_to_ndc_edge() {
        let mut cam = OrthoCamera::default();
        cam.resize(1400, 700);
        // 1400 px at 70 px/unit: 20 units wide, so x = 10 is the right edge.
        let clip = cam.view_projection().project_point3(Vec3::new(10.0, 5.0, 0.0));
        assert!((clip.x - 1.0).abs() < 1e-5);
        assert!((clip.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn nearer_points_have_smaller_depth() {
        let cam = OrthoCamera::default();
        let vp = cam.view_projection();
        let near = vp.project_point3(Vec3::new(0.0, 0.0, 2.0));
        let far = vp.project_point3(Vec3::new(0.0, 0.0, -10.0));
        assert!(near.z < far.z);
    }

    #[test]
    fn zero_size_is_clamped() {
        let mut cam = OrthoCamera::default();
        cam.resize(0, 0);
        assert_eq!(cam.width, 1.0);
        assert!(!cam.view_projection().col(0).x.is_nan());
    }
}
