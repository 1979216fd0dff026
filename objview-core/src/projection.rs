/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Fixed-position perspective camera looking at the world origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 20.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: aspect(width, height),
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Place the eye on the +Z axis at `distance` from the origin.
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.position = Point3::new(0.0, 0.0, distance);
        self
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect(width, height);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Projection * view * model for one object.
    pub fn mvp(&self, model: &Matrix4<f32>) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix() * model
    }

    /// Half width and half height of the view at the plane through the target.
    pub fn visible_extent(&self) -> (f32, f32) {
        let distance = (self.position - self.target).norm();
        let half_height = distance * (self.fov / 2.0).tan();
        (half_height * self.aspect, half_height)
    }

    /// Project through a precomputed MVP matrix. Returns screen x, y and NDC
    /// depth, or `None` for points behind the eye or outside the depth range.
    pub fn project(
        mvp: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = mvp * point.to_homogeneous();

        // Prevent division by near-zero depth values
        if clip.w < 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

/// A zero-sized side counts as one cell so the aspect never reaches zero.
fn aspect(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_screen(
        camera: &Camera,
        point: Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        Camera::project(&camera.mvp(&Matrix4::identity()), &point, width, height)
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 20.0));
    }

    #[test]
    fn test_zero_sized_viewport_keeps_valid_projection() {
        let mut camera = Camera::new(0, 0);
        assert!((camera.aspect - 1.0).abs() < 1e-6);

        camera.set_viewport(0, 40);
        assert!(camera.aspect > 0.0);
        let projection = camera.projection_matrix();
        assert!(projection.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(80, 40).with_distance(3.0);
        let (x, y, depth) = to_screen(&camera, Point3::origin(), 80, 40).unwrap();
        assert!((x - 40.0).abs() < 1e-4);
        assert!((y - 20.0).abs() < 1e-4);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_points_behind_eye_are_rejected() {
        let camera = Camera::new(80, 40).with_distance(3.0);
        assert!(to_screen(&camera, Point3::new(0.0, 0.0, 5.0), 80, 40).is_none());
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::new(80, 40).with_distance(3.0);
        let (_, _, near) = to_screen(&camera, Point3::new(0.0, 0.0, 1.0), 80, 40).unwrap();
        let (_, _, far) = to_screen(&camera, Point3::new(0.0, 0.0, -1.0), 80, 40).unwrap();
        assert!(near < far);
    }

    #[test]
    fn test_model_matrix_is_applied_before_view() {
        let camera = Camera::new(80, 40).with_distance(3.0);
        let model = Matrix4::new_translation(&Vector3::new(0.5, 0.0, 0.0));
        let (x, _, _) = Camera::project(&camera.mvp(&model), &Point3::origin(), 80, 40).unwrap();
        assert!(x > 40.0);
    }

    #[test]
    fn test_visible_extent_reaches_screen_edge() {
        let camera = Camera::new(100, 50).with_distance(3.0);
        let (half_w, half_h) = camera.visible_extent();
        let (x, y, _) = to_screen(&camera, Point3::new(half_w, half_h, 0.0), 100, 50).unwrap();
        assert!((x - 100.0).abs() < 1e-2);
        assert!(y.abs() < 1e-2);
    }
}
