/// Model matrix composition for interactive manipulation
use nalgebra::{Matrix3, Matrix4, Unit, Vector3};

/// Angle turned by every call to [`Transform::spin`], in degrees.
pub const SPIN_STEP_DEGREES: f32 = 1.0;

/// The placement of one object in world space.
///
/// Every operation composes a new matrix on the left of the current one, so
/// it acts in world space regardless of how the object is already oriented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4<f32>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// The model matrix, read by the renderer every frame.
    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    /// World position of the object (the translation column).
    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Accumulated rotation and scale.
    pub fn linear(&self) -> Matrix3<f32> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn reset(&mut self) {
        self.matrix = Matrix4::identity();
    }

    /// Move by a world-space offset.
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.apply(Self::translation_matrix(dx, dy, dz));
    }

    /// Scale about the object's current position, leaving the position unchanged.
    pub fn scale(&mut self, factor: f32) {
        let p = self.position();
        self.apply(Self::translation_matrix(-p.x, -p.y, -p.z));
        self.apply(Self::scale_matrix(factor));
        self.apply(Self::translation_matrix(p.x, p.y, p.z));
    }

    /// Rotate about the world Z axis through the world origin, moving the
    /// object along a circle around it.
    pub fn orbit(&mut self, degrees: f32) {
        self.apply(Matrix4::from_axis_angle(
            &Vector3::z_axis(),
            degrees.to_radians(),
        ));
    }

    /// Rotate about an arbitrary world axis through the origin.
    ///
    /// A zero-length or non-finite axis, or a non-finite angle, leaves the
    /// transform untouched.
    pub fn rotate(&mut self, angle_degrees: f32, axis: Vector3<f32>) {
        if !angle_degrees.is_finite() || !axis.iter().all(|c| c.is_finite()) {
            log::debug!("ignoring rotation by {} about {:?}", angle_degrees, axis);
            return;
        }
        match Unit::try_new(axis, f32::EPSILON) {
            Some(axis) => self.apply(Matrix4::from_axis_angle(&axis, angle_degrees.to_radians())),
            None => log::debug!("ignoring rotation about zero-length axis"),
        }
    }

    /// Move the object back to the world origin, keeping rotation and scale.
    pub fn origin(&mut self) {
        let p = self.position();
        self.apply(Self::translation_matrix(-p.x, -p.y, -p.z));
    }

    /// Like [`Transform::origin`] but keeps the depth (z) of the object.
    pub fn origin_preserve_z(&mut self) {
        let p = self.position();
        self.apply(Self::translation_matrix(-p.x, -p.y, 0.0));
    }

    /// Idle rotation about the world Y axis through the object's position.
    ///
    /// Always turns by [`SPIN_STEP_DEGREES`]; the argument is not used.
    pub fn spin(&mut self, _degrees: f32) {
        let p = self.position();
        self.apply(Self::translation_matrix(-p.x, -p.y, -p.z));
        self.apply(Matrix4::from_axis_angle(
            &Vector3::y_axis(),
            SPIN_STEP_DEGREES.to_radians(),
        ));
        self.apply(Self::translation_matrix(p.x, p.y, p.z));
    }

    fn apply(&mut self, m: Matrix4<f32>) {
        self.matrix = m * self.matrix;
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(factor: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(factor)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
