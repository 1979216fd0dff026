/// Directional, point and spot lights with Phong shading
use nalgebra::{Point3, Rotation3, Unit, Vector3};

use crate::material::Material;

/// Largest cosine exponent used to sharpen the spot light edge.
pub const MAX_SPOT_EXPONENT: u32 = 128;

/// Widest cone the spot light can be opened to, in degrees.
pub const MAX_SPOT_ANGLE: f32 = 89.0;

/// Fixed colors of the directional light: ambient, diffuse, specular.
const DIRECTIONAL_COLORS: [[f32; 3]; 3] = [[0.3, 0.24, 0.14], [0.7, 0.42, 0.26], [0.5, 0.5, 0.5]];

/// Fixed colors of the spot light: ambient, diffuse, specular.
const SPOT_COLORS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [0.8, 0.8, 0.0], [0.8, 0.8, 0.8]];

/// Which light is shaded and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightMode {
    #[default]
    Directional,
    Point,
    Spot,
}

/// The scene's three lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub direction: Vector3<f32>,
    pub point_position: Point3<f32>,
    pub color: Vector3<f32>,
    pub spot_position: Point3<f32>,
    /// Points straight into the screen.
    pub spot_direction: Vector3<f32>,
    pub attenuation: f32,
    /// Inner cone half-angle in degrees.
    pub cutoff: f32,
    /// Outer cone half-angle in degrees.
    pub outer_cutoff: f32,
    pub cos_exp: u32,
    pub on: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: Vector3::new(-0.2, -1.0, -0.3),
            point_position: Point3::new(0.0, 0.0, 5.2),
            color: Vector3::new(0.7, 0.7, 0.7),
            spot_position: Point3::new(-0.911678, 0.026234, 3.89464),
            spot_direction: Vector3::new(0.0, 0.0, -1.0),
            attenuation: 0.032,
            cutoff: 12.5,
            outer_cutoff: 13.0,
            cos_exp: 1,
            on: true,
        }
    }
}

impl Light {
    pub fn toggle(&mut self) {
        self.on = !self.on;
    }

    /// Point the directional light along `direction`. Zero vectors are ignored.
    pub fn set_direction(&mut self, direction: Vector3<f32>) {
        if direction.norm_squared() > f32::EPSILON {
            self.direction = direction;
        }
    }

    pub fn set_point_position(&mut self, x: f32, y: f32, z: f32) {
        self.point_position = Point3::new(x, y, z);
    }

    pub fn set_spot_position(&mut self, x: f32, y: f32, z: f32) {
        self.spot_position = Point3::new(x, y, z);
    }

    /// Rotate the point light about an axis through the world origin.
    pub fn rotate_point(&mut self, degrees: f32, axis: Vector3<f32>) {
        self.point_position = rotated(self.point_position, degrees, axis);
    }

    /// Rotate the spot light about an axis through the world origin.
    pub fn rotate_spot(&mut self, degrees: f32, axis: Vector3<f32>) {
        self.spot_position = rotated(self.spot_position, degrees, axis);
    }

    /// Open (positive) or close (negative) the spot cone by `delta` degrees.
    /// Changes that would close the cone entirely or open it past
    /// [`MAX_SPOT_ANGLE`] are ignored.
    pub fn resize_spot(&mut self, delta: f32) {
        let cutoff = self.cutoff + delta;
        let outer = self.outer_cutoff + delta;
        if cutoff > 0.0 && outer > 0.0 && outer <= MAX_SPOT_ANGLE {
            self.cutoff = cutoff;
            self.outer_cutoff = outer;
        }
    }

    /// Double the cone edge exponent.
    pub fn sharpen_spot(&mut self) {
        self.cos_exp = (self.cos_exp * 2).min(MAX_SPOT_EXPONENT);
    }

    /// Halve the cone edge exponent.
    pub fn soften_spot(&mut self) {
        self.cos_exp = (self.cos_exp / 2).max(1);
    }

    pub fn cos_cutoff(&self) -> f32 {
        self.cutoff.to_radians().cos().powi(self.cos_exp as i32)
    }

    pub fn cos_outer_cutoff(&self) -> f32 {
        self.outer_cutoff.to_radians().cos().powi(self.cos_exp as i32)
    }

    /// Color of a surface point lit by the light selected by `mode`, clamped to `[0, 1]`.
    pub fn shade(
        &self,
        mode: LightMode,
        material: &Material,
        position: &Point3<f32>,
        normal: &Vector3<f32>,
        eye: &Point3<f32>,
    ) -> Vector3<f32> {
        if !self.on {
            return clamp01(material.ambient);
        }

        let n = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::z);
        let view = (eye - position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z);

        let color = match mode {
            LightMode::Directional => {
                let to_light = (-self.direction)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::y);
                let [ambient, diffuse, specular] = DIRECTIONAL_COLORS.map(Vector3::from);
                phong(material, &n, &view, &to_light, ambient, diffuse, specular, 1.0)
            }
            LightMode::Point => {
                let offset = self.point_position - position;
                let to_light = offset.try_normalize(f32::EPSILON).unwrap_or(n);
                let falloff = self.falloff(offset.norm());
                phong(
                    material,
                    &n,
                    &view,
                    &to_light,
                    self.color * 0.1 * falloff,
                    self.color * falloff,
                    self.color * falloff,
                    1.0,
                )
            }
            LightMode::Spot => {
                let offset = self.spot_position - position;
                let to_light = offset.try_normalize(f32::EPSILON).unwrap_or(n);
                let falloff = self.falloff(offset.norm());
                let axis = (-self.spot_direction)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::z);
                let intensity = self.cone_intensity(to_light.dot(&axis));
                let [ambient, diffuse, specular] = SPOT_COLORS.map(Vector3::from);
                phong(
                    material,
                    &n,
                    &view,
                    &to_light,
                    ambient * falloff,
                    diffuse * falloff,
                    specular * falloff,
                    intensity,
                )
            }
        };
        clamp01(color)
    }

    fn falloff(&self, distance: f32) -> f32 {
        1.0 / (1.0 + self.attenuation * distance * distance)
    }

    /// 1 inside the inner cone, 0 outside the outer cone, linear in between.
    fn cone_intensity(&self, theta: f32) -> f32 {
        let theta = theta.max(0.0).powi(self.cos_exp as i32);
        let inner = self.cos_cutoff();
        let outer = self.cos_outer_cutoff();
        let epsilon = inner - outer;
        if epsilon <= f32::EPSILON {
            return if theta >= outer { 1.0 } else { 0.0 };
        }
        ((theta - outer) / epsilon).clamp(0.0, 1.0)
    }
}

#[allow(clippy::too_many_arguments)]
fn phong(
    material: &Material,
    normal: &Vector3<f32>,
    view: &Vector3<f32>,
    to_light: &Vector3<f32>,
    ambient: Vector3<f32>,
    diffuse: Vector3<f32>,
    specular: Vector3<f32>,
    intensity: f32,
) -> Vector3<f32> {
    let diff = normal.dot(to_light).max(0.0);
    let reflected = 2.0 * normal.dot(to_light) * normal - to_light;
    let spec = if diff > 0.0 {
        view.dot(&reflected).max(0.0).powi(material.shininess() as i32)
    } else {
        0.0
    };

    ambient.component_mul(&material.ambient)
        + (diffuse.component_mul(&material.diffuse) * diff
            + specular.component_mul(&material.specular) * spec)
            * intensity
}

fn rotated(p: Point3<f32>, degrees: f32, axis: Vector3<f32>) -> Point3<f32> {
    if !degrees.is_finite() || !axis.iter().all(|c| c.is_finite()) {
        return p;
    }
    match Unit::try_new(axis, f32::EPSILON) {
        Some(axis) => Rotation3::from_axis_angle(&axis, degrees.to_radians()) * p,
        None => p,
    }
}

fn clamp01(color: Vector3<f32>) -> Vector3<f32> {
    color.map(|c| c.clamp(0.0, 1.0))
}
