/// Surface material used by the shading pipeline
use nalgebra::Vector3;

/// Upper bound for the specular exponent.
pub const MAX_SHININESS: u32 = 128;

/// Phong material: one RGB color per lighting term plus a specular exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    shininess: u32,
}

impl Material {
    pub fn new(
        ambient: Vector3<f32>,
        diffuse: Vector3<f32>,
        specular: Vector3<f32>,
        shininess: i32,
    ) -> Self {
        let mut material = Self {
            ambient,
            diffuse,
            specular,
            shininess: 0,
        };
        material.set_shininess(shininess);
        material
    }

    /// Glossy red.
    pub fn red() -> Self {
        Self::new(
            Vector3::new(0.92, 0.2, 0.2),
            Vector3::new(0.3, 0.2, 0.2),
            Vector3::new(0.9, 0.9, 0.9),
            127,
        )
    }

    /// Satin green.
    pub fn green() -> Self {
        Self::new(
            Vector3::new(0.1, 0.9, 0.1),
            Vector3::new(0.6, 0.6, 0.3),
            Vector3::new(0.7, 0.8, 0.6),
            50,
        )
    }

    /// Matte blue.
    pub fn blue() -> Self {
        Self::new(
            Vector3::new(0.3, 0.1, 1.0),
            Vector3::new(0.6, 0.6, 0.6),
            Vector3::new(0.2, 0.2, 0.2),
            1,
        )
    }

    /// The preset materials, handed out to models in load order.
    pub fn presets() -> [Self; 3] {
        [Self::red(), Self::green(), Self::blue()]
    }

    pub fn shininess(&self) -> u32 {
        self.shininess
    }

    /// Set the specular exponent, clamped into `0..=MAX_SHININESS`.
    pub fn set_shininess(&mut self, shininess: i32) {
        self.shininess = shininess.clamp(0, MAX_SHININESS as i32) as u32;
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(
            Vector3::new(0.11, 0.1, 0.91),
            Vector3::new(0.2, 0.5, 0.31),
            Vector3::new(0.2, 0.5, 0.8),
            32,
        )
    }
}
