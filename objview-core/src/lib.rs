/// objview core library - model loading, transforms and shading
///
/// This library holds everything that does not touch a terminal or a window:
/// the geometry text format loader, the per-object transform composer, lights,
/// materials, the camera and the virtual trackball.

pub mod error;
pub mod geometry;
pub mod lighting;
pub mod material;
pub mod obj;
pub mod projection;
pub mod trackball;
pub mod transform;

// Re-export commonly used types
pub use error::{LoadError, LoadResult};
pub use geometry::Mesh;
pub use lighting::{Light, LightMode};
pub use material::Material;
pub use obj::{load, load_all};
pub use projection::Camera;
pub use transform::Transform;
