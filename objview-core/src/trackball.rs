/// Virtual trackball mapping of cursor positions
use nalgebra::Vector3;

/// Map a cursor position onto the unit hemisphere facing the viewer.
///
/// The viewport is mapped to `[-1, 1]` on both axes (y up). Points outside
/// the unit circle are pulled onto its rim.
pub fn project(x: f32, y: f32, width: f32, height: f32) -> Vector3<f32> {
    let (vx, vy) = normalized(x, y, width, height);
    let d = (vx * vx + vy * vy).sqrt().min(1.0);
    let v = Vector3::new(vx, vy, (1.001 - d * d).sqrt());
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::z)
}

/// Map a cursor position onto the z = 0 plane, scaled to the world-space half
/// extents of the view so the result sits under the cursor.
pub fn plane(x: f32, y: f32, width: f32, height: f32, extent: (f32, f32)) -> Vector3<f32> {
    let (vx, vy) = normalized(x, y, width, height);
    Vector3::new(vx * extent.0, vy * extent.1, 0.0)
}

fn normalized(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    let width = width.max(1.0);
    let height = height.max(1.0);
    ((2.0 * x - width) / width, (height - 2.0 * y) / height)
}
