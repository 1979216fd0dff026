/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Vector3};
use objview_core::{Camera, Light, LightMode};
use std::io::Write;

use crate::scene::Model;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// One covered cell: glyph, display color and depth.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: [u8; 3],
    depth: f32,
}

/// ASCII renderer that converts lit 3D meshes to colored terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Option<Cell>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Glyph at a cell, `' '` where nothing was drawn.
    pub fn glyph(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x].map_or(' ', |c| c.glyph)
    }

    pub fn covered_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Rasterize a model, shading each triangle with the light selected by `mode`.
    pub fn render_model(&mut self, model: &Model, light: &Light, mode: LightMode, camera: &Camera) {
        let matrix = model.transform.matrix();
        let mvp = camera.mvp(matrix);
        let linear = model.transform.linear();
        let normal_matrix = linear
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or(linear);

        for triangle in model.mesh.triangles() {
            // Project vertices to screen space
            let mut screen = [(0.0, 0.0, 0.0); 3];
            let corners = model.mesh.corners(triangle);
            let mut visible = true;
            for (slot, corner) in screen.iter_mut().zip(&corners) {
                match Camera::project(&mvp, corner, self.width as u32, self.height as u32) {
                    Some(p) => *slot = p,
                    None => visible = false,
                }
            }
            if !visible {
                continue; // Triangle is clipped
            }

            let world = corners.map(|c| matrix.transform_point(&c));
            let centroid =
                Point3::from((world[0].coords + world[1].coords + world[2].coords) / 3.0);
            let normal = normal_matrix * model.mesh.triangle_normal(triangle);
            let color = light.shade(mode, &model.material, &centroid, &normal, &camera.position);

            self.rasterize_triangle(&screen, shade_cell(color));
        }
    }

    fn rasterize_triangle(
        &mut self,
        coords: &[(f32, f32, f32); 3],
        (glyph, color): (char, [u8; 3]),
    ) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    return; // Degenerate on screen
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if self.cells[idx].map_or(true, |c| depth < c.depth) {
                    self.cells[idx] = Some(Cell { glyph, color, depth });
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(Cell {
                        glyph,
                        color: [r, g, b],
                        ..
                    }) => {
                        writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                        writer.queue(Print(glyph))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Brightness picks the glyph; hue is shown at full intensity so dark
/// surfaces stay readable on a dark terminal.
fn shade_cell(color: Vector3<f32>) -> (char, [u8; 3]) {
    let brightness = color.max().clamp(0.0, 1.0);
    let index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    let glyph = LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)];

    let hue = if brightness > f32::EPSILON {
        color / brightness
    } else {
        Vector3::repeat(0.3)
    };
    let rgb = hue.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    (glyph, [rgb.x, rgb.y, rgb.z])
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
