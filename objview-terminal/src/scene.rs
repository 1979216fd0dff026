/// Models, lights and the interaction state shared by input and rendering
use crossterm::event::MouseButton;
use nalgebra::Vector3;
use objview_core::{Light, LightMode, Material, Mesh, Transform};

/// A loaded mesh with its material and placement.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
    pub transform: Transform,
}

impl Model {
    pub fn new(name: impl Into<String>, mesh: Mesh, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh,
            material,
            transform: Transform::new(),
        }
    }
}

/// Everything that is drawn.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub models: Vec<Model>,
    pub light: Light,
}

impl Scene {
    /// Build a scene from named meshes, handing out the preset materials in turn.
    pub fn from_meshes<I, S>(meshes: I) -> Self
    where
        I: IntoIterator<Item = (S, Mesh)>,
        S: Into<String>,
    {
        let presets = Material::presets();
        let models = meshes
            .into_iter()
            .enumerate()
            .map(|(i, (name, mesh))| Model::new(name, mesh, presets[i % presets.len()]))
            .collect();
        Self {
            models,
            light: Light::default(),
        }
    }

    pub fn model(&self, state: &ApplicationState) -> Option<&Model> {
        state.selected.and_then(|i| self.models.get(i))
    }

    pub fn model_mut(&mut self, state: &ApplicationState) -> Option<&mut Model> {
        state.selected.and_then(move |i| self.models.get_mut(i))
    }
}

/// What the user is currently doing: which model is shown, whether the mouse
/// edits the model or a light, and the state of an ongoing drag.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationState {
    pub running: bool,
    pub selected: Option<usize>,
    /// Light used for shading, and edited while `editing_light` is set.
    pub light_mode: LightMode,
    pub editing_light: bool,
    pub spinning: bool,
    pub button: Option<MouseButton>,
    /// Trackball position of the cursor at the previous drag event.
    pub last_location: Vector3<f32>,
}

impl ApplicationState {
    /// Initial state: the first model, if any, is shown in object mode.
    pub fn new(model_count: usize) -> Self {
        Self {
            running: true,
            selected: (model_count > 0).then_some(0),
            light_mode: LightMode::default(),
            editing_light: false,
            spinning: false,
            button: None,
            last_location: Vector3::z(),
        }
    }
}
