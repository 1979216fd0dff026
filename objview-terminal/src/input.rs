/// Keyboard and mouse handling: turns terminal events into model and light edits
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use objview_core::{trackball, Light, LightMode};

use crate::config::ViewerConfig;
use crate::scene::{ApplicationState, Scene};

/// Drags shorter than this on the trackball are ignored.
const MIN_DRAG: f32 = 0.0001;

/// Divisors applied to the drag arc (in degrees) for each kind of rotation.
const MODEL_ROTATE_DAMPING: f32 = 1.25;
const POINT_ROTATE_DAMPING: f32 = 2.25;
const SPOT_ROTATE_DAMPING: f32 = 3.0;
const SPOT_RESIZE_DAMPING: f32 = 10.0;

/// Size of the drawing area in terminal cells plus the world-space half
/// extents it covers at the z = 0 plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub extent: (f32, f32),
}

/// Maps input events onto transform and light operations.
#[derive(Debug, Clone)]
pub struct Controller {
    translate_step: f32,
    scale_up: f32,
    scale_down: f32,
    orbit_step: f32,
    scroll_step: f32,
}

impl Controller {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            translate_step: config.translate_step,
            scale_up: config.scale_up,
            scale_down: config.scale_down,
            orbit_step: config.orbit_step,
            scroll_step: config.scroll_step,
        }
    }

    pub fn handle_event(
        &self,
        event: &Event,
        state: &mut ApplicationState,
        scene: &mut Scene,
        viewport: &Viewport,
    ) {
        match event {
            Event::Key(key) => self.handle_key(key, state, scene),
            Event::Mouse(mouse) => self.handle_mouse(mouse, state, scene, viewport),
            _ => {}
        }
    }

    pub fn handle_key(&self, key: &KeyEvent, state: &mut ApplicationState, scene: &mut Scene) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => state.running = false,
            KeyCode::F(n @ 1..=3) => select(state, scene, usize::from(n) - 1),
            KeyCode::Tab if !scene.models.is_empty() => {
                let next = state.selected.map_or(0, |i| (i + 1) % scene.models.len());
                select(state, scene, next);
            }
            KeyCode::Char('0') => {
                state.editing_light = false;
                log::debug!("object mode");
            }
            KeyCode::Char(c @ '1'..='3') => {
                state.light_mode = match c {
                    '1' => LightMode::Directional,
                    '2' => LightMode::Point,
                    _ => LightMode::Spot,
                };
                state.editing_light = true;
                log::debug!("editing {:?} light", state.light_mode);
            }
            KeyCode::Char('f') => scene.light.toggle(),
            KeyCode::Char('R') => scene.light = Light::default(),
            KeyCode::Char('e') if editing_spot(state) => scene.light.soften_spot(),
            KeyCode::Char('E') if editing_spot(state) => scene.light.sharpen_spot(),
            KeyCode::Char('p') => state.spinning = !state.spinning,
            KeyCode::Char(c) => self.edit_model(c, state, scene),
            _ => {}
        }
    }

    fn edit_model(&self, c: char, state: &ApplicationState, scene: &mut Scene) {
        let Some(model) = scene.model_mut(state) else {
            return;
        };
        let t = &mut model.transform;
        let step = self.translate_step;
        match c {
            'x' => t.translate(-step, 0.0, 0.0),
            'X' => t.translate(step, 0.0, 0.0),
            'y' => t.translate(0.0, -step, 0.0),
            'Y' => t.translate(0.0, step, 0.0),
            'z' => t.translate(0.0, 0.0, -step),
            'Z' => t.translate(0.0, 0.0, step),
            's' => t.scale(self.scale_down),
            'S' => t.scale(self.scale_up),
            'o' => t.orbit(self.orbit_step),
            'O' => t.orbit(-self.orbit_step),
            'r' => t.reset(),
            _ => {}
        }
    }

    pub fn handle_mouse(
        &self,
        mouse: &MouseEvent,
        state: &mut ApplicationState,
        scene: &mut Scene,
        viewport: &Viewport,
    ) {
        let (x, y) = (mouse.column as f32, mouse.row as f32);
        match mouse.kind {
            MouseEventKind::Down(button) => {
                state.button = Some(button);
                state.last_location = trackball::project(x, y, viewport.width, viewport.height);
            }
            MouseEventKind::Up(_) => state.button = None,
            MouseEventKind::Drag(button) => {
                state.button = Some(button);
                match button {
                    MouseButton::Left => self.left_drag(x, y, state, scene, viewport),
                    MouseButton::Right => self.right_drag(x, y, state, scene, viewport),
                    MouseButton::Middle => {}
                }
            }
            MouseEventKind::ScrollUp => self.scroll(-1.0, state, scene),
            MouseEventKind::ScrollDown => self.scroll(1.0, state, scene),
            _ => {}
        }
    }

    fn left_drag(
        &self,
        x: f32,
        y: f32,
        state: &mut ApplicationState,
        scene: &mut Scene,
        viewport: &Viewport,
    ) {
        let location = trackball::project(x, y, viewport.width, viewport.height);
        let previous = std::mem::replace(&mut state.last_location, location);
        let arc = (location - previous).norm();
        if arc <= MIN_DRAG {
            return;
        }

        // Rotations stay in the view plane; there is no roll about the view axis.
        let mut axis = previous.cross(&location);
        axis.z = 0.0;
        let degrees = arc.to_degrees();

        if !state.editing_light {
            if let Some(model) = scene.model_mut(state) {
                model.transform.rotate(degrees / MODEL_ROTATE_DAMPING, axis);
            }
            return;
        }

        match state.light_mode {
            LightMode::Directional => scene.light.set_direction(-location),
            LightMode::Point => scene.light.rotate_point(degrees / POINT_ROTATE_DAMPING, axis),
            LightMode::Spot => scene.light.rotate_spot(degrees / SPOT_ROTATE_DAMPING, axis),
        }
    }

    fn right_drag(
        &self,
        x: f32,
        y: f32,
        state: &mut ApplicationState,
        scene: &mut Scene,
        viewport: &Viewport,
    ) {
        if editing_spot(state) {
            let location = trackball::project(x, y, viewport.width, viewport.height);
            let previous = std::mem::replace(&mut state.last_location, location);
            let delta = location - previous;
            // Only vertical motion resizes the cone: up grows, down shrinks.
            if delta.y.abs() > MIN_DRAG {
                let amount = delta.norm().to_degrees() / SPOT_RESIZE_DAMPING;
                scene.light.resize_spot(amount.copysign(delta.y));
            }
            return;
        }

        if state.editing_light {
            return;
        }
        let target = trackball::plane(x, y, viewport.width, viewport.height, viewport.extent);
        if let Some(model) = scene.model_mut(state) {
            model.transform.origin_preserve_z();
            model.transform.translate(target.x, target.y, 0.0);
        }
    }

    /// `direction` is -1 for wheel up (away from the viewer) and 1 for wheel down.
    fn scroll(&self, direction: f32, state: &ApplicationState, scene: &mut Scene) {
        if !state.editing_light {
            if let Some(model) = scene.model_mut(state) {
                model.transform.translate(0.0, 0.0, direction * self.scroll_step);
            }
            return;
        }

        let light = &mut scene.light;
        match state.light_mode {
            LightMode::Point => {
                let p = light.point_position;
                light.set_point_position(p.x, p.y, p.z + direction);
            }
            LightMode::Spot => {
                let p = light.spot_position;
                light.set_spot_position(p.x, p.y, p.z + direction);
            }
            LightMode::Directional => {}
        }
    }
}

fn select(state: &mut ApplicationState, scene: &mut Scene, index: usize) {
    if let Some(model) = scene.models.get_mut(index) {
        model.transform.reset();
        state.selected = Some(index);
        log::debug!("showing {}", model.name);
    }
}

fn editing_spot(state: &ApplicationState) -> bool {
    state.editing_light && state.light_mode == LightMode::Spot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use nalgebra::{Point3, Rotation3, Unit, Vector3};
    use objview_core::Mesh;

    const EPS: f32 = 1e-5;

    fn setup() -> (Controller, ApplicationState, Scene) {
        let scene = Scene::from_meshes([("a", Mesh::cube(1.0)), ("b", Mesh::cube(1.0))]);
        let state = ApplicationState::new(scene.models.len());
        (Controller::new(&ViewerConfig::default()), state, scene)
    }

    fn viewport() -> Viewport {
        Viewport {
            width: 80.0,
            height: 40.0,
            extent: (2.0, 1.0),
        }
    }

    fn press(
        controller: &Controller,
        state: &mut ApplicationState,
        scene: &mut Scene,
        code: KeyCode,
    ) {
        controller.handle_key(&KeyEvent::new(code, KeyModifiers::NONE), state, scene);
    }

    fn mouse(
        controller: &Controller,
        state: &mut ApplicationState,
        scene: &mut Scene,
        kind: MouseEventKind,
        column: u16,
        row: u16,
    ) {
        let event = MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        controller.handle_mouse(&event, state, scene, &viewport());
    }

    #[test]
    fn test_quit() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('q'));
        assert!(!state.running);
    }

    #[test]
    fn test_translate_keys() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('X'));
        press(&c, &mut state, &mut scene, KeyCode::Char('X'));
        press(&c, &mut state, &mut scene, KeyCode::Char('y'));
        press(&c, &mut state, &mut scene, KeyCode::Char('Z'));
        let p = scene.models[0].transform.position();
        assert!((p - Vector3::new(0.2, -0.1, 0.1)).norm() < EPS);
        assert_eq!(scene.models[1].transform.position(), Vector3::zeros());
    }

    #[test]
    fn test_scale_and_orbit_keys() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('X'));
        press(&c, &mut state, &mut scene, KeyCode::Char('S'));
        let t = scene.models[0].transform;
        assert!((t.linear()[(0, 0)] - 1.1).abs() < EPS);
        assert!((t.position() - Vector3::new(0.1, 0.0, 0.0)).norm() < EPS);

        press(&c, &mut state, &mut scene, KeyCode::Char('o'));
        let angle = 20.0f32.to_radians();
        let p = scene.models[0].transform.position();
        assert!((p - Vector3::new(0.1 * angle.cos(), 0.1 * angle.sin(), 0.0)).norm() < EPS);
    }

    #[test]
    fn test_select_resets_model() {
        let (c, mut state, mut scene) = setup();
        scene.models[1].transform.translate(1.0, 1.0, 1.0);
        press(&c, &mut state, &mut scene, KeyCode::F(2));
        assert_eq!(state.selected, Some(1));
        assert_eq!(scene.models[1].transform.position(), Vector3::zeros());

        // No third model: selection stays.
        press(&c, &mut state, &mut scene, KeyCode::F(3));
        assert_eq!(state.selected, Some(1));

        press(&c, &mut state, &mut scene, KeyCode::Tab);
        assert_eq!(state.selected, Some(0));
    }

    #[test]
    fn test_light_keys() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('3'));
        assert!(state.editing_light);
        assert_eq!(state.light_mode, LightMode::Spot);

        press(&c, &mut state, &mut scene, KeyCode::Char('E'));
        press(&c, &mut state, &mut scene, KeyCode::Char('E'));
        assert_eq!(scene.light.cos_exp, 4);

        press(&c, &mut state, &mut scene, KeyCode::Char('f'));
        assert!(!scene.light.on);

        press(&c, &mut state, &mut scene, KeyCode::Char('R'));
        assert_eq!(scene.light, Light::default());

        press(&c, &mut state, &mut scene, KeyCode::Char('0'));
        assert!(!state.editing_light);
        // Model keys act on the model again.
        press(&c, &mut state, &mut scene, KeyCode::Char('Y'));
        assert!((scene.models[0].transform.position().y - 0.1).abs() < EPS);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let (c, mut state, mut scene) = setup();
        let mut key = KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT);
        key.kind = KeyEventKind::Release;
        c.handle_key(&key, &mut state, &mut scene);
        assert_eq!(scene.models[0].transform.position(), Vector3::zeros());
    }

    #[test]
    fn test_left_drag_rotates_model() {
        let (c, mut state, mut scene) = setup();
        mouse(&c, &mut state, &mut scene, MouseEventKind::Down(MouseButton::Left), 40, 20);
        mouse(&c, &mut state, &mut scene, MouseEventKind::Drag(MouseButton::Left), 60, 20);
        let linear = scene.models[0].transform.linear();
        // Dragging right turns the front of the model towards +x, about the y axis.
        let front = linear * Vector3::z();
        assert!(front.x > 0.0);
        assert!(front.y.abs() < EPS);
        mouse(&c, &mut state, &mut scene, MouseEventKind::Up(MouseButton::Left), 60, 20);
        assert_eq!(state.button, None);
    }

    #[test]
    fn test_right_drag_moves_model_under_cursor() {
        let (c, mut state, mut scene) = setup();
        scene.models[0].transform.translate(0.5, 0.5, -2.0);
        mouse(&c, &mut state, &mut scene, MouseEventKind::Down(MouseButton::Right), 40, 20);
        mouse(&c, &mut state, &mut scene, MouseEventKind::Drag(MouseButton::Right), 0, 0);
        let p = scene.models[0].transform.position();
        assert!((p - Vector3::new(-2.0, 1.0, -2.0)).norm() < EPS);
    }

    #[test]
    fn test_right_drag_resizes_spot() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('3'));
        let before = scene.light.cutoff;
        mouse(&c, &mut state, &mut scene, MouseEventKind::Down(MouseButton::Right), 40, 20);
        mouse(&c, &mut state, &mut scene, MouseEventKind::Drag(MouseButton::Right), 40, 10);
        assert!(scene.light.cutoff > before);
        assert_eq!(scene.models[0].transform.position(), Vector3::zeros());
    }

    #[test]
    fn test_horizontal_right_drag_keeps_spot_size() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('3'));
        let before = (scene.light.cutoff, scene.light.outer_cutoff);
        mouse(&c, &mut state, &mut scene, MouseEventKind::Down(MouseButton::Right), 40, 15);
        for column in 41..60 {
            mouse(&c, &mut state, &mut scene, MouseEventKind::Drag(MouseButton::Right), column, 15);
        }
        assert_eq!((scene.light.cutoff, scene.light.outer_cutoff), before);
    }

    #[test]
    fn test_right_drag_down_shrinks_spot_but_never_closes() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('3'));
        let before = scene.light.cutoff;
        mouse(&c, &mut state, &mut scene, MouseEventKind::Down(MouseButton::Right), 40, 10);
        mouse(&c, &mut state, &mut scene, MouseEventKind::Drag(MouseButton::Right), 40, 20);
        assert!(scene.light.cutoff < before);
        assert!((scene.light.outer_cutoff - scene.light.cutoff - 0.5).abs() < EPS);

        for _ in 0..20 {
            mouse(&c, &mut state, &mut scene, MouseEventKind::Down(MouseButton::Right), 40, 10);
            mouse(&c, &mut state, &mut scene, MouseEventKind::Drag(MouseButton::Right), 40, 20);
        }
        assert!(scene.light.cutoff > 0.0);
        assert!(scene.light.outer_cutoff > 0.0);
    }

    #[test]
    fn test_left_drag_points_directional_light_from_cursor() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('1'));
        mouse(&c, &mut state, &mut scene, MouseEventKind::Down(MouseButton::Left), 40, 20);
        mouse(&c, &mut state, &mut scene, MouseEventKind::Drag(MouseButton::Left), 60, 20);
        let expected = -trackball::project(60.0, 20.0, 80.0, 40.0);
        assert!((scene.light.direction - expected).norm() < EPS);
        assert_eq!(*scene.models[0].transform.matrix(), nalgebra::Matrix4::identity());
    }

    #[test]
    fn test_left_drag_rotates_spot_light_damped() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('3'));
        let before = scene.light.spot_position;
        mouse(&c, &mut state, &mut scene, MouseEventKind::Down(MouseButton::Left), 40, 20);
        mouse(&c, &mut state, &mut scene, MouseEventKind::Drag(MouseButton::Left), 40, 5);

        let from = trackball::project(40.0, 20.0, 80.0, 40.0);
        let to = trackball::project(40.0, 5.0, 80.0, 40.0);
        let mut axis = from.cross(&to);
        axis.z = 0.0;
        let degrees = (to - from).norm().to_degrees() / 3.0;
        let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis), degrees.to_radians());
        assert!((scene.light.spot_position - rotation * before).norm() < 1e-4);
        assert_eq!(scene.light.point_position, Light::default().point_position);
    }

    #[test]
    fn test_spot_edge_keys_need_spot_mode() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('E'));
        press(&c, &mut state, &mut scene, KeyCode::Char('2'));
        press(&c, &mut state, &mut scene, KeyCode::Char('E'));
        press(&c, &mut state, &mut scene, KeyCode::Char('3'));
        press(&c, &mut state, &mut scene, KeyCode::Char('0'));
        press(&c, &mut state, &mut scene, KeyCode::Char('E'));
        assert_eq!(scene.light.cos_exp, 1);
        assert_eq!(scene.models[0].transform.position(), Vector3::zeros());

        press(&c, &mut state, &mut scene, KeyCode::Char('3'));
        press(&c, &mut state, &mut scene, KeyCode::Char('E'));
        press(&c, &mut state, &mut scene, KeyCode::Char('E'));
        press(&c, &mut state, &mut scene, KeyCode::Char('e'));
        assert_eq!(scene.light.cos_exp, 2);
    }

    #[test]
    fn test_left_drag_moves_point_light() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('2'));
        let before = scene.light.point_position;
        mouse(&c, &mut state, &mut scene, MouseEventKind::Down(MouseButton::Left), 40, 20);
        mouse(&c, &mut state, &mut scene, MouseEventKind::Drag(MouseButton::Left), 40, 5);
        assert_ne!(scene.light.point_position, before);
        assert!((scene.light.point_position.coords.norm() - before.coords.norm()).abs() < 1e-4);
        assert_eq!(*scene.models[0].transform.matrix(), nalgebra::Matrix4::identity());
    }

    #[test]
    fn test_scroll() {
        let (c, mut state, mut scene) = setup();
        mouse(&c, &mut state, &mut scene, MouseEventKind::ScrollUp, 0, 0);
        assert!((scene.models[0].transform.position().z + 0.25).abs() < EPS);

        press(&c, &mut state, &mut scene, KeyCode::Char('2'));
        let z = scene.light.point_position.z;
        mouse(&c, &mut state, &mut scene, MouseEventKind::ScrollDown, 0, 0);
        assert!((scene.light.point_position.z - (z + 1.0)).abs() < EPS);
    }

    #[test]
    fn test_scroll_moves_spot_light_along_z() {
        let (c, mut state, mut scene) = setup();
        press(&c, &mut state, &mut scene, KeyCode::Char('3'));
        let before = scene.light.spot_position;
        mouse(&c, &mut state, &mut scene, MouseEventKind::ScrollUp, 0, 0);
        mouse(&c, &mut state, &mut scene, MouseEventKind::ScrollUp, 0, 0);
        let after = scene.light.spot_position;
        assert!((after - Point3::new(before.x, before.y, before.z - 2.0)).norm() < EPS);
        assert_eq!(scene.light.point_position, Light::default().point_position);
        assert_eq!(scene.models[0].transform.position(), Vector3::zeros());
    }
}
