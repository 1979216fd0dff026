/// Terminal-based interactive model viewer
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use objview_core::Camera;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod input;
pub mod renderer;
pub mod scene;

pub use config::ViewerConfig;
pub use input::{Controller, Viewport};
pub use renderer::AsciiRenderer;
pub use scene::{ApplicationState, Model, Scene};

/// Main application struct for terminal model viewing
pub struct TerminalApp {
    scene: Scene,
    state: ApplicationState,
    controller: Controller,
    camera: Camera,
    renderer: AsciiRenderer,
    frame_time: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut state = ApplicationState::new(scene.models.len());
        state.spinning = config.spin;

        Ok(Self {
            controller: Controller::new(config),
            camera: Camera::new(1, 1).with_distance(config.camera_distance),
            renderer: AsciiRenderer::new(0, 0),
            frame_time: Duration::from_millis(1000 / u64::from(config.target_fps.max(1))),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            scene,
            state,
        }
        .with_size(width, height))
    }

    /// Size the renderer and camera for a terminal of `width` x `height` cells.
    /// The top row is kept for the status line.
    fn with_size(mut self, width: u16, height: u16) -> Self {
        self.resize(width, height);
        self
    }

    fn resize(&mut self, width: u16, height: u16) {
        let rows = height.saturating_sub(1).max(1);
        self.renderer.resize(width as usize, rows as usize);
        // Terminal cells are about twice as tall as they are wide.
        self.camera.set_viewport(u32::from(width), u32::from(rows) * 2);
        log::debug!("viewport {}x{}", width, rows);
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.renderer.width() as f32,
            height: self.renderer.height() as f32,
            extent: self.camera.visible_extent(),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            cursor::Show,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.state.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = match event::read()? {
                    Event::Resize(width, height) => {
                        self.resize(width, height);
                        continue;
                    }
                    // The drawing area starts below the status line.
                    Event::Mouse(mut mouse) => {
                        mouse.row = mouse.row.saturating_sub(1);
                        Event::Mouse(mouse)
                    }
                    other => other,
                };
                let viewport = self.viewport();
                self.controller
                    .handle_event(&event, &mut self.state, &mut self.scene, &viewport);
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn update(&mut self) {
        if self.state.spinning {
            if let Some(model) = self.scene.model_mut(&self.state) {
                model.transform.spin(1.0);
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        if let Some(model) = self.scene.model(&self.state) {
            self.renderer
                .render_model(model, &self.scene.light, self.state.light_mode, &self.camera);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&mut stdout)?;

        // Draw status line
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn status_line(&self) -> String {
        let model = self
            .scene
            .model(&self.state)
            .map_or("-", |m| m.name.as_str());
        let mode = if self.state.editing_light {
            format!("edit {:?} light", self.state.light_mode)
        } else {
            "edit model".to_string()
        };
        let light = if self.scene.light.on { "on" } else { "off" };
        format!(
            "objview | {} | {} | {:?} light {} | FPS: {:.1} | F1-F3 model, 0-3 mode, q quit",
            model, mode, self.state.light_mode, light, self.fps
        )
    }
}
