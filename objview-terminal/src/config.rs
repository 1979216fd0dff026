/// Viewer settings and command-line parsing
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: objview-terminal [--distance <units>] [--fps <frames>] [--spin] [<model.obj>...]

Without model paths a built-in cube is shown.

Keys:    F1-F3/Tab select model   x/X y/Y z/Z move   s/S scale   o/O orbit
         r reset model   R reset light   0 object mode   1/2/3 edit light
         f lights on/off   e/E spot edge   p idle spin   q/Esc quit
Mouse:   left drag rotate   right drag move (spot: cone size)   wheel depth";

/// Step sizes and startup options for the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// World units moved per x/y/z key press.
    pub translate_step: f32,
    pub scale_up: f32,
    pub scale_down: f32,
    /// Degrees orbited per o/O key press.
    pub orbit_step: f32,
    /// World units moved along z per wheel notch.
    pub scroll_step: f32,
    pub camera_distance: f32,
    pub target_fps: u32,
    /// Start with the idle spin enabled.
    pub spin: bool,
    pub models: Vec<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            translate_step: 0.1,
            scale_up: 1.1,
            scale_down: 0.9,
            orbit_step: 20.0,
            scroll_step: 0.25,
            camera_distance: 3.0,
            target_fps: 30,
            spin: false,
            models: Vec::new(),
        }
    }
}

impl ViewerConfig {
    /// Parse command-line arguments (without the program name).
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::<String>::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--distance" => {
                    let value = args.next().context("--distance needs a value")?;
                    config.camera_distance = value
                        .parse()
                        .with_context(|| format!("invalid camera distance: {value}"))?;
                    if !(config.camera_distance.is_finite() && config.camera_distance > 0.0) {
                        bail!("camera distance must be positive, got {value}");
                    }
                }
                "--fps" => {
                    let value = args.next().context("--fps needs a value")?;
                    config.target_fps = value
                        .parse()
                        .with_context(|| format!("invalid frame rate: {value}"))?;
                    if config.target_fps == 0 {
                        bail!("frame rate must be at least 1");
                    }
                }
                "--spin" => config.spin = true,
                flag if flag.starts_with('-') => bail!("unknown option: {flag}"),
                _ => config.models.push(PathBuf::from(&arg)),
            }
        }

        Ok(config)
    }
}
