/// objview - interactive terminal model viewer
///
/// Loads one or more models in the vertex/normal/face text format and shows
/// them lit in the terminal. Run with `--help` for the controls.
use anyhow::{Context, Result};
use objview_core::{load_all, Mesh};
use objview_terminal::{config::USAGE, Scene, TerminalApp, ViewerConfig};
use std::env;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }
    let config = ViewerConfig::from_args(args).context("invalid arguments")?;

    let scene = if config.models.is_empty() {
        log::info!("no models given, showing the built-in cube");
        Scene::from_meshes([("cube", Mesh::cube(1.0))])
    } else {
        println!("Loading {} model(s)...", config.models.len());
        let meshes = load_all(&config.models).context("failed to load models")?;
        let names = config.models.iter().map(|path| {
            path.file_stem()
                .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
        });
        Scene::from_meshes(names.zip(meshes))
    };

    let mut app = TerminalApp::new(scene, &config).context("failed to query the terminal")?;
    app.run().context("terminal error")?;

    Ok(())
}
