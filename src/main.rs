//! Vector Style Editor (headless).
//!
//! Lädt die Optionen, importiert die übergebenen SVG-/GeoJSON-Dateien,
//! baut eine Render-Szene und protokolliert eine Zusammenfassung.
//!
//! Aufruf: `vector-style-editor [--presets <datei.json>] <datei>...`

use anyhow::{bail, Context};
use glam::DVec2;
use std::path::PathBuf;
use vector_style_editor::{AppController, AppIntent, AppState, EditorOptions, NoticeLevel};

/// Standard-Viewport für die Auflösungsberechnung.
const VIEWPORT: DVec2 = DVec2::new(1280.0, 720.0);

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!(
        "Vector Style Editor v{} startet...",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse(std::env::args().skip(1))?;

    // Optionen aus TOML laden (oder Standardwerte)
    let config_path = EditorOptions::config_path();
    let options = EditorOptions::load_from_file(&config_path);

    let mut state = AppState::with_options(options);
    let mut controller = AppController::new();
    controller.handle_intent(&mut state, AppIntent::ViewportResized { size: VIEWPORT })?;

    if let Some(path) = args.presets {
        controller.handle_intent(
            &mut state,
            AppIntent::PresetFileSelected {
                path: path.display().to_string(),
            },
        )?;
    }

    for path in &args.files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Datei nicht lesbar: {}", path.display()))
            .map_err(|e| format!("{:#}", e));
        controller.handle_intent(&mut state, AppIntent::FileDropped { name, contents })?;
    }

    let scene = controller.build_render_scene(&mut state);
    log::info!(
        "{} Features, {} Layer, {} Primitive bei Auflösung {:.3}",
        state.feature_count(),
        state.layers.len(),
        scene.primitives.len(),
        scene.resolution
    );

    let errors = state
        .ui
        .take_notices()
        .into_iter()
        .filter(|n| n.level == NoticeLevel::Error)
        .count();
    if errors > 0 {
        bail!("{} Datei(en) konnten nicht importiert werden", errors);
    }
    Ok(())
}

/// Kommandozeilen-Argumente.
#[derive(Debug, Default)]
struct Args {
    presets: Option<PathBuf>,
    files: Vec<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--presets" => {
                    let path = args.next().context("--presets erwartet einen Pfad")?;
                    parsed.presets = Some(PathBuf::from(path));
                }
                _ => parsed.files.push(PathBuf::from(arg)),
            }
        }
        Ok(parsed)
    }
}
