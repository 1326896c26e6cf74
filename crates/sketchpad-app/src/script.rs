//! JSON scripts replayed against a [`DrawingEngine`].
//!
//! ```json
//! {
//!   "config": { "width": 300, "height": 200, "documentId": "demo" },
//!   "display": { "x0": 0, "y0": 0, "x1": 150, "y1": 100 },
//!   "autosaveDir": "saves",
//!   "commands": [
//!     { "op": "selectTool", "tool": "arrow" },
//!     { "op": "down", "x": 10, "y": 10 },
//!     { "op": "move", "x": 120, "y": 80 },
//!     { "op": "up" },
//!     { "op": "export", "path": "out.png" }
//!   ]
//! }
//! ```

use crate::engine::{DrawingEngine, EngineError};
use kurbo::{Point, Rect};
use serde::Deserialize;
use sketchpad_core::{
    AutoSaveManager, CanvasConfig, ConfigError, FileStorage, PointerEvent, Rgba, StorageError,
    ToolKind, TouchPhase,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Script errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type ScriptResult<T> = Result<T, ScriptError>;

/// One host action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    SelectTool {
        tool: ToolKind,
    },
    SelectColor {
        color: Rgba,
    },
    SetWidth {
        width: u32,
    },
    Down {
        x: f64,
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up,
    Cancel,
    Touch {
        phase: TouchPhase,
        #[serde(default)]
        touches: Vec<Point>,
    },
    Undo,
    Redo,
    Clear {
        #[serde(default = "default_confirm")]
        confirm: bool,
    },
    LoadBackground {
        path: PathBuf,
    },
    Export {
        path: PathBuf,
        /// Write a `data:` URL instead of raw PNG bytes.
        #[serde(default, rename = "dataUrl")]
        data_url: bool,
    },
}

fn default_confirm() -> bool {
    true
}

/// A replayable session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    #[serde(default)]
    pub config: CanvasConfig,
    /// On-screen rect of the canvas; defaults to the logical size at the origin.
    #[serde(default)]
    pub display: Option<Rect>,
    /// Persist committed snapshots here (needs `config.documentId`).
    #[serde(default)]
    pub autosave_dir: Option<PathBuf>,
    pub commands: Vec<Command>,
}

impl Script {
    pub fn from_json(json: &str) -> ScriptResult<Self> {
        let script: Self = serde_json::from_str(json)?;
        script.config.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> ScriptResult<Self> {
        let json = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Outcome of a script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub commands: usize,
    pub exports: Vec<PathBuf>,
    /// Snapshots written by the autosave manager.
    pub autosaved: usize,
}

/// Run a script file. Relative paths resolve against the script's directory.
pub fn run_script_file(path: &Path) -> ScriptResult<ScriptReport> {
    let script = Script::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    run_script(script, base_dir)
}

/// Replay `script`, resolving relative paths against `base_dir`.
pub fn run_script(script: Script, base_dir: &Path) -> ScriptResult<ScriptReport> {
    let mut engine = DrawingEngine::new(script.config)?;
    if let Some(display) = script.display {
        engine.set_display_rect(display);
    }

    let autosave = match &script.autosave_dir {
        Some(dir) => {
            if engine.config().document_id.is_none() {
                log::warn!("autosaveDir set without a documentId; nothing will be saved");
            }
            let storage = Arc::new(FileStorage::new(base_dir.join(dir))?);
            let manager = Arc::new(AutoSaveManager::new(storage));
            engine.set_save_handler(manager.handler());
            Some(manager)
        }
        None => None,
    };

    let mut report = ScriptReport::default();
    for command in script.commands {
        log::debug!("{:?}", command);
        apply(&mut engine, command, base_dir, &mut report)?;
        report.commands += 1;
    }

    if let Some(manager) = autosave {
        report.autosaved = pollster::block_on(manager.flush())?;
    }
    log::info!(
        "Script finished: {} commands, {} exports",
        report.commands,
        report.exports.len()
    );
    Ok(report)
}

fn apply(
    engine: &mut DrawingEngine,
    command: Command,
    base_dir: &Path,
    report: &mut ScriptReport,
) -> ScriptResult<()> {
    match command {
        Command::SelectTool { tool } => engine.select_tool(tool),
        Command::SelectColor { color } => engine.select_color(color),
        Command::SetWidth { width } => {
            engine.set_stroke_width(width);
        }
        Command::Down { x, y } => engine.handle_pointer(PointerEvent::Down {
            position: Point::new(x, y),
        })?,
        Command::Move { x, y } => engine.handle_pointer(PointerEvent::Move {
            position: Point::new(x, y),
        })?,
        Command::Up => engine.handle_pointer(PointerEvent::Up)?,
        Command::Cancel => engine.handle_pointer(PointerEvent::Cancel)?,
        Command::Touch { phase, touches } => engine.handle_touch(phase, &touches)?,
        Command::Undo => {
            engine.undo()?;
            pollster::block_on(engine.settle())?;
        }
        Command::Redo => {
            engine.redo()?;
            pollster::block_on(engine.settle())?;
        }
        Command::Clear { confirm } => {
            engine.clear(|_: &str| confirm)?;
        }
        Command::LoadBackground { path } => {
            let path = base_dir.join(path);
            let bytes = fs::read(&path).map_err(|source| ScriptError::Read { path, source })?;
            engine.load_background_image(&bytes)?;
        }
        Command::Export { path, data_url } => {
            let path = base_dir.join(path);
            let snapshot = engine.export_snapshot();
            let written = if data_url {
                fs::write(&path, snapshot.to_data_url())
            } else {
                fs::write(&path, snapshot.as_bytes())
            };
            written.map_err(|source| ScriptError::Write {
                path: path.clone(),
                source,
            })?;
            log::info!("Exported {}", path.display());
            report.exports.push(path);
        }
    }
    Ok(())
}
