//! Sketchpad Application
//!
//! The drawing engine hosts talk to, plus a headless script runner that
//! replays recorded input against it.

mod blit;
mod engine;
mod script;

pub use blit::{BlitSlot, PngDecoder, SnapshotDecoder};
pub use engine::{CLEAR_PROMPT, ConfirmGate, DrawingEngine, EngineError, EngineResult};
pub use script::{
    Command, Script, ScriptError, ScriptReport, ScriptResult, run_script, run_script_file,
};
