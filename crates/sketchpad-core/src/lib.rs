//! Sketchpad Core Library
//!
//! Platform-agnostic data structures and logic for the sketchpad drawing
//! surface: colors, tools, shape geometry, input mapping, snapshot history
//! and persistence.

pub mod color;
pub mod config;
pub mod history;
pub mod input;
pub mod mapper;
pub mod shapes;
pub mod snapshot;
pub mod storage;
pub mod tools;

pub use color::{ColorError, DEFAULT_PALETTE, Rgba};
pub use config::{CanvasConfig, ConfigError, ConfigResult};
pub use history::{History, MAX_HISTORY_DEPTH};
pub use input::{PointerEvent, TouchPhase};
pub use mapper::{CoordinateMapper, map_to_logical};
pub use shapes::{PathOp, ShapeGeometry, ShapeKind, ShapeTrait};
pub use snapshot::{Snapshot, SnapshotError};
pub use storage::{
    AutoSaveHandle, AutoSaveManager, BoxFuture, FileStorage, MemoryStorage, SaveHandler, Storage,
    StorageError, StorageResult,
};
pub use tools::{InkMode, StrokeWidth, ToolBehavior, ToolKind, ToolSettings};
