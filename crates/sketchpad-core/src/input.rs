//! Normalized pointer input pushed into the engine by the host.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in display coordinates.
///
/// Mouse, pen and touch input all reduce to this. `Cancel` covers the pointer
/// leaving the canvas and cancelled touches; the engine resolves it exactly
/// like `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up,
    Cancel,
}

/// Touch lifecycle phase as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

impl PointerEvent {
    /// Normalize a touch event.
    ///
    /// Only the first active touch is tracked. Start and move events with no
    /// active touches carry no usable position and yield `None`; end and
    /// cancel always resolve the gesture.
    pub fn from_touch(phase: TouchPhase, touches: &[Point]) -> Option<Self> {
        match phase {
            TouchPhase::Start => touches.first().map(|&position| PointerEvent::Down { position }),
            TouchPhase::Move => touches.first().map(|&position| PointerEvent::Move { position }),
            TouchPhase::End => Some(PointerEvent::Up),
            TouchPhase::Cancel => Some(PointerEvent::Cancel),
        }
    }
}
