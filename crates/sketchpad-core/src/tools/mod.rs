//! Tool system for the drawing surface.

use crate::color::Rgba;
use crate::shapes::ShapeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Eraser strokes are this many times wider than the configured width.
pub const ERASER_WIDTH_MULTIPLIER: f64 = 3.0;

/// Unknown tool identifier from the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Line,
    Arrow,
    Rectangle,
    Diamond,
    Oval,
}

/// How freehand ink is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InkMode {
    /// Paint in the tool color.
    Pen,
    /// Paint in the background color at [`ERASER_WIDTH_MULTIPLIER`] times the width.
    Eraser,
}

/// Rendering strategy selected by a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolBehavior {
    /// Ink is laid down incrementally on every move.
    Freehand(InkMode),
    /// A candidate shape is previewed and redrawn on every move.
    Shape(ShapeKind),
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Pen,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Rectangle,
        ToolKind::Diamond,
        ToolKind::Oval,
    ];

    pub fn behavior(self) -> ToolBehavior {
        match self {
            ToolKind::Pen => ToolBehavior::Freehand(InkMode::Pen),
            ToolKind::Eraser => ToolBehavior::Freehand(InkMode::Eraser),
            ToolKind::Line => ToolBehavior::Shape(ShapeKind::Line),
            ToolKind::Arrow => ToolBehavior::Shape(ShapeKind::Arrow),
            ToolKind::Rectangle => ToolBehavior::Shape(ShapeKind::Rectangle),
            ToolKind::Diamond => ToolBehavior::Shape(ShapeKind::Diamond),
            ToolKind::Oval => ToolBehavior::Shape(ShapeKind::Oval),
        }
    }

    /// Identifier used by hosts (`"pen"`, `"rectangle"`, ...).
    pub fn id(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Eraser => "eraser",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Diamond => "diamond",
            ToolKind::Oval => "oval",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ToolKind {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Stroke width in logical pixels, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct StrokeWidth(u8);

impl StrokeWidth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Exact width, or `None` when outside `1..=10`.
    pub fn new(width: u32) -> Option<Self> {
        (u32::from(Self::MIN)..=u32::from(Self::MAX))
            .contains(&width)
            .then_some(Self(width as u8))
    }

    /// Width clamped into `1..=10`.
    pub fn clamped(width: u32) -> Self {
        Self(width.clamp(u32::from(Self::MIN), u32::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for StrokeWidth {
    fn default() -> Self {
        Self(2)
    }
}

impl From<u32> for StrokeWidth {
    fn from(width: u32) -> Self {
        Self::clamped(width)
    }
}

impl From<StrokeWidth> for u32 {
    fn from(width: StrokeWidth) -> Self {
        u32::from(width.0)
    }
}

/// Current tool, color and width applied to new gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub color: Rgba,
    pub width: StrokeWidth,
}

impl ToolSettings {
    pub fn new(tool: ToolKind, color: Rgba, width: StrokeWidth) -> Self {
        Self { tool, color, width }
    }

    /// Color and width the active tool actually paints with.
    pub fn ink(&self, background: Rgba) -> (Rgba, f64) {
        match self.tool.behavior() {
            ToolBehavior::Freehand(InkMode::Eraser) => {
                (background, self.width.as_f64() * ERASER_WIDTH_MULTIPLIER)
            }
            _ => (self.color, self.width.as_f64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_ids_roundtrip() {
        for tool in ToolKind::ALL {
            assert_eq!(tool.id().parse::<ToolKind>().unwrap(), tool);
        }
        assert_eq!("Oval".parse::<ToolKind>().unwrap(), ToolKind::Oval);
        assert!("lasso".parse::<ToolKind>().is_err());
    }

    #[test]
    fn test_behavior_dispatch() {
        assert_eq!(ToolKind::Pen.behavior(), ToolBehavior::Freehand(InkMode::Pen));
        assert_eq!(ToolKind::Eraser.behavior(), ToolBehavior::Freehand(InkMode::Eraser));
        assert_eq!(ToolKind::Diamond.behavior(), ToolBehavior::Shape(ShapeKind::Diamond));
    }

    #[test]
    fn test_stroke_width_bounds() {
        assert!(StrokeWidth::new(0).is_none());
        assert!(StrokeWidth::new(11).is_none());
        assert_eq!(StrokeWidth::new(10).unwrap().get(), 10);
        assert_eq!(StrokeWidth::clamped(0).get(), 1);
        assert_eq!(StrokeWidth::clamped(99).get(), 10);
        assert_eq!(StrokeWidth::default().get(), 2);
    }

    #[test]
    fn test_eraser_ink_uses_background_and_triple_width() {
        let settings = ToolSettings::new(ToolKind::Eraser, Rgba::rgb(255, 0, 0), StrokeWidth::clamped(4));
        let (color, width) = settings.ink(Rgba::white());
        assert_eq!(color, Rgba::white());
        assert!((width - 12.0).abs() < f64::EPSILON);

        let pen = ToolSettings { tool: ToolKind::Pen, ..settings };
        assert_eq!(pen.ink(Rgba::white()), (Rgba::rgb(255, 0, 0), 4.0));
    }

    #[test]
    fn test_width_deserializes_clamped() {
        let width: StrokeWidth = serde_json::from_str("25").unwrap();
        assert_eq!(width.get(), 10);
    }
}
