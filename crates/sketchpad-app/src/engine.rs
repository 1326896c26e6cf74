//! The drawing engine: owns the raster and routes input to the active tool.

use crate::blit::{BlitSlot, PngDecoder, SnapshotDecoder};
use kurbo::{Point, Rect};
use sketchpad_core::{
    CanvasConfig, ConfigError, CoordinateMapper, History, InkMode, PointerEvent, Rgba, SaveHandler,
    Snapshot, StrokeWidth, ToolBehavior, ToolKind, ToolSettings, TouchPhase,
};
use sketchpad_render::{
    GestureStrategy, Raster, RendererError, ShapePreview, StrokeRenderer, decode_image, encode_png,
};
use std::future::poll_fn;
use std::task::{Context, Poll};
use thiserror::Error;

/// Prompt shown before clearing the canvas.
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the drawing?";

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("A history restore is still in progress")]
    RestorePending,
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Asks the user before a destructive action.
pub trait ConfirmGate {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> ConfirmGate for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// History move whose pixels have not reached the raster yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryStep {
    Undo,
    Redo,
}

/// Interactive raster drawing surface.
///
/// The engine is the single writer of its raster. A gesture (pen, eraser or
/// shape preview) and a history restore never overlap: undo, redo, clear and
/// background loads finish the active gesture first, and pointer-down is
/// ignored while a restore is pending.
pub struct DrawingEngine {
    config: CanvasConfig,
    raster: Raster,
    tools: ToolSettings,
    history: History<Snapshot>,
    mapper: CoordinateMapper,
    /// Strategy of the gesture in progress.
    gesture: Option<Box<dyn GestureStrategy>>,
    blit: BlitSlot,
    /// Steps taken since the raster last matched the top of history.
    unsettled: Vec<HistoryStep>,
    decoder: Box<dyn SnapshotDecoder>,
    save_handler: Option<Box<dyn SaveHandler>>,
}

impl DrawingEngine {
    /// Create an engine with a blank canvas as the history floor.
    pub fn new(config: CanvasConfig) -> EngineResult<Self> {
        config.validate()?;
        let raster = Raster::new(config.width, config.height, config.background_color);
        let seed = encode_png(&raster)?;
        let tools = ToolSettings::new(ToolKind::default(), config.stroke_color, config.stroke_width);
        log::info!(
            "Canvas {}x{} ready (history limit {})",
            config.width,
            config.height,
            config.history_limit
        );
        Ok(Self {
            history: History::with_limit(seed, config.history_limit),
            mapper: CoordinateMapper::new(config.logical_size()),
            raster,
            tools,
            config,
            gesture: None,
            blit: BlitSlot::new(),
            unsettled: Vec::new(),
            decoder: Box::new(PngDecoder),
            save_handler: None,
        })
    }

    /// Use a custom snapshot decoder for undo/redo.
    pub fn with_decoder(mut self, decoder: impl SnapshotDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Install the collaborator notified after every committed change.
    pub fn set_save_handler(&mut self, handler: impl SaveHandler + 'static) {
        self.save_handler = Some(Box::new(handler));
    }

    /// Set or clear the id passed to the save handler. Without one nothing is saved.
    pub fn set_document_id(&mut self, id: Option<String>) {
        self.config.document_id = id;
    }

    /// Update where the canvas sits on screen.
    pub fn set_display_rect(&mut self, rect: Rect) {
        self.mapper.set_display_rect(rect);
    }

    // --- Tool state ---

    /// Switch tools. Applies from the next pointer-down.
    pub fn select_tool(&mut self, tool: ToolKind) {
        log::debug!("Tool: {}", tool);
        self.tools.tool = tool;
    }

    /// Set the ink color. The eraser ignores it.
    pub fn select_color(&mut self, color: Rgba) {
        log::debug!("Color: {}", color);
        self.tools.color = color;
    }

    /// Set the stroke width, clamping into `1..=10`. Returns the width applied.
    pub fn set_stroke_width(&mut self, width: u32) -> StrokeWidth {
        let applied = StrokeWidth::new(width).unwrap_or_else(|| {
            let clamped = StrokeWidth::clamped(width);
            log::warn!("Stroke width {} out of range, using {}", width, clamped.get());
            clamped
        });
        self.tools.width = applied;
        applied
    }

    /// Current tool, color and width.
    pub fn tool_settings(&self) -> &ToolSettings {
        &self.tools
    }

    // --- Input ---

    /// Feed a normalized pointer event in display coordinates.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> EngineResult<()> {
        match event {
            PointerEvent::Down { position } => {
                self.pointer_down(position)?;
            }
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up | PointerEvent::Cancel => self.end_gesture()?,
        }
        Ok(())
    }

    /// Feed a touch event. Start or move events without touches are ignored.
    pub fn handle_touch(&mut self, phase: TouchPhase, touches: &[Point]) -> EngineResult<()> {
        match PointerEvent::from_touch(phase, touches) {
            Some(event) => self.handle_pointer(event),
            None => {
                log::debug!("Ignoring touch {:?} without touches", phase);
                Ok(())
            }
        }
    }

    fn pointer_down(&mut self, position: Point) -> EngineResult<bool> {
        if self.blit.is_pending() {
            log::debug!("Ignoring pointer down while a restore is pending");
            return Ok(false);
        }
        // A second down without an up closes the previous gesture.
        self.end_gesture()?;

        let start = self.mapper.to_logical(position);
        let (color, width) = self.tools.ink(self.config.background_color);
        let strategy: Box<dyn GestureStrategy> = match self.tools.tool.behavior() {
            ToolBehavior::Freehand(mode) => {
                if mode == InkMode::Eraser {
                    log::debug!("Eraser down at {:?} (width {})", start, width);
                }
                Box::new(StrokeRenderer::new(start, color, width))
            }
            ToolBehavior::Shape(kind) => {
                Box::new(ShapePreview::begin(&self.raster, kind, start, color, width))
            }
        };
        log::debug!("Gesture started with {} at {:?}", self.tools.tool, start);
        self.gesture = Some(strategy);
        Ok(true)
    }

    fn pointer_move(&mut self, position: Point) {
        let to = self.mapper.to_logical(position);
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.advance(&mut self.raster, to);
        }
    }

    /// Resolve the active gesture, committing the result.
    fn end_gesture(&mut self) -> EngineResult<()> {
        let Some(mut gesture) = self.gesture.take() else {
            return Ok(());
        };
        gesture.finish(&mut self.raster);
        if gesture.has_moved() || self.config.commit_empty_gestures {
            self.commit(true)?;
        } else {
            log::debug!("Empty gesture discarded");
        }
        Ok(())
    }

    /// Whether a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    // --- History ---

    /// Snapshot the raster into history and optionally notify the save handler.
    fn commit(&mut self, autosave: bool) -> EngineResult<()> {
        let snapshot = encode_png(&self.raster)?;
        self.history.commit(snapshot.clone());
        log::info!(
            "Committed snapshot ({} bytes, {} in history)",
            snapshot.len(),
            self.history.len()
        );
        if autosave {
            self.notify_save(&snapshot);
        }
        Ok(())
    }

    fn notify_save(&mut self, snapshot: &Snapshot) {
        if let (Some(id), Some(handler)) = (self.config.document_id.as_deref(), self.save_handler.as_mut()) {
            handler.on_save(id, snapshot);
        }
    }

    /// Step back one state. Returns `false` at the history floor.
    ///
    /// The raster is updated once the restore is settled with
    /// [`Self::poll_blit`] or [`Self::settle`].
    pub fn undo(&mut self) -> EngineResult<bool> {
        self.end_gesture()?;
        let Some(snapshot) = self.history.undo().cloned() else {
            log::info!("Nothing to undo");
            return Ok(false);
        };
        self.request_restore(HistoryStep::Undo, snapshot);
        Ok(true)
    }

    /// Re-apply the last undone state. Returns `false` if there is none.
    pub fn redo(&mut self) -> EngineResult<bool> {
        self.end_gesture()?;
        let Some(snapshot) = self.history.redo().cloned() else {
            log::info!("Nothing to redo");
            return Ok(false);
        };
        self.request_restore(HistoryStep::Redo, snapshot);
        Ok(true)
    }

    fn request_restore(&mut self, step: HistoryStep, snapshot: Snapshot) {
        self.unsettled.push(step);
        let generation = self.blit.request(self.decoder.decode(snapshot));
        log::debug!("Restore {} requested ({:?})", generation, step);
    }

    /// Walk history back to the state the raster still shows.
    fn unwind_unsettled(&mut self) {
        while let Some(step) = self.unsettled.pop() {
            let reverted = match step {
                HistoryStep::Undo => self.history.redo(),
                HistoryStep::Redo => self.history.undo(),
            };
            if reverted.is_none() {
                log::warn!("Could not revert {:?} after a failed restore", step);
            }
        }
    }

    /// Whether a state older than the displayed one is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether an undone state can be re-applied.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Committed snapshots, newest last.
    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    /// Whether an undo/redo restore has not been applied yet.
    pub fn is_restoring(&self) -> bool {
        self.blit.is_pending()
    }

    /// Drive the pending restore and apply it when decoded.
    ///
    /// A failed or mismatched decode leaves the raster untouched, moves
    /// history back to the state on screen and is reported as an error.
    pub fn poll_blit(&mut self, cx: &mut Context<'_>) -> Poll<EngineResult<()>> {
        match self.blit.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(None) => Poll::Ready(Ok(())),
            Poll::Ready(Some((generation, result))) => {
                let applied = result.and_then(|raster| self.raster.replace_with(raster));
                match &applied {
                    Ok(()) => {
                        self.unsettled.clear();
                        log::debug!("Restore {} applied", generation);
                    }
                    Err(e) => {
                        log::error!("Restore {} failed: {}", generation, e);
                        self.unwind_unsettled();
                    }
                }
                Poll::Ready(applied.map_err(EngineError::from))
            }
        }
    }

    /// Wait for the pending restore, if any, and apply it.
    pub async fn settle(&mut self) -> EngineResult<()> {
        poll_fn(|cx| self.poll_blit(cx)).await
    }

    // --- Canvas actions ---

    /// Reset to the background color after confirmation. Returns whether the
    /// canvas was cleared.
    pub fn clear(&mut self, mut gate: impl ConfirmGate) -> EngineResult<bool> {
        if !gate.confirm(CLEAR_PROMPT) {
            log::info!("Clear cancelled");
            return Ok(false);
        }
        self.end_gesture()?;
        self.blit.cancel();
        self.unsettled.clear();
        self.raster.fill(self.config.background_color);
        self.commit(true)?;
        log::info!("Canvas cleared");
        Ok(true)
    }

    /// The committed state as a PNG snapshot.
    pub fn export_snapshot(&self) -> Snapshot {
        log::info!("Exporting snapshot ({} bytes)", self.history.current().len());
        self.history.current().clone()
    }

    /// Decode an image (PNG, JPEG or WebP), scale it to the canvas and draw
    /// it as a new history entry.
    pub fn load_background_image(&mut self, bytes: &[u8]) -> EngineResult<()> {
        if self.blit.is_pending() {
            log::warn!("Background image rejected while a restore is pending");
            return Err(EngineError::RestorePending);
        }
        self.end_gesture()?;
        let image = decode_image(bytes).inspect_err(|e| log::error!("Background image: {}", e))?;
        self.raster.draw_image_scaled(&image);
        self.commit(false)?;
        log::info!("Background image loaded");
        Ok(())
    }

    // --- Accessors ---

    /// Live pixels, including an in-progress gesture.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Configuration the engine was created with, plus later document id changes.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchpad_core::{BoxFuture, ShapeKind};
    use sketchpad_render::{RenderResult, ShapeRenderer, decode_png};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::task::Waker;

    fn config(width: u32, height: u32) -> CanvasConfig {
        CanvasConfig {
            width,
            height,
            ..Default::default()
        }
    }

    fn engine() -> DrawingEngine {
        DrawingEngine::new(config(60, 40)).unwrap()
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
        }
    }

    fn to(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn drag(engine: &mut DrawingEngine, from: (f64, f64), end: (f64, f64)) {
        engine.handle_pointer(down(from.0, from.1)).unwrap();
        engine.handle_pointer(to(end.0, end.1)).unwrap();
        engine.handle_pointer(PointerEvent::Up).unwrap();
    }

    fn settle(engine: &mut DrawingEngine) {
        pollster::block_on(engine.settle()).unwrap();
    }

    /// Decoder whose futures stay pending until the gate opens.
    #[derive(Clone, Default)]
    struct GatedDecoder {
        open: Arc<AtomicBool>,
        completed: Arc<AtomicUsize>,
    }

    impl SnapshotDecoder for GatedDecoder {
        fn decode(&self, snapshot: Snapshot) -> BoxFuture<'static, RenderResult<Raster>> {
            let open = Arc::clone(&self.open);
            let completed = Arc::clone(&self.completed);
            Box::pin(poll_fn(move |cx| {
                if open.load(Ordering::SeqCst) {
                    completed.fetch_add(1, Ordering::SeqCst);
                    Poll::Ready(decode_png(&snapshot))
                } else {
                    cx.waker().wake_by_ref();
                    Poll::Pending
                }
            }))
        }
    }

    struct FailingDecoder;

    impl SnapshotDecoder for FailingDecoder {
        fn decode(&self, _snapshot: Snapshot) -> BoxFuture<'static, RenderResult<Raster>> {
            Box::pin(async { Err(RendererError::Decode("corrupt".into())) })
        }
    }

    /// PNG decoder that fails while `broken` is set.
    #[derive(Clone, Default)]
    struct FlakyDecoder {
        broken: Arc<AtomicBool>,
    }

    impl SnapshotDecoder for FlakyDecoder {
        fn decode(&self, snapshot: Snapshot) -> BoxFuture<'static, RenderResult<Raster>> {
            if self.broken.load(Ordering::SeqCst) {
                FailingDecoder.decode(snapshot)
            } else {
                PngDecoder.decode(snapshot)
            }
        }
    }

    #[test]
    fn test_pen_stroke_commits() {
        let mut engine = engine();
        drag(&mut engine, (5.0, 5.5), (50.0, 5.5));
        assert_eq!(engine.raster().pixel(20, 5), Some(Rgba::black()));
        assert_eq!(engine.history().len(), 2);
        assert!(!engine.is_drawing());
    }

    #[test]
    fn test_undo_back_to_seed() {
        let mut engine = engine();
        let blank = engine.raster().clone();
        for i in 0..5 {
            let y = 5.5 + f64::from(i) * 6.0;
            drag(&mut engine, (5.0, y), (50.0, y));
        }
        for _ in 0..5 {
            assert!(engine.undo().unwrap());
            settle(&mut engine);
        }
        assert_eq!(engine.raster(), &blank);
        assert!(!engine.undo().unwrap());
        assert!(!engine.is_restoring());
        assert_eq!(engine.raster(), &blank);
    }

    #[test]
    fn test_redo_restores_exact_pixels() {
        let mut engine = engine();
        engine.select_color(Rgba::rgb(255, 0, 0));
        drag(&mut engine, (3.0, 3.0), (57.0, 37.0));
        let drawn = engine.raster().clone();

        engine.undo().unwrap();
        settle(&mut engine);
        assert_ne!(engine.raster(), &drawn);

        assert!(engine.redo().unwrap());
        settle(&mut engine);
        assert_eq!(engine.raster(), &drawn);
        assert!(!engine.redo().unwrap());
    }

    #[test]
    fn test_commit_after_undo_clears_redo() {
        let mut engine = engine();
        drag(&mut engine, (5.0, 5.0), (50.0, 5.0));
        engine.undo().unwrap();
        settle(&mut engine);
        assert!(engine.can_redo());
        drag(&mut engine, (5.0, 20.0), (50.0, 20.0));
        assert!(!engine.can_redo());
        assert!(!engine.redo().unwrap());
    }

    #[test]
    fn test_history_depth_is_bounded() {
        let mut engine = engine();
        for i in 0..21 {
            let x = 2.5 + f64::from(i) * 2.0;
            drag(&mut engine, (x, 2.0), (x, 38.0));
        }
        assert_eq!(engine.history().len(), 20);
        let mut undos = 0;
        while engine.undo().unwrap() {
            undos += 1;
        }
        assert_eq!(undos, 19);
    }

    #[test]
    fn test_latest_restore_wins() {
        let decoder = GatedDecoder::default();
        let mut engine = engine().with_decoder(decoder.clone());
        let blank = engine.raster().clone();
        drag(&mut engine, (5.0, 5.0), (50.0, 5.0));
        drag(&mut engine, (5.0, 20.0), (50.0, 20.0));
        let latest = engine.raster().clone();

        // Two undos in flight: the first is superseded before it completes.
        engine.undo().unwrap();
        let mut cx = Context::from_waker(Waker::noop());
        assert!(engine.poll_blit(&mut cx).is_pending());
        assert_eq!(engine.raster(), &latest);
        engine.undo().unwrap();

        decoder.open.store(true, Ordering::SeqCst);
        settle(&mut engine);
        assert_eq!(decoder.completed.load(Ordering::SeqCst), 1);
        assert_eq!(engine.raster(), &blank);
    }

    #[test]
    fn test_pointer_down_ignored_while_restoring() {
        let decoder = GatedDecoder::default();
        let mut engine = engine().with_decoder(decoder.clone());
        drag(&mut engine, (5.0, 5.0), (50.0, 5.0));
        engine.undo().unwrap();

        engine.handle_pointer(down(5.0, 30.0)).unwrap();
        assert!(!engine.is_drawing());
        engine.handle_pointer(to(50.0, 30.0)).unwrap();
        engine.handle_pointer(PointerEvent::Up).unwrap();
        assert_eq!(engine.history().len(), 1);
        assert!(matches!(
            engine.load_background_image(&[]),
            Err(EngineError::RestorePending)
        ));

        decoder.open.store(true, Ordering::SeqCst);
        settle(&mut engine);
        assert!(engine.raster().is_uniform(Rgba::white()));
    }

    #[test]
    fn test_failed_restore_keeps_raster() {
        let mut engine = engine().with_decoder(FailingDecoder);
        drag(&mut engine, (5.0, 5.0), (50.0, 5.0));
        let drawn = engine.raster().clone();
        engine.undo().unwrap();
        let result = pollster::block_on(engine.settle());
        assert!(matches!(
            result,
            Err(EngineError::Render(RendererError::Decode(_)))
        ));
        assert_eq!(engine.raster(), &drawn);
        assert!(!engine.is_restoring());
        // History is back on the state that is still displayed.
        assert_eq!(&decode_png(&engine.export_snapshot()).unwrap(), engine.raster());
        assert!(engine.can_undo());
        assert!(!engine.can_redo());
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_failed_restore_reverts_every_superseded_step() {
        let mut engine = engine().with_decoder(FailingDecoder);
        drag(&mut engine, (5.0, 5.0), (50.0, 5.0));
        drag(&mut engine, (5.0, 20.0), (50.0, 20.0));
        let drawn = engine.raster().clone();

        engine.undo().unwrap();
        engine.undo().unwrap();
        assert!(pollster::block_on(engine.settle()).is_err());

        assert_eq!(engine.raster(), &drawn);
        assert_eq!(&decode_png(&engine.export_snapshot()).unwrap(), &drawn);
        assert_eq!(engine.history().len(), 3);
        assert!(!engine.can_redo());

        // The next stroke stacks on the displayed state.
        drag(&mut engine, (5.0, 30.0), (50.0, 30.0));
        assert_eq!(engine.history().len(), 4);
        assert_eq!(&decode_png(&engine.export_snapshot()).unwrap(), engine.raster());
    }

    #[test]
    fn test_failed_redo_returns_to_undone_state() {
        let decoder = FlakyDecoder::default();
        let mut engine = engine().with_decoder(decoder.clone());
        drag(&mut engine, (5.0, 5.0), (50.0, 5.0));
        engine.undo().unwrap();
        settle(&mut engine);
        assert!(engine.raster().is_uniform(Rgba::white()));

        decoder.broken.store(true, Ordering::SeqCst);
        engine.redo().unwrap();
        assert!(pollster::block_on(engine.settle()).is_err());
        assert!(engine.raster().is_uniform(Rgba::white()));
        assert!(decode_png(&engine.export_snapshot()).unwrap().is_uniform(Rgba::white()));
        assert!(engine.can_redo());

        decoder.broken.store(false, Ordering::SeqCst);
        engine.redo().unwrap();
        settle(&mut engine);
        assert_eq!(engine.raster().pixel(20, 5), Some(Rgba::black()));
        assert!(!engine.can_redo());
    }

    #[test]
    fn test_shape_preview_has_no_residue() {
        let mut engine = engine();
        engine.select_tool(ToolKind::Oval);
        engine.set_stroke_width(3);
        engine.handle_pointer(down(10.0, 10.0)).unwrap();
        for (x, y) in [(55.0, 35.0), (15.0, 38.0), (50.0, 12.0), (40.0, 30.0)] {
            engine.handle_pointer(to(x, y)).unwrap();
        }
        engine.handle_pointer(PointerEvent::Up).unwrap();

        let mut expected = Raster::new(60, 40, Rgba::white());
        expected.render_geometry(
            &ShapeKind::Oval.geometry(Point::new(10.0, 10.0), Point::new(40.0, 30.0), 3.0),
            Rgba::black(),
        );
        assert_eq!(engine.raster(), &expected);
    }

    #[test]
    fn test_zero_move_shape_commits_without_drawing() {
        let mut engine = engine();
        engine.select_tool(ToolKind::Rectangle);
        engine.handle_pointer(down(10.0, 10.0)).unwrap();
        engine.handle_pointer(PointerEvent::Up).unwrap();
        assert!(engine.raster().is_uniform(Rgba::white()));
        assert_eq!(engine.history().len(), 2);

        let mut strict = DrawingEngine::new(CanvasConfig {
            commit_empty_gestures: false,
            ..config(60, 40)
        })
        .unwrap();
        strict.handle_pointer(down(10.0, 10.0)).unwrap();
        strict.handle_pointer(PointerEvent::Cancel).unwrap();
        assert_eq!(strict.history().len(), 1);
    }

    #[test]
    fn test_eraser_triples_width() {
        let mut engine = DrawingEngine::new(config(100, 100)).unwrap();
        let black = encode_png(&Raster::new(100, 100, Rgba::black())).unwrap();
        engine.load_background_image(black.as_bytes()).unwrap();

        engine.select_tool(ToolKind::Eraser);
        engine.set_stroke_width(4);
        drag(&mut engine, (50.0, 0.0), (50.0, 100.0));
        let erased: Vec<u32> = (0..100)
            .filter(|&x| engine.raster().pixel(x, 50) == Some(Rgba::white()))
            .collect();
        assert_eq!(erased, (44..56).collect::<Vec<_>>());
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut engine = engine();
        drag(&mut engine, (5.0, 5.0), (50.0, 5.0));
        let drawn = engine.raster().clone();

        let mut prompts = Vec::new();
        let cleared = engine
            .clear(|prompt: &str| {
                prompts.push(prompt.to_string());
                false
            })
            .unwrap();
        assert!(!cleared);
        assert_eq!(prompts, vec![CLEAR_PROMPT.to_string()]);
        assert_eq!(engine.raster(), &drawn);
        assert_eq!(engine.history().len(), 2);

        assert!(engine.clear(|_: &str| true).unwrap());
        let exported = decode_png(&engine.export_snapshot()).unwrap();
        assert!(exported.is_uniform(Rgba::white()));
        assert_eq!(engine.history().len(), 3);
    }

    #[test]
    fn test_clear_cancels_pending_restore() {
        let decoder = GatedDecoder::default();
        let mut engine = engine().with_decoder(decoder.clone());
        drag(&mut engine, (5.0, 5.0), (50.0, 5.0));
        engine.undo().unwrap();
        assert!(engine.clear(|_: &str| true).unwrap());
        assert!(!engine.is_restoring());
        decoder.open.store(true, Ordering::SeqCst);
        settle(&mut engine);
        assert_eq!(decoder.completed.load(Ordering::SeqCst), 0);
        assert!(engine.raster().is_uniform(Rgba::white()));
    }

    #[test]
    fn test_autosave_after_commits_only() {
        let saves: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut engine = DrawingEngine::new(CanvasConfig {
            document_id: Some("sketch-7".into()),
            ..config(60, 40)
        })
        .unwrap();
        let log = Rc::clone(&saves);
        engine.set_save_handler(move |id: &str, snapshot: &Snapshot| {
            assert!(!snapshot.is_empty());
            log.borrow_mut().push(id.to_string());
        });

        engine.select_tool(ToolKind::Line);
        engine.handle_pointer(down(5.0, 5.0)).unwrap();
        engine.handle_pointer(to(30.0, 30.0)).unwrap();
        engine.handle_pointer(to(40.0, 20.0)).unwrap();
        assert!(saves.borrow().is_empty());
        engine.handle_pointer(PointerEvent::Up).unwrap();
        assert_eq!(saves.borrow().len(), 1);

        engine.clear(|_: &str| true).unwrap();
        assert_eq!(*saves.borrow(), vec!["sketch-7".to_string(); 2]);

        engine.undo().unwrap();
        settle(&mut engine);
        assert_eq!(saves.borrow().len(), 2);
    }

    #[test]
    fn test_no_autosave_without_document_id() {
        let calls = Rc::new(RefCell::new(0));
        let mut engine = engine();
        let counter = Rc::clone(&calls);
        engine.set_save_handler(move |_: &str, _: &Snapshot| *counter.borrow_mut() += 1);
        drag(&mut engine, (5.0, 5.0), (50.0, 5.0));
        assert_eq!(*calls.borrow(), 0);

        engine.set_document_id(Some("late".into()));
        drag(&mut engine, (5.0, 15.0), (50.0, 15.0));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_export_is_committed_state() {
        let mut engine = engine();
        engine.handle_pointer(down(5.0, 5.0)).unwrap();
        engine.handle_pointer(to(50.0, 5.0)).unwrap();
        // Mid-gesture export still returns the floor.
        let exported = decode_png(&engine.export_snapshot()).unwrap();
        assert!(exported.is_uniform(Rgba::white()));
        engine.handle_pointer(PointerEvent::Up).unwrap();
        let exported = decode_png(&engine.export_snapshot()).unwrap();
        assert_eq!(&exported, engine.raster());
    }

    #[test]
    fn test_non_uniform_display_mapping() {
        let mut engine = DrawingEngine::new(config(600, 400)).unwrap();
        // Canvas shown at half width and full height, offset on screen.
        engine.set_display_rect(Rect::new(100.0, 50.0, 400.0, 450.0));
        drag(&mut engine, (250.0, 250.5), (251.0, 250.5));
        // Display x 250 -> logical 300, display y 250.5 -> logical 200.5.
        assert_eq!(engine.raster().pixel(300, 200), Some(Rgba::black()));
        assert_eq!(engine.raster().pixel(150, 200), Some(Rgba::white()));
    }

    #[test]
    fn test_touch_without_points_is_ignored() {
        let mut engine = engine();
        engine.handle_touch(TouchPhase::Start, &[]).unwrap();
        assert!(!engine.is_drawing());
        engine
            .handle_touch(TouchPhase::Start, &[Point::new(5.0, 5.5), Point::new(30.0, 30.0)])
            .unwrap();
        engine.handle_touch(TouchPhase::Move, &[]).unwrap();
        engine.handle_touch(TouchPhase::Move, &[Point::new(40.0, 5.5)]).unwrap();
        engine.handle_touch(TouchPhase::Cancel, &[]).unwrap();
        assert!(!engine.is_drawing());
        assert_eq!(engine.raster().pixel(20, 5), Some(Rgba::black()));
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_stroke_width_is_clamped() {
        let mut engine = engine();
        assert_eq!(engine.set_stroke_width(0).get(), 1);
        assert_eq!(engine.set_stroke_width(42).get(), 10);
        assert_eq!(engine.set_stroke_width(7).get(), 7);
        assert_eq!(engine.tool_settings().width.get(), 7);
    }

    #[test]
    fn test_style_captured_at_gesture_start() {
        let mut engine = engine();
        engine.handle_pointer(down(5.0, 5.5)).unwrap();
        engine.select_color(Rgba::rgb(0, 0, 255));
        engine.handle_pointer(to(50.0, 5.5)).unwrap();
        engine.handle_pointer(PointerEvent::Up).unwrap();
        assert_eq!(engine.raster().pixel(20, 5), Some(Rgba::black()));
    }

    #[test]
    fn test_background_image_scaled_and_committed() {
        let mut engine = engine();
        let image = encode_png(&Raster::new(6, 4, Rgba::rgb(0, 255, 0))).unwrap();
        engine.load_background_image(image.as_bytes()).unwrap();
        assert_eq!(engine.raster().pixel(30, 20), Some(Rgba::rgb(0, 255, 0)));
        assert_eq!(engine.history().len(), 2);

        assert!(engine.load_background_image(b"garbage").is_err());
        assert_eq!(engine.history().len(), 2);

        engine.undo().unwrap();
        settle(&mut engine);
        assert!(engine.raster().is_uniform(Rgba::white()));
    }

    #[test]
    fn test_undo_finishes_active_gesture() {
        let mut engine = engine();
        engine.handle_pointer(down(5.0, 5.5)).unwrap();
        engine.handle_pointer(to(50.0, 5.5)).unwrap();
        assert!(engine.undo().unwrap());
        assert!(!engine.is_drawing());
        settle(&mut engine);
        assert!(engine.raster().is_uniform(Rgba::white()));
        assert!(engine.can_redo());
    }
}
