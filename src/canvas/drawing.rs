//! The drawing: canvas state mutated by pointer samples and commands.
//!
//! A [`Drawing`] owns the layer stack, the brushes, the tool color and the
//! persistence raster. Input is handled one sample at a time: the segment from
//! the previous pointer position to the new one is stroked with every active
//! brush into the current layer, and the invalidated rectangle is recomposed
//! into a [`Frame`] for the presenter.

use crate::brush::brush::{Brush, BrushId, BrushSet};
use crate::brush::stroke::{Segment, StrokeOutcome, stroke_segment};
use crate::canvas::compositor::{Compositor, Frame};
use crate::canvas::config::{DrawingBuilder, DrawingConfig};
use crate::canvas::layer_stack::{LayerId, LayerStack};
use crate::image::color::{BlendMode, Color};
use crate::image::geom::{Point, Rect};
use crate::image::image_formats::{Image, RgbaBuffer};
use crate::image::palette::{Direction, Palette};
use crate::utils::error::{PaintError, Result};
use crate::utils::log::{debug, warn};

/// Radius change per resize command.
pub const RADIUS_STEP: f64 = 1.0;
/// Paint alpha change per alpha command.
pub const ALPHA_STEP: f32 = 0.01;

/// A normalized pointer sample in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    /// Pressure in `[0, 1]`; 0 means hovering.
    pub pressure: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        PointerSample { x, y, pressure }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Discrete tool and layer commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Radius of every active brush by one step.
    AdjustRadius(Direction),
    /// Paint alpha of every active brush by one step.
    AdjustAlpha(Direction),
    ToggleDrawing,
    ToggleErasing,
    TogglePicking,
    ToggleSmudging,
    /// Palette entry by index.
    SelectColor(usize),
    CycleColor(Direction),
    CycleBlendMode(Direction),
    AddLayer,
    DeleteTopLayer,
    /// Recompose the whole canvas.
    Refresh,
}

/// The aggregate painting state.
#[derive(Debug, Clone)]
pub struct Drawing {
    pointer: Point,
    is_drawing: bool,
    layers: LayerStack,
    brushes: BrushSet,
    color: Color,
    palette: Palette,
    blend_mode: BlendMode,
    radius_max: f64,
    compositor: Compositor,
    raster: RgbaBuffer,
}

impl Drawing {
    /// Creates a drawing with one transparent layer and the configured brush
    /// stored and active.
    pub fn new(config: DrawingConfig) -> Result<Self> {
        config.validate()?;
        let DrawingConfig {
            width,
            height,
            background,
            radius_max,
            channel_order,
            brush,
            palette,
        } = config;

        let mut layers = LayerStack::new(width, height);
        layers.add_top_layer();

        let color = brush.color;
        let blend_mode = brush.mode;
        let mut brushes = BrushSet::new();
        let id = brushes.insert(clamp_radius(brush, radius_max));
        brushes.activate(id)?;

        debug!("created {}x{} drawing", width, height);
        Ok(Drawing {
            pointer: Point::default(),
            is_drawing: false,
            layers,
            brushes,
            color,
            palette,
            blend_mode,
            radius_max,
            compositor: Compositor::new(background, channel_order),
            raster: RgbaBuffer::new(width, height),
        })
    }

    /// Shorthand for [`DrawingBuilder::new`].
    pub fn builder(width: u32, height: u32) -> DrawingBuilder {
        DrawingBuilder::new(width, height)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    /// The last selected or picked color.
    pub fn tool_color(&self) -> Color {
        self.color
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// Direct access to the layers. The raster is not recomposed; call
    /// [`Drawing::update`] or [`Drawing::refresh`] after editing pixels or
    /// opacity through it.
    pub fn layers_mut(&mut self) -> &mut LayerStack {
        &mut self.layers
    }

    pub fn brushes(&self) -> &BrushSet {
        &self.brushes
    }

    pub fn brushes_mut(&mut self) -> &mut BrushSet {
        &mut self.brushes
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// The composed canvas as straight-alpha RGBA8, for export.
    pub fn raster(&self) -> &RgbaBuffer {
        &self.raster
    }

    /// Moves the pointer without painting.
    pub fn pointer_moved(&mut self, position: Point) {
        self.pointer = position;
    }

    /// Handles one pointer sample.
    ///
    /// Samples with a non-finite coordinate are dropped. Otherwise the
    /// pointer always moves to the sample. If drawing is enabled, the
    /// pressure is positive and a layer exists, the segment from the previous
    /// position is stroked and the touched region is recomposed.
    pub fn sample(&mut self, sample: PointerSample) -> Option<Frame> {
        if !(sample.x.is_finite() && sample.y.is_finite()) {
            warn!("dropped sample at ({}, {})", sample.x, sample.y);
            return None;
        }
        let from = self.pointer;
        self.pointer = sample.position();

        if !self.is_drawing || !(sample.pressure > 0.0) {
            return None;
        }
        let pressure = if sample.pressure > 1.0 {
            warn!("pressure {} clamped to 1", sample.pressure);
            1.0
        } else {
            sample.pressure
        };

        let outcome = self.stroke(&Segment::new(from, self.pointer, pressure))?;
        self.compositor
            .update(&self.layers, outcome.invalid, &mut self.raster)
    }

    /// Strokes a segment with every active brush into the current layer.
    ///
    /// Returns `None` if the stack is empty. A picked color becomes the tool
    /// color.
    pub fn stroke(&mut self, segment: &Segment) -> Option<StrokeOutcome> {
        let image = self.layers.current_layer_mut()?.image_mut();
        let mut outcome = StrokeOutcome::default();
        self.brushes.for_each_active(|brush| {
            outcome.merge(stroke_segment(image, brush, segment));
        });
        if let Some(picked) = outcome.picked {
            self.color = picked;
        }
        Some(outcome)
    }

    /// Recomposes `rect` without stroking anything.
    pub fn update(&mut self, rect: Rect) -> Option<Frame> {
        self.compositor.update(&self.layers, rect, &mut self.raster)
    }

    /// Recomposes the whole canvas.
    pub fn refresh(&mut self) -> Option<Frame> {
        let (width, height) = self.dimensions();
        self.update(Rect::new(0, 0, width, height))
    }

    /// Pushes a new transparent layer and makes it current.
    pub fn add_layer(&mut self) -> LayerId {
        self.layers.add_top_layer()
    }

    /// Deletes the top layer and recomposes the whole canvas.
    ///
    /// When the last layer goes, the raster is cleared and strokes are
    /// ignored until a layer is added again.
    pub fn delete_top_layer(&mut self) -> Option<Frame> {
        self.layers.del_top_layer();
        if self.layers.is_empty() {
            debug!("layer stack empty, clearing raster");
            self.raster.clear();
        }
        self.refresh()
    }

    /// Sets the tool color and the paint of every active brush.
    fn set_color(&mut self, color: Color) {
        self.color = color;
        self.brushes.for_each_active(|brush| brush.color = color);
    }

    pub fn select_color(&mut self, index: usize) -> Result<()> {
        let color = self.palette.select(index)?;
        self.set_color(color);
        Ok(())
    }

    /// Steps through the palette; does nothing before a first selection.
    pub fn cycle_color(&mut self, direction: Direction) {
        if let Some(color) = self.palette.cycle(direction) {
            self.set_color(color);
        }
    }

    pub fn cycle_blend_mode(&mut self, direction: Direction) {
        self.blend_mode = match direction {
            Direction::Forward => self.blend_mode.next(),
            Direction::Backward => self.blend_mode.previous(),
        };
        let mode = self.blend_mode;
        self.brushes.for_each_active(|brush| brush.mode = mode);
    }

    pub fn adjust_radius(&mut self, delta: f64) {
        let radius_max = self.radius_max;
        self.brushes
            .for_each_active(|brush| brush.adjust_radius(delta, radius_max));
    }

    pub fn adjust_alpha(&mut self, delta: f32) {
        self.brushes.for_each_active(|brush| brush.adjust_alpha(delta));
    }

    /// Flips the drawing flag and every active brush's drawing flag.
    pub fn toggle_drawing(&mut self) {
        self.is_drawing = !self.is_drawing;
        self.brushes
            .for_each_active(|brush| brush.is_drawing = !brush.is_drawing);
    }

    pub fn toggle_erasing(&mut self) {
        self.brushes
            .for_each_active(|brush| brush.is_erasing = !brush.is_erasing);
    }

    pub fn toggle_picking(&mut self) {
        self.brushes
            .for_each_active(|brush| brush.is_picking = !brush.is_picking);
    }

    /// Flips smudging; brushes that stop smudging get the tool color back.
    pub fn toggle_smudging(&mut self) {
        let color = self.color;
        self.brushes.for_each_active(|brush| {
            brush.is_smudging = !brush.is_smudging;
            if !brush.is_smudging {
                brush.color = color;
            }
        });
    }

    /// Applies a command. Commands that change what is on screen return the
    /// recomposed frame.
    pub fn apply(&mut self, command: Command) -> Result<Option<Frame>> {
        debug!("command {:?}", command);
        let step = |direction: Direction| match direction {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        };
        match command {
            Command::AdjustRadius(d) => self.adjust_radius(step(d) * RADIUS_STEP),
            Command::AdjustAlpha(d) => self.adjust_alpha(step(d) as f32 * ALPHA_STEP),
            Command::ToggleDrawing => self.toggle_drawing(),
            Command::ToggleErasing => self.toggle_erasing(),
            Command::TogglePicking => self.toggle_picking(),
            Command::ToggleSmudging => self.toggle_smudging(),
            Command::SelectColor(index) => self.select_color(index)?,
            Command::CycleColor(d) => self.cycle_color(d),
            Command::CycleBlendMode(d) => self.cycle_blend_mode(d),
            Command::AddLayer => {
                self.add_layer();
            }
            Command::DeleteTopLayer => return Ok(self.delete_top_layer()),
            Command::Refresh => return Ok(self.refresh()),
        }
        Ok(None)
    }

    /// Stores an extra brush and makes it active after the existing ones.
    ///
    /// The radius is clamped to `[0, radius_max]`.
    pub fn add_brush(&mut self, brush: Brush) -> Result<BrushId> {
        let id = self.brushes.insert(clamp_radius(brush, self.radius_max));
        self.brushes.activate(id)?;
        Ok(id)
    }

    /// Sets a layer's opacity, clamped to `[0, 1]`, and recomposes the whole
    /// canvas.
    pub fn set_layer_opacity(&mut self, id: LayerId, opacity: f32) -> Result<Option<Frame>> {
        let layer = self.layers.get_mut(id).ok_or_else(|| {
            PaintError::InvalidArg(format!("no layer with id {}", id.index()))
        })?;
        layer.opacity = opacity.clamp(0.0, 1.0);
        debug!("layer {} opacity {}", id.index(), layer.opacity);
        Ok(self.refresh())
    }

    /// Replaces the current layer's pixels and recomposes the whole canvas.
    pub fn load_image(&mut self, image: Image) -> Result<Option<Frame>> {
        let expected = self.dimensions();
        let actual = image.dimensions();
        if actual != expected {
            return Err(PaintError::DimensionMismatch { expected, actual });
        }
        let layer = self
            .layers
            .current_layer_mut()
            .ok_or(PaintError::NoActiveLayer)?;
        *layer.image_mut() = image;
        debug!("loaded {}x{} image into current layer", actual.0, actual.1);
        Ok(self.refresh())
    }
}

/// Brings a brush radius into `[0, radius_max]`.
fn clamp_radius(mut brush: Brush, radius_max: f64) -> Brush {
    let radius = brush.radius.clamp(0.0, radius_max);
    if radius != brush.radius {
        warn!("brush radius {} clamped to {}", brush.radius, radius);
        brush.radius = radius;
    }
    brush
}
