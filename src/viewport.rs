//! Per-panel zoom/pan state and the reset registry.
//!
//! Each panel owns one [`PanelViewport`]: a home range (the full data extent)
//! and a visible range changed by drag-to-zoom and shift-drag panning on the
//! distance axis. Panels never share a transform; "reset all" simply resets
//! every registered handle.

use std::collections::BTreeMap;

use crate::overlay::{AxisTransform, PlotFrame};

/// Narrowest zoom selection accepted, in data units. Anything smaller is
/// treated as a click rather than a drag.
pub const MIN_ZOOM_SPAN: f64 = 1e-6;

/// Closed interval on one axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Build a range from two endpoints in either order
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Widen by `fraction` of the width on each side. A zero-width range is
    /// widened by one unit each side so it still has extent.
    pub fn padded(&self, fraction: f64) -> Self {
        let width = self.width();
        let pad = if width.abs() < f64::EPSILON {
            1.0
        } else {
            width * fraction
        };
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Tight range over finite values, `None` if there are none
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Self>, v| match acc {
                Some(r) => Some(Self {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
                None => Some(Self { min: v, max: v }),
            })
    }
}

/// Visible x and y ranges of a panel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBounds {
    pub x: AxisRange,
    pub y: AxisRange,
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            x: AxisRange::new(0.0, 1.0),
            y: AxisRange::new(0.0, 1.0),
        }
    }
}

/// Pointer interaction in progress on a panel
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Drag-select zoom between `anchor` and `current` (data x)
    Dragging { anchor: f64, current: f64 },
    /// Modifier-drag panning
    Panning,
}

/// Zoom/pan state of one panel
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanelViewport {
    home: ViewBounds,
    visible: ViewBounds,
    interaction: Interaction,
}

impl PanelViewport {
    pub fn new(home: ViewBounds) -> Self {
        Self {
            home,
            visible: home,
            interaction: Interaction::Idle,
        }
    }

    /// Full-data bounds restored by reset
    pub fn home(&self) -> ViewBounds {
        self.home
    }

    /// Currently visible bounds
    pub fn visible(&self) -> ViewBounds {
        self.visible
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn is_zoomed(&self) -> bool {
        self.visible != self.home
    }

    /// Replace the home bounds (new data) and show them
    pub fn set_home(&mut self, home: ViewBounds) {
        self.home = home;
        self.reset();
    }

    /// Start a drag-select zoom at data x. Ignored unless idle.
    pub fn begin_zoom(&mut self, x: f64) -> bool {
        if self.interaction != Interaction::Idle {
            return false;
        }
        self.interaction = Interaction::Dragging {
            anchor: x,
            current: x,
        };
        true
    }

    /// Move the free end of the zoom selection
    pub fn drag_to(&mut self, x: f64) {
        if let Interaction::Dragging { current, .. } = &mut self.interaction {
            *current = x;
        }
    }

    /// Span currently selected by a zoom drag
    pub fn selection(&self) -> Option<AxisRange> {
        match self.interaction {
            Interaction::Dragging { anchor, current } => Some(AxisRange::new(anchor, current)),
            _ => None,
        }
    }

    /// Start panning. Ignored unless idle.
    pub fn begin_pan(&mut self) -> bool {
        if self.interaction != Interaction::Idle {
            return false;
        }
        self.interaction = Interaction::Panning;
        true
    }

    /// Shift the visible x range by a data-space delta while panning
    pub fn pan_by(&mut self, dx: f64) {
        if self.interaction == Interaction::Panning && dx.is_finite() {
            self.visible.x = self.visible.x.shifted(dx);
        }
    }

    /// Shift the visible x range by a pointer movement in pixels.
    ///
    /// Content follows the pointer, so moving right reveals smaller distances.
    pub fn pan_by_pixels(&mut self, delta_px: f32, frame_width_px: f32) {
        if frame_width_px <= 0.0 {
            return;
        }
        let dx = -(delta_px as f64) * self.visible.x.width() / frame_width_px as f64;
        self.pan_by(dx);
    }

    /// Pointer released: apply a zoom selection or end a pan.
    ///
    /// Returns true if the visible range changed.
    pub fn release(&mut self) -> bool {
        let interaction = std::mem::take(&mut self.interaction);
        match interaction {
            Interaction::Dragging { anchor, current } => {
                let span = AxisRange::new(anchor, current);
                if span.width() > MIN_ZOOM_SPAN {
                    self.visible.x = span;
                    true
                } else {
                    false
                }
            }
            Interaction::Panning | Interaction::Idle => false,
        }
    }

    /// Drop any in-progress interaction without applying it
    pub fn cancel(&mut self) {
        self.interaction = Interaction::Idle;
    }

    /// Restore the full-data range
    pub fn reset(&mut self) {
        self.visible = self.home;
        self.interaction = Interaction::Idle;
    }

    /// Data-to-pixel mapping of the visible bounds onto a plot frame
    pub fn transform(&self, frame: PlotFrame) -> ViewportTransform {
        ViewportTransform {
            bounds: self.visible,
            frame,
        }
    }
}

/// Linear mapping from visible bounds onto a pixel frame (y grows downwards)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    pub bounds: ViewBounds,
    pub frame: PlotFrame,
}

impl ViewportTransform {
    /// Inverse of [`AxisTransform::x_to_pixel`]
    pub fn pixel_to_x(&self, px: f32) -> f64 {
        let width = self.frame.width() as f64;
        if width <= 0.0 {
            return self.bounds.x.min;
        }
        self.bounds.x.min + (px - self.frame.left) as f64 / width * self.bounds.x.width()
    }

    /// Inverse of [`AxisTransform::y_to_pixel`]
    pub fn pixel_to_y(&self, py: f32) -> f64 {
        let height = self.frame.height() as f64;
        if height <= 0.0 {
            return self.bounds.y.min;
        }
        self.bounds.y.min + (self.frame.bottom - py) as f64 / height * self.bounds.y.width()
    }
}

impl AxisTransform for ViewportTransform {
    fn x_to_pixel(&self, x: f64) -> f32 {
        let range = self.bounds.x;
        let t = (x - range.min) / range.width();
        self.frame.left + (t * self.frame.width() as f64) as f32
    }

    fn y_to_pixel(&self, y: f64) -> f32 {
        let range = self.bounds.y;
        let t = (y - range.min) / range.width();
        self.frame.bottom - (t * self.frame.height() as f64) as f32
    }

    fn frame(&self) -> PlotFrame {
        self.frame
    }
}

// ============================================================================
// Reset registry
// ============================================================================

/// Something that can be restored to its initial view
pub trait ResetHandle {
    fn reset(&mut self);
}

impl ResetHandle for PanelViewport {
    fn reset(&mut self) {
        PanelViewport::reset(self);
    }
}

/// Panel identifier -> reset-capable handle
#[derive(Clone, Debug)]
pub struct ViewportRegistry<K, H = PanelViewport> {
    handles: BTreeMap<K, H>,
}

impl<K, H> Default for ViewportRegistry<K, H> {
    fn default() -> Self {
        Self {
            handles: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy + std::fmt::Debug, H: ResetHandle> ViewportRegistry<K, H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle, returning any handle it replaced
    pub fn register(&mut self, id: K, handle: H) -> Option<H> {
        self.handles.insert(id, handle)
    }

    pub fn get(&self, id: K) -> Option<&H> {
        self.handles.get(&id)
    }

    pub fn get_mut(&mut self, id: K) -> Option<&mut H> {
        self.handles.get_mut(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = K> + '_ {
        self.handles.keys().copied()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut H)> {
        self.handles.iter_mut().map(|(k, h)| (*k, h))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Reset one panel. Returns false if no such panel is registered.
    pub fn reset(&mut self, id: K) -> bool {
        match self.handles.get_mut(&id) {
            Some(handle) => {
                tracing::debug!("Resetting viewport {:?}", id);
                handle.reset();
                true
            }
            None => false,
        }
    }

    /// Reset every registered panel
    pub fn reset_all(&mut self) {
        for handle in self.handles.values_mut() {
            handle.reset();
        }
    }
}
