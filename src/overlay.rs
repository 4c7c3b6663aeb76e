//! Pre-paint overlays drawn beneath each panel's data lines.
//!
//! A chart surface hands every registered [`PrePaintExtension`] its live
//! [`AxisTransform`] on each repaint, so overlay positions follow zoom and pan
//! without any caching. The [`SectorOverlay`] marks sector boundaries.

use crate::series::ReferencePolicy;
use crate::telemetry::{ActiveDriverSet, TelemetryBundle};

/// Sector boundaries as fractions of the reference lap distance.
///
/// The analysis service does not report per-circuit sector distances, so the
/// lap is split at fixed fractions.
pub const SECTOR_SPLITS: &[(f64, &str)] = &[(0.33, "S1"), (0.66, "S2")];

/// Pixel offset of a boundary label from the line and the top of the plot
pub const LABEL_OFFSET: (f32, f32) = (5.0, 10.0);

/// Dash length of boundary lines in pixels
pub const BOUNDARY_DASH: f32 = 5.0;

/// Boundary line colour (white at 15% opacity)
pub const BOUNDARY_LINE_RGBA: [u8; 4] = [255, 255, 255, 38];

/// Boundary label colour (white at 40% opacity)
pub const BOUNDARY_LABEL_RGBA: [u8; 4] = [255, 255, 255, 102];

/// Pixel rectangle of a plot's data area
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotFrame {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl PlotFrame {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Whether a horizontal pixel position lies inside the frame (edges included)
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }
}

/// Live data-to-pixel mapping of a chart surface
pub trait AxisTransform {
    fn x_to_pixel(&self, x: f64) -> f32;
    fn y_to_pixel(&self, y: f64) -> f32;
    fn frame(&self) -> PlotFrame;
}

/// Domain data an extension may read while painting
#[derive(Clone, Copy)]
pub struct OverlayContext<'a> {
    pub bundle: Option<&'a TelemetryBundle>,
    pub active: &'a ActiveDriverSet,
    pub reference: &'a ReferencePolicy,
}

/// A vertical dashed marker with a label near the top of the plot
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayMark {
    pub label: String,
    /// Position on the distance axis
    pub value: f64,
    /// Horizontal pixel position of the line
    pub pixel_x: f32,
    /// Line spans the full plot height
    pub top: f32,
    pub bottom: f32,
    /// Top-left pixel position of the label text
    pub label_pos: (f32, f32),
    pub dash: f32,
    pub line_rgba: [u8; 4],
    pub label_rgba: [u8; 4],
}

/// Draw routine a chart surface invokes right before painting its data layers
pub trait PrePaintExtension {
    fn id(&self) -> &str;

    /// Marks to paint for the current transform. Must never fail; return an
    /// empty list when there is nothing to draw.
    fn pre_paint(&self, ctx: &OverlayContext<'_>, transform: &dyn AxisTransform) -> Vec<OverlayMark>;
}

/// Sector boundary markers computed from the reference driver's lap distance
#[derive(Clone, Debug, PartialEq)]
pub struct SectorOverlay {
    splits: Vec<(f64, String)>,
}

impl Default for SectorOverlay {
    fn default() -> Self {
        Self {
            splits: SECTOR_SPLITS
                .iter()
                .map(|(fraction, label)| (*fraction, label.to_string()))
                .collect(),
        }
    }
}

impl SectorOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boundary positions for a lap of `total_length` metres
    pub fn boundaries(&self, total_length: f64) -> Vec<(f64, &str)> {
        self.splits
            .iter()
            .map(|(fraction, label)| (total_length * fraction, label.as_str()))
            .collect()
    }
}

impl PrePaintExtension for SectorOverlay {
    fn id(&self) -> &str {
        "sector_lines"
    }

    fn pre_paint(&self, ctx: &OverlayContext<'_>, transform: &dyn AxisTransform) -> Vec<OverlayMark> {
        let Some(bundle) = ctx.bundle else {
            return Vec::new();
        };
        if ctx.active.is_empty() {
            return Vec::new();
        }
        let Some(total_length) = ctx
            .reference
            .resolve(ctx.active, bundle)
            .and_then(|(_, record)| record.total_distance())
        else {
            return Vec::new();
        };

        let frame = transform.frame();
        self.boundaries(total_length)
            .into_iter()
            .filter_map(|(value, label)| {
                let pixel_x = transform.x_to_pixel(value);
                // Boundaries scrolled out of view by zoom or pan are not drawn
                if !pixel_x.is_finite() || !frame.contains_x(pixel_x) {
                    return None;
                }
                Some(OverlayMark {
                    label: label.to_string(),
                    value,
                    pixel_x,
                    top: frame.top,
                    bottom: frame.bottom,
                    label_pos: (pixel_x + LABEL_OFFSET.0, frame.top + LABEL_OFFSET.1),
                    dash: BOUNDARY_DASH,
                    line_rgba: BOUNDARY_LINE_RGBA,
                    label_rgba: BOUNDARY_LABEL_RGBA,
                })
            })
            .collect()
    }
}
