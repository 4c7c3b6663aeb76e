//! Panel composer: the six fixed telemetry panels and the state they share.
//!
//! The composer owns the fetch lifecycle, one viewport per panel, the shared
//! distance axis taken from the reference driver, and the registered pre-paint
//! extensions. The UI layer only reads [`PanelView`]s and forwards pointer
//! interactions to the panel viewports.

use std::collections::BTreeMap;

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::client::{AnalysisRequest, FetchReply};
use crate::derived::{summarize, DriverSummary};
use crate::overlay::{AxisTransform, OverlayContext, OverlayMark, PrePaintExtension, SectorOverlay};
use crate::series::{axis_labels, build_series, nearest_index, DriverSeries, ReferencePolicy};
use crate::state::{Analysis, AnalysisState, ComposerError, RequestId};
use crate::telemetry::{ActiveDriverSet, DriverCode, Metric};
use crate::viewport::{AxisRange, PanelViewport, ViewBounds, ViewportRegistry};

/// Fraction of the data range added above and below auto-scaled panels
pub const Y_PADDING: f64 = 0.05;

/// Fixed y range of the pedal panels, leaving room for overshoot past 100%
pub const PEDAL_RANGE: (f64, f64) = (0.0, 105.0);

// ============================================================================
// Panel definitions
// ============================================================================

/// Identifier of one of the fixed panels, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PanelId {
    Delta,
    Speed,
    Throttle,
    Brake,
    Rpm,
    LongG,
}

/// How a panel's y-axis is scaled
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum YScale {
    /// Fit to the data range
    Auto,
    /// Always show the same range
    Fixed { min: f64, max: f64 },
    /// Fit to the data with larger values drawn lower
    Inverted,
}

impl YScale {
    /// Data value -> plotted value
    pub fn to_plot(&self, value: f64) -> f64 {
        match self {
            YScale::Inverted => -value,
            _ => value,
        }
    }

    /// Plotted value (or axis mark) -> data value
    pub fn from_plot(&self, value: f64) -> f64 {
        self.to_plot(value)
    }

    /// Full-data y range in plotted coordinates
    pub fn home_range<'a>(&self, series: impl IntoIterator<Item = &'a DriverSeries>) -> AxisRange {
        if let YScale::Fixed { min, max } = *self {
            return AxisRange::new(min, max);
        }
        AxisRange::from_values(
            series
                .into_iter()
                .flat_map(|s| s.points.iter().map(|p| self.to_plot(p[1]))),
        )
        .map(|range| range.padded(Y_PADDING))
        .unwrap_or_else(|| AxisRange::new(0.0, 1.0))
    }
}

/// Static description of a panel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelSpec {
    pub id: PanelId,
    pub title: &'static str,
    pub metric: Metric,
    /// Extra metric shown in the hover tooltip only
    pub secondary: Option<Metric>,
    pub y_scale: YScale,
    /// Plot height in points
    pub height: f32,
    /// Shares a row with the next half-width panel
    pub half_width: bool,
}

impl PanelId {
    pub fn spec(self) -> PanelSpec {
        let (title, metric, secondary, y_scale, height, half_width) = match self {
            PanelId::Delta => (
                "DELTA TO POLE (SEC)",
                Metric::DeltaToPole,
                None,
                YScale::Inverted,
                180.0,
                false,
            ),
            PanelId::Speed => ("SPEED (KM/H)", Metric::Speed, None, YScale::Auto, 200.0, false),
            PanelId::Throttle => (
                "THROTTLE (%)",
                Metric::Throttle,
                None,
                YScale::Fixed {
                    min: PEDAL_RANGE.0,
                    max: PEDAL_RANGE.1,
                },
                180.0,
                false,
            ),
            PanelId::Brake => (
                "BRAKE PRESSURE (%)",
                Metric::Brake,
                None,
                YScale::Fixed {
                    min: PEDAL_RANGE.0,
                    max: PEDAL_RANGE.1,
                },
                180.0,
                false,
            ),
            PanelId::Rpm => ("RPM & GEAR", Metric::Rpm, Some(Metric::Gear), YScale::Auto, 150.0, true),
            PanelId::LongG => ("LONGITUDINAL G", Metric::LongG, None, YScale::Auto, 150.0, true),
        };
        PanelSpec {
            id: self,
            title,
            metric,
            secondary,
            y_scale,
            height,
            half_width,
        }
    }

    /// Panels grouped into display rows: full-width panels alone, consecutive
    /// half-width panels paired side by side
    pub fn layout_rows() -> Vec<Vec<PanelId>> {
        let mut rows: Vec<Vec<PanelId>> = Vec::new();
        let mut open_half = false;
        for id in PanelId::iter() {
            if !id.spec().half_width {
                rows.push(vec![id]);
                open_half = false;
                continue;
            }
            match rows.last_mut() {
                Some(row) if open_half => {
                    row.push(id);
                    open_half = false;
                }
                _ => {
                    rows.push(vec![id]);
                    open_half = true;
                }
            }
        }
        rows
    }
}

/// Distance axis shared by every panel, taken from the reference driver
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistanceAxis {
    pub reference: Option<DriverCode>,
    pub distance: Vec<f64>,
    /// Reference distance samples rounded to whole metres
    pub labels: Vec<i64>,
}

impl DistanceAxis {
    /// Sample index under a pointer at data x. Every series in a panel is read
    /// at this same index.
    pub fn hover_index(&self, x: f64) -> Option<usize> {
        nearest_index(&self.distance, x)
    }

    pub fn label(&self, index: usize) -> Option<i64> {
        self.labels.get(index).copied()
    }
}

/// Render-ready content of one panel
#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub spec: PanelSpec,
    /// One series per active driver, in set order
    pub series: Vec<DriverSeries>,
    /// Tooltip-only series for [`PanelSpec::secondary`]
    pub secondary: Vec<DriverSeries>,
}

// ============================================================================
// Composer
// ============================================================================

/// Owner of the analysis state, the six panels and their viewports
pub struct PanelComposer {
    state: AnalysisState,
    viewports: ViewportRegistry<PanelId>,
    views: BTreeMap<PanelId, PanelView>,
    axis: DistanceAxis,
    extensions: Vec<Box<dyn PrePaintExtension>>,
    reference: ReferencePolicy,
    next_request: u64,
}

impl Default for PanelComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelComposer {
    /// Composer with every panel registered and the sector overlay installed
    pub fn new() -> Self {
        let mut viewports = ViewportRegistry::new();
        for id in PanelId::iter() {
            viewports.register(id, PanelViewport::new(ViewBounds::default()));
        }
        Self {
            state: AnalysisState::default(),
            viewports,
            views: BTreeMap::new(),
            axis: DistanceAxis::default(),
            extensions: vec![Box::new(SectorOverlay::new())],
            reference: ReferencePolicy::default(),
            next_request: 1,
        }
    }

    // ------------------------------------------------------------------------
    // Fetch lifecycle
    // ------------------------------------------------------------------------

    /// Start a fetch, returning the id the reply must carry.
    ///
    /// Rejected while another fetch is in flight.
    pub fn begin_fetch(&mut self, request: AnalysisRequest) -> Result<RequestId, ComposerError> {
        let id = RequestId(self.next_request);
        self.state.fetch_start(id, request)?;
        self.next_request += 1;
        Ok(id)
    }

    /// Apply a worker reply. Stale replies are rejected and change nothing.
    pub fn complete_fetch(&mut self, reply: FetchReply) -> Result<(), ComposerError> {
        match reply.result {
            Ok(payload) => {
                let analysis = self.state.fetch_success(reply.id, payload)?;
                tracing::info!(
                    "Loaded analysis {:?}: {} drivers in bundle, {} active",
                    reply.id,
                    analysis.bundle.len(),
                    analysis.active.len()
                );
                let missing = analysis.active.missing_from(&analysis.bundle);
                if !missing.is_empty() {
                    let codes: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
                    tracing::warn!("No telemetry returned for: {}", codes.join(", "));
                }
                for (_, code, record) in analysis.active.present_in(&analysis.bundle) {
                    tracing::info!(
                        "{}: {} samples",
                        code,
                        record.distance().map_or(0, <[f64]>::len)
                    );
                    if !record.distance_is_monotonic() {
                        tracing::warn!("Distance trace for {} goes backwards", code);
                    }
                    let misaligned = record.misaligned_metrics();
                    if !misaligned.is_empty() {
                        tracing::warn!(
                            "Inconsistent telemetry lengths for {}: {}",
                            code,
                            misaligned.join(", ")
                        );
                    }
                }
            }
            Err(error) => {
                self.state.fetch_error(reply.id, &error)?;
            }
        }
        self.rebuild();
        Ok(())
    }

    /// Recompute every panel and the shared axis from the current analysis.
    /// New data always starts at the full range.
    fn rebuild(&mut self) {
        self.views.clear();
        self.axis = DistanceAxis::default();

        let Some(analysis) = self.state.analysis() else {
            for (_, viewport) in self.viewports.iter_mut() {
                viewport.set_home(ViewBounds::default());
            }
            return;
        };

        self.axis = distance_axis(analysis, &self.reference);
        for id in PanelId::iter() {
            let spec = id.spec();
            let series = build_series(&analysis.bundle, &analysis.active, spec.metric);
            let secondary = spec
                .secondary
                .map(|metric| build_series(&analysis.bundle, &analysis.active, metric))
                .unwrap_or_default();

            let home = ViewBounds {
                x: AxisRange::from_values(series.iter().flat_map(|s| s.points.iter().map(|p| p[0])))
                    .unwrap_or_else(|| AxisRange::new(0.0, 1.0)),
                y: spec.y_scale.home_range(&series),
            };
            if let Some(viewport) = self.viewports.get_mut(id) {
                viewport.set_home(home);
            }

            self.views.insert(
                id,
                PanelView {
                    spec,
                    series,
                    secondary,
                },
            );
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.state.analysis()
    }

    pub fn active_drivers(&self) -> Option<&ActiveDriverSet> {
        self.state.analysis().map(|a| &a.active)
    }

    /// Requested drivers the last bundle had no data for
    pub fn missing_drivers(&self) -> Vec<DriverCode> {
        self.state
            .analysis()
            .map(|a| a.active.missing_from(&a.bundle).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------------

    /// Render-ready panel, `None` until an analysis is loaded
    pub fn panel(&self, id: PanelId) -> Option<&PanelView> {
        self.views.get(&id)
    }

    /// All loaded panels in display order
    pub fn panels(&self) -> impl Iterator<Item = &PanelView> {
        self.views.values()
    }

    pub fn axis(&self) -> &DistanceAxis {
        &self.axis
    }

    /// Timing board rows for the active drivers present in the bundle
    pub fn summary(&self) -> Vec<DriverSummary> {
        self.state.analysis().map(summarize).unwrap_or_default()
    }

    pub fn reference(&self) -> &ReferencePolicy {
        &self.reference
    }

    /// Change the reference driver. Only the shared axis is recomputed;
    /// overlays pick the new reference up on their next paint.
    pub fn set_reference(&mut self, reference: ReferencePolicy) {
        self.reference = reference;
        self.axis = self
            .state
            .analysis()
            .map(|analysis| distance_axis(analysis, &self.reference))
            .unwrap_or_default();
    }

    // ------------------------------------------------------------------------
    // Viewports
    // ------------------------------------------------------------------------

    pub fn viewport(&self, id: PanelId) -> Option<&PanelViewport> {
        self.viewports.get(id)
    }

    pub fn viewport_mut(&mut self, id: PanelId) -> Option<&mut PanelViewport> {
        self.viewports.get_mut(id)
    }

    pub fn reset_panel(&mut self, id: PanelId) -> bool {
        self.viewports.reset(id)
    }

    pub fn reset_all(&mut self) {
        self.viewports.reset_all();
    }

    // ------------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------------

    /// Install another pre-paint extension on every panel
    pub fn add_extension(&mut self, extension: Box<dyn PrePaintExtension>) {
        self.extensions.push(extension);
    }

    pub fn extension_ids(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(|e| e.id())
    }

    /// Marks every extension wants painted beneath a panel's data this frame
    pub fn paint_overlays(&self, transform: &dyn AxisTransform) -> Vec<OverlayMark> {
        let empty = ActiveDriverSet::default();
        let analysis = self.state.analysis();
        let ctx = OverlayContext {
            bundle: analysis.map(|a| &a.bundle),
            active: analysis.map(|a| &a.active).unwrap_or(&empty),
            reference: &self.reference,
        };
        self.extensions
            .iter()
            .flat_map(|extension| extension.pre_paint(&ctx, transform))
            .collect()
    }
}

fn distance_axis(analysis: &Analysis, reference: &ReferencePolicy) -> DistanceAxis {
    match reference.resolve(&analysis.active, &analysis.bundle) {
        Some((code, record)) => {
            let distance = record.distance().map(<[f64]>::to_vec).unwrap_or_default();
            DistanceAxis {
                reference: Some(code.clone()),
                labels: axis_labels(&distance),
                distance,
            }
        }
        None => DistanceAxis::default(),
    }
}
