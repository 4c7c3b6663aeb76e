//! Panel rendering: one egui_plot chart per telemetry panel.
//!
//! egui_plot's own drag, zoom and scroll handling is switched off. Bounds come
//! from the panel's viewport every frame and pointer input is turned into
//! viewport transitions after the plot is shown.

use eframe::egui;
use egui_plot::{Line, LineStyle, Plot, PlotBounds, PlotPoint, PlotPoints, Polygon, Text, VLine};

use crate::app::ApexTraceApp;
use crate::derived::driver_color;
use crate::overlay::PlotFrame;
use crate::panels::{PanelId, PanelView, YScale};
use crate::series::downsample_lttb;
use crate::state::{ACCENT_COLOR, MAX_CHART_POINTS};
use crate::telemetry::Metric;
use crate::ui::{rgb, rgba, CARD_FILL, MUTED_TEXT};
use crate::viewport::{Interaction, PanelViewport};

/// Zoom selection band (accent red, translucent)
const SELECTION_ALPHA: u8 = 40;

/// Crosshair colour
const CROSSHAIR_COLOR: egui::Color32 = egui::Color32::from_rgb(120, 120, 120);

impl ApexTraceApp {
    /// Render the panel stack, or a prompt when nothing is loaded
    pub fn render_panels(&mut self, ui: &mut egui::Ui) {
        if self.composer.analysis().is_none() {
            ui.centered_and_justified(|ui| {
                let text = if self.composer.is_loading() {
                    "Loading telemetry..."
                } else {
                    "Enter a session and drivers, then press ANALYZE"
                };
                ui.label(egui::RichText::new(text).size(20.0).color(egui::Color32::GRAY));
            });
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("panels_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for row in PanelId::layout_rows() {
                    if let [id] = row.as_slice() {
                        self.render_panel(ui, *id);
                        continue;
                    }
                    ui.columns(row.len(), |columns| {
                        for (column, id) in columns.iter_mut().zip(&row) {
                            self.render_panel(column, *id);
                        }
                    });
                }
            });
    }

    /// Downsample a panel's lines into display space once per analysis
    fn prepare_panel_cache(&mut self, id: PanelId) {
        let Some(view) = self.composer.panel(id) else {
            return;
        };
        let y_scale = view.spec.y_scale;
        for series in &view.series {
            let key = (id, series.slot);
            if self.downsample_cache.contains_key(&key) || series.is_empty() {
                continue;
            }
            let display: Vec<[f64; 2]> = series
                .points
                .iter()
                .map(|p| [p[0], y_scale.to_plot(p[1])])
                .collect();
            self.downsample_cache
                .insert(key, downsample_lttb(&display, MAX_CHART_POINTS));
        }
    }

    fn render_panel(&mut self, ui: &mut egui::Ui, id: PanelId) {
        self.prepare_panel_cache(id);

        let (Some(view), Some(viewport)) = (self.composer.panel(id), self.composer.viewport(id))
        else {
            return;
        };

        let mut reset_clicked = false;
        let mut plot_response = None;
        let mut hovered_index = None;

        egui::Frame::NONE
            .fill(CARD_FILL)
            .corner_radius(4)
            .inner_margin(egui::Margin::symmetric(8, 6))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(view.spec.title)
                            .size(12.0)
                            .strong()
                            .color(MUTED_TEXT),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        reset_clicked = ui
                            .add_enabled(viewport.is_zoomed(), egui::Button::new("⟲ Reset").small())
                            .clicked();
                    });
                });

                let shown = self.show_plot(ui, view, viewport);
                hovered_index = shown.inner;
                plot_response = Some(shown);
            });
        ui.add_space(6.0);

        let Some(plot_response) = plot_response else {
            return;
        };

        if let Some(index) = hovered_index {
            self.show_hover_tooltip(&plot_response.response, view, index);
        }

        // Borrows of the composer end here; apply pointer input to the viewport
        if reset_clicked {
            self.composer.reset_panel(id);
        }
        let shift = ui.input(|i| i.modifiers.shift);
        let escape = ui.input(|i| i.key_pressed(egui::Key::Escape));
        if let Some(viewport) = self.composer.viewport_mut(id) {
            if apply_pointer_input(viewport, &plot_response, shift, escape) {
                ui.ctx().request_repaint();
            }
        }
    }

    /// Show the plot for one panel. Returns the hovered sample index.
    fn show_plot(
        &self,
        ui: &mut egui::Ui,
        view: &PanelView,
        viewport: &PanelViewport,
    ) -> egui_plot::PlotResponse<Option<usize>> {
        let id = view.spec.id;
        let y_scale = view.spec.y_scale;
        let visible = viewport.visible();
        let selection = viewport.selection();
        let interacting = viewport.interaction() != Interaction::Idle;
        let axis = self.composer.axis();
        let color_blind_mode = self.settings.color_blind_mode;

        let plot = Plot::new(("panel", id.to_string()))
            .height(view.spec.height)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .allow_axis_zoom_drag(false)
            .show_x(false)
            .show_y(false)
            .x_axis_formatter(|mark, _range| format!("{}", mark.value.round() as i64))
            .y_axis_formatter(move |mark, _range| format_tick(y_scale, mark.value));

        plot.show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [visible.x.min, visible.y.min],
                [visible.x.max, visible.y.max],
            ));

            // Overlays go first so they sit beneath the data lines
            let transform = viewport.transform(plot_frame(plot_ui.transform().frame()));
            for mark in self.composer.paint_overlays(&transform) {
                plot_ui.vline(
                    VLine::new("", mark.value)
                        .color(rgba(mark.line_rgba))
                        .style(LineStyle::Dashed { length: mark.dash })
                        .width(1.0),
                );
                let anchor = PlotPoint::new(
                    transform.pixel_to_x(mark.label_pos.0),
                    transform.pixel_to_y(mark.label_pos.1),
                );
                plot_ui.text(
                    Text::new(
                        "",
                        anchor,
                        egui::RichText::new(&mark.label)
                            .size(10.0)
                            .color(rgba(mark.label_rgba)),
                    )
                    .anchor(egui::Align2::LEFT_TOP),
                );
            }

            // Later drivers are drawn on top of earlier ones
            for series in &view.series {
                if let Some(points) = self.downsample_cache.get(&(id, series.slot)) {
                    let plot_points: PlotPoints = points.iter().copied().collect();
                    plot_ui.line(
                        Line::new(series.driver.as_str(), plot_points)
                            .color(rgb(driver_color(series.slot, color_blind_mode)))
                            .width(1.5),
                    );
                }
            }

            if let Some(range) = selection {
                let band = vec![
                    [range.min, visible.y.min],
                    [range.max, visible.y.min],
                    [range.max, visible.y.max],
                    [range.min, visible.y.max],
                ];
                let [r, g, b] = ACCENT_COLOR;
                plot_ui.polygon(
                    Polygon::new("", band)
                        .fill_color(egui::Color32::from_rgba_unmultiplied(r, g, b, SELECTION_ALPHA))
                        .stroke(egui::Stroke::new(1.0, rgb(ACCENT_COLOR))),
                );
            }

            // Crosshair at the reference sample nearest the pointer
            if interacting {
                return None;
            }
            let index = plot_ui
                .pointer_coordinate()
                .and_then(|pointer| axis.hover_index(pointer.x))?;
            if let Some(x) = axis.distance.get(index) {
                plot_ui.vline(VLine::new("", *x).color(CROSSHAIR_COLOR).width(1.0));
            }
            Some(index)
        })
    }

    /// Tooltip listing every driver's value at the hovered sample index
    fn show_hover_tooltip(&self, response: &egui::Response, view: &PanelView, index: usize) {
        let axis = self.composer.axis();
        let color_blind_mode = self.settings.color_blind_mode;
        let metric = view.spec.metric;

        let _ = response.clone().on_hover_ui_at_pointer(|ui| {
            if let Some(label) = axis.label(index) {
                ui.label(egui::RichText::new(format!("{} m", label)).color(MUTED_TEXT));
            }
            for series in &view.series {
                let Some(value) = series.value_at(index) else {
                    continue;
                };
                let mut text = format!("{}: {}", series.driver, format_value(metric, value));
                if let Some(gear) = view
                    .secondary
                    .iter()
                    .find(|s| s.slot == series.slot)
                    .and_then(|s| s.value_at(index))
                {
                    text.push_str(&format!("  (Gear {:.0})", gear));
                }
                ui.label(
                    egui::RichText::new(text)
                        .monospace()
                        .color(rgb(driver_color(series.slot, color_blind_mode))),
                );
            }
        });
    }
}

/// Translate this frame's pointer input on a plot into viewport transitions.
///
/// Returns true if the viewport changed and the panel should repaint.
fn apply_pointer_input(
    viewport: &mut PanelViewport,
    plot_response: &egui_plot::PlotResponse<Option<usize>>,
    shift: bool,
    escape: bool,
) -> bool {
    let response = &plot_response.response;
    let transform = &plot_response.transform;
    let pointer_x = response
        .interact_pointer_pos()
        .or_else(|| response.hover_pos())
        .map(|pos| transform.value_from_position(pos).x);

    if escape && viewport.interaction() != Interaction::Idle {
        viewport.cancel();
        return true;
    }

    let mut changed = false;
    if response.drag_started_by(egui::PointerButton::Primary) {
        changed |= if shift {
            viewport.begin_pan()
        } else {
            pointer_x.is_some_and(|x| viewport.begin_zoom(x))
        };
    }

    if response.dragged_by(egui::PointerButton::Primary) {
        match viewport.interaction() {
            Interaction::Dragging { .. } => {
                if let Some(x) = pointer_x {
                    viewport.drag_to(x);
                    changed = true;
                }
            }
            Interaction::Panning => {
                viewport.pan_by_pixels(response.drag_delta().x, transform.frame().width());
                changed = true;
            }
            Interaction::Idle => {}
        }
    }

    if response.drag_stopped() {
        if viewport.release() {
            tracing::debug!("Zoomed to {:?}", viewport.visible().x);
        }
        changed = true;
    }

    changed
}

fn plot_frame(rect: &egui::Rect) -> PlotFrame {
    PlotFrame {
        left: rect.left(),
        right: rect.right(),
        top: rect.top(),
        bottom: rect.bottom(),
    }
}

/// Y tick label in data units (undoing any axis inversion)
fn format_tick(y_scale: YScale, plotted: f64) -> String {
    let value = y_scale.from_plot(plotted);
    // Avoid "-0" on the inverted axis
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn format_value(metric: Metric, value: f64) -> String {
    let formatted = match metric {
        Metric::DeltaToPole | Metric::LongG => format!("{:+.3}", value),
        Metric::Rpm => format!("{:.0}", value),
        _ => format!("{:.1}", value),
    };
    let unit = metric.unit();
    if unit.is_empty() {
        formatted
    } else {
        format!("{} {}", formatted, unit)
    }
}
