//! Side board: lap & tyres, weather, and AI insights.

use eframe::egui;

use crate::app::ApexTraceApp;
use crate::derived::{driver_color, format_time, DriverSummary};
use crate::telemetry::Weather;
use crate::ui::{rgb, CARD_FILL, MUTED_TEXT};

/// Shown when the service returned no insights
const NO_INSIGHTS: &str = "Add 2+ drivers for AI comparison.";

const RAIN_COLOR: [u8; 3] = [54, 162, 235];

impl ApexTraceApp {
    pub fn render_board(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("board_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add_space(8.0);
                self.render_lap_board(ui);
                ui.add_space(12.0);

                let Some(analysis) = self.composer.analysis() else {
                    return;
                };
                render_weather(ui, &analysis.session.weather);
                ui.add_space(12.0);
                render_insights(ui, &analysis.session.ai_insights);
            });
    }

    fn render_lap_board(&self, ui: &mut egui::Ui) {
        section_title(ui, "LAP & TYRES");

        let rows = self.composer.summary();
        if rows.is_empty() {
            ui.label(egui::RichText::new("No lap data loaded").color(MUTED_TEXT));
            return;
        }

        for row in &rows {
            render_driver_card(ui, row, self.settings.color_blind_mode);
            ui.add_space(6.0);
        }

        if let Some(pole) = self.composer.analysis().map(|a| a.session.pole_lap_time) {
            ui.label(
                egui::RichText::new(format!("Pole: {}", format_time(Some(pole))))
                    .size(11.0)
                    .color(MUTED_TEXT),
            );
        }
    }
}

fn section_title(ui: &mut egui::Ui, title: &str) {
    ui.label(egui::RichText::new(title).size(12.0).strong().color(MUTED_TEXT));
    ui.separator();
}

fn render_driver_card(ui: &mut egui::Ui, row: &DriverSummary, color_blind_mode: bool) {
    egui::Frame::NONE
        .fill(CARD_FILL)
        .corner_radius(4)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(row.driver.as_str())
                        .size(16.0)
                        .strong()
                        .color(rgb(driver_color(row.slot, color_blind_mode))),
                );
                ui.label(egui::RichText::new(&row.lap_time).size(15.0).monospace());
                ui.label(
                    egui::RichText::new(row.delta.to_string())
                        .size(13.0)
                        .strong()
                        .color(rgb(row.delta.color())),
                );
            });

            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(&row.tyre_initial)
                        .strong()
                        .color(rgb(row.tyre_color)),
                );
                ui.label(
                    egui::RichText::new(format!("{} Laps", row.tyre_age))
                        .size(11.0)
                        .color(MUTED_TEXT),
                );
            });

            ui.horizontal(|ui| {
                for (i, (value, class)) in row.sectors.iter().enumerate() {
                    ui.label(
                        egui::RichText::new(format!("S{}:{:.3}", i + 1, value))
                            .size(11.0)
                            .monospace()
                            .color(rgb(class.color())),
                    );
                }
            });
        });
}

fn render_weather(ui: &mut egui::Ui, weather: &Weather) {
    section_title(ui, "WEATHER");

    egui::Grid::new("weather_grid")
        .num_columns(2)
        .spacing([16.0, 4.0])
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Track").color(MUTED_TEXT));
            ui.label(format!("{:.1}°C", weather.track_temp));
            ui.end_row();

            ui.label(egui::RichText::new("Air").color(MUTED_TEXT));
            ui.label(format!("{:.1}°C", weather.air_temp));
            ui.end_row();

            ui.label(egui::RichText::new("Humidity").color(MUTED_TEXT));
            ui.label(format!("{:.0}%", weather.humidity));
            ui.end_row();

            ui.label(egui::RichText::new("Rain").color(MUTED_TEXT));
            if weather.rain {
                ui.label(egui::RichText::new("YES").strong().color(rgb(RAIN_COLOR)));
            } else {
                ui.label("NO");
            }
            ui.end_row();
        });
}

fn render_insights(ui: &mut egui::Ui, insights: &[String]) {
    section_title(ui, "AI ENGINEER");

    if insights.is_empty() {
        ui.label(egui::RichText::new(NO_INSIGHTS).italics().color(MUTED_TEXT));
        return;
    }

    for insight in insights {
        ui.horizontal_wrapped(|ui| {
            ui.label(egui::RichText::new("▸").color(MUTED_TEXT));
            ui.label(insight);
        });
        ui.add_space(4.0);
    }
}
