//! Header, request form and error banner.

use eframe::egui;

use crate::app::ApexTraceApp;
use crate::series::ReferencePolicy;
use crate::state::ACCENT_COLOR;
use crate::ui::{rgb, MUTED_TEXT};

/// Usage hint shown in the header
const INTERACTION_HINT: &str = "Drag to Zoom | Shift + Drag to Pan";

impl ApexTraceApp {
    /// Title, usage hint, colour mode and the global reset
    pub fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("APEXTRACE")
                    .size(20.0)
                    .strong()
                    .color(rgb(ACCENT_COLOR)),
            );
            ui.label(egui::RichText::new("QUALIFYING TELEMETRY").size(12.0).color(MUTED_TEXT));
            ui.add_space(12.0);
            ui.label(egui::RichText::new(INTERACTION_HINT).size(11.0).color(MUTED_TEXT));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let has_panels = self.composer.analysis().is_some();
                if ui
                    .add_enabled(has_panels, egui::Button::new("⟲ Reset All"))
                    .on_hover_text("Restore the full lap on every panel")
                    .clicked()
                {
                    self.composer.reset_all();
                }

                if ui
                    .checkbox(&mut self.settings.color_blind_mode, "Color blind palette")
                    .changed()
                {
                    self.save_settings();
                }

                self.render_reference_picker(ui);
            });
        });
    }

    /// Which driver's distance trace labels the axis and places sector lines
    fn render_reference_picker(&mut self, ui: &mut egui::Ui) {
        let Some(active) = self.composer.active_drivers() else {
            return;
        };

        let current = self
            .composer
            .axis()
            .reference
            .as_ref()
            .map_or_else(|| "-".to_string(), |code| code.to_string());
        let mut selected = self.composer.reference().clone();

        egui::ComboBox::from_id_salt("reference_driver")
            .selected_text(format!("Reference: {}", current))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selected, ReferencePolicy::FirstActive, "First driver");
                for code in active.iter() {
                    ui.selectable_value(
                        &mut selected,
                        ReferencePolicy::Driver(code.clone()),
                        code.as_str(),
                    );
                }
            });

        if &selected != self.composer.reference() {
            self.composer.set_reference(selected);
        }
    }

    /// Year, race and drivers inputs plus the submit button
    pub fn render_controls(&mut self, ui: &mut egui::Ui) {
        let loading = self.composer.is_loading();
        let mut submit = false;

        ui.horizontal(|ui| {
            ui.label("Year");
            let year = ui.add(egui::TextEdit::singleline(&mut self.form.year).desired_width(60.0));

            ui.label("Race");
            let race = ui.add(egui::TextEdit::singleline(&mut self.form.race).desired_width(140.0));

            ui.label("Drivers");
            let drivers = ui.add(
                egui::TextEdit::singleline(&mut self.form.drivers)
                    .hint_text("VER, LEC")
                    .desired_width(200.0),
            );

            let enter = [year, race, drivers]
                .iter()
                .any(|r| r.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)));

            let label = if loading { "LOADING..." } else { "ANALYZE" };
            let button = egui::Button::new(egui::RichText::new(label).strong().color(egui::Color32::WHITE))
                .fill(rgb(ACCENT_COLOR));
            if ui.add_enabled(!loading, button).clicked() || (enter && !loading) {
                submit = true;
            }

            if loading {
                ui.spinner();
            }
        });

        if submit {
            self.submit_request();
        }
    }

    /// Persistent banner for the last failed request
    pub fn render_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.composer.error() else {
            return;
        };

        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(60, 10, 10))
            .stroke(egui::Stroke::new(1.0, rgb(ACCENT_COLOR)))
            .corner_radius(4)
            .inner_margin(egui::Margin::symmetric(12, 8))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    egui::RichText::new(format!("⚠ {}", message))
                        .color(egui::Color32::from_rgb(255, 180, 180)),
                );
            });
        ui.add_space(8.0);
    }
}
