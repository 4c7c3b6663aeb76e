//! Main application state and eframe::App implementation.
//!
//! This module contains the ApexTraceApp struct which holds the panel composer,
//! the request form, and the channels to the background fetch worker.

use eframe::egui;
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};

use crate::client::{spawn_fetch_worker, AnalysisRequest, FetchError, FetchJob, FetchReply};
use crate::panels::{PanelComposer, PanelId};
use crate::settings::{RequestForm, UserSettings};
use crate::state::ToastType;

/// Main application state
pub struct ApexTraceApp {
    /// Analysis state, panels and viewports
    pub(crate) composer: PanelComposer,
    /// Persisted user preferences
    pub(crate) settings: UserSettings,
    /// Request inputs being edited
    pub(crate) form: RequestForm,
    /// Jobs for the background fetch worker
    fetch_tx: Sender<FetchJob>,
    /// Replies from the background fetch worker
    fetch_rx: Receiver<FetchReply>,
    /// Downsampled, display-space points per (panel, driver slot)
    pub(crate) downsample_cache: HashMap<(PanelId, usize), Vec<[f64; 2]>>,
    /// Toast messages for user feedback
    pub(crate) toast_message: Option<(String, std::time::Instant, ToastType)>,
}

impl ApexTraceApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_settings(UserSettings::load())
    }

    fn with_settings(settings: UserSettings) -> Self {
        let (fetch_tx, fetch_rx) = spawn_fetch_worker();
        Self {
            composer: PanelComposer::new(),
            form: settings.last_request.clone(),
            settings,
            fetch_tx,
            fetch_rx,
            downsample_cache: HashMap::new(),
            toast_message: None,
        }
    }

    /// Show a toast notification
    pub(crate) fn show_toast(&mut self, message: impl Into<String>, toast_type: ToastType) {
        self.toast_message = Some((message.into(), std::time::Instant::now(), toast_type));
    }

    /// Submit the request form to the analysis service
    pub(crate) fn submit_request(&mut self) {
        let request = AnalysisRequest::new(&self.form.year, &self.form.race, &self.form.drivers);

        let id = match self.composer.begin_fetch(request.clone()) {
            Ok(id) => id,
            Err(e) => {
                self.show_toast(e.to_string(), ToastType::Warning);
                return;
            }
        };

        let job = FetchJob {
            id,
            endpoint: self.settings.endpoint_url.clone(),
            request,
        };
        if self.fetch_tx.send(job).is_err() {
            // Worker thread is gone; fail the request so the form unlocks
            let reply = FetchReply {
                id,
                result: Err(FetchError::Transport("fetch worker stopped".to_string())),
            };
            if let Err(e) = self.composer.complete_fetch(reply) {
                tracing::warn!("{}", e);
            }
            return;
        }

        self.settings.last_request = self.form.clone();
        self.save_settings();
    }

    /// Apply any replies the fetch worker has produced
    fn poll_fetch_replies(&mut self) {
        while let Ok(reply) = self.fetch_rx.try_recv() {
            let succeeded = reply.result.is_ok();
            match self.composer.complete_fetch(reply) {
                Ok(()) => {
                    self.downsample_cache.clear();
                    if succeeded {
                        let missing = self.composer.missing_drivers();
                        if missing.is_empty() {
                            self.show_toast("Analysis loaded", ToastType::Success);
                        } else {
                            let codes: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
                            self.show_toast(
                                format!("No data for {}", codes.join(", ")),
                                ToastType::Warning,
                            );
                        }
                    }
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }
    }

    pub(crate) fn save_settings(&self) {
        if let Err(e) = self.settings.save() {
            tracing::warn!("Failed to save settings: {:#}", e);
        }
    }
}

impl eframe::App for ApexTraceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background fetches
        self.poll_fetch_replies();

        // Apply dark theme
        ctx.set_visuals(egui::Visuals::dark());

        // Keep polling while a request is in flight (and animate the spinner)
        if self.composer.is_loading() {
            ctx.request_repaint();
        }

        // Toast notifications
        self.render_toast(ctx);

        egui::TopBottomPanel::top("header_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_header(ui);
            ui.add_space(4.0);
            self.render_controls(ui);
            ui.add_space(6.0);
        });

        // Timing board, weather and insights
        egui::SidePanel::right("board_panel")
            .default_width(320.0)
            .min_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                self.render_board(ui);
            });

        // Main content area
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_error_banner(ui);
            self.render_panels(ui);
        });
    }
}
