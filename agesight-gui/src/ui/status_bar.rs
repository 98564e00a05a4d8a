//! Status bar UI components for the AgeSight GUI.

use egui::{
    Align, CornerRadius, Layout, Margin, RichText, Spinner, Stroke, TopBottomPanel, Ui,
};

use crate::{AgeSightApp, theme};

impl AgeSightApp {
    /// Renders the bottom status bar with the current status and last error.
    pub fn show_status_bar(&mut self, ctx: &egui::Context) {
        let palette = theme::palette();
        TopBottomPanel::bottom("agesight_status_bar")
            .frame(
                egui::Frame::new()
                    .fill(palette.panel_dark)
                    .stroke(Stroke::new(1.0, palette.outline))
                    .inner_margin(Margin::symmetric(14, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&self.status_line).color(palette.subtle_text));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        self.draw_status_badge(ui, palette);
                    });
                });
                if let Some(err) = &self.last_error {
                    ui.colored_label(palette.danger, err);
                }
            });
    }

    fn draw_status_badge(&self, ui: &mut Ui, palette: theme::Palette) {
        let (label, color) = if self.is_busy {
            ("Classifying...", palette.accent)
        } else if self.last_error.is_some() {
            ("Error", palette.danger)
        } else {
            ("Ready", palette.success)
        };

        egui::Frame::new()
            .fill(palette.panel_light)
            .stroke(Stroke::new(1.0, color))
            .corner_radius(CornerRadius::same(64))
            .inner_margin(Margin::symmetric(10, 4))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if self.is_busy {
                        ui.add(Spinner::new().size(12.0));
                    }
                    ui.label(RichText::new(label).strong());
                });
            });
    }

    /// Replaces the status line and clears any previous error.
    pub fn show_success(&mut self, message: impl Into<String>) {
        self.status_line = message.into();
        self.last_error = None;
    }

    /// Shows `headline` in the status line and `detail` beneath it.
    pub fn show_error(&mut self, headline: impl Into<String>, detail: impl Into<String>) {
        self.status_line = headline.into();
        self.last_error = Some(detail.into());
    }
}
