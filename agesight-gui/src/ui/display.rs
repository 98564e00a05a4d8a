//! Main panel: file picker row, image area, and the result form.

use egui::{
    Align, CornerRadius, Grid, Layout, Rect, RichText, Sense, Stroke, TextEdit, Ui,
    load::SizedTexture, vec2,
};

use crate::{AgeSightApp, DISPLAY_SIZE, DisplayState, theme};

/// User actions raised while rendering the display.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DisplayActions {
    pub browse_clicked: bool,
}

/// Render `state` into `ui`. Reads state only; actions are returned.
pub fn render_display(
    ui: &mut Ui,
    state: &DisplayState,
    palette: theme::Palette,
    busy: bool,
) -> DisplayActions {
    let mut actions = DisplayActions::default();

    ui.horizontal(|ui| {
        actions.browse_clicked = ui
            .button("Browse")
            .on_hover_text("Select a cropped face image")
            .clicked();
        if busy {
            ui.add(egui::Spinner::new().size(16.0));
        }
        let path_text = state
            .selected_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        ui.add_enabled(
            false,
            TextEdit::singleline(&mut path_text.as_str()).desired_width(f32::INFINITY),
        );
    });

    ui.add_space(8.0);
    paint_image_area(ui, state, palette);
    ui.add_space(8.0);

    Grid::new("agesight_result_form")
        .num_columns(2)
        .spacing(vec2(16.0, 6.0))
        .show(ui, |ui| {
            result_row(ui, palette, "Gender", &state.gender);
            result_row(ui, palette, "Age", &state.age);
            result_row(ui, palette, "Confidence", &state.confidence);
        });

    actions
}

fn paint_image_area(ui: &mut Ui, state: &DisplayState, palette: theme::Palette) {
    let area = vec2(DISPLAY_SIZE[0] as f32, DISPLAY_SIZE[1] as f32);
    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        let (rect, _) = ui.allocate_exact_size(area, Sense::hover());
        let painter = ui.painter_at(rect);
        match &state.image {
            Some(texture) => {
                painter.rect_filled(rect, CornerRadius::ZERO, palette.canvas);
                let image_rect = Rect::from_center_size(rect.center(), texture.size_vec2());
                egui::Image::from_texture(SizedTexture::from_handle(texture))
                    .paint_at(ui, image_rect);
            }
            None => {
                painter.rect_filled(rect, CornerRadius::ZERO, palette.placeholder);
            }
        }
        painter.rect_stroke(
            rect,
            CornerRadius::ZERO,
            Stroke::new(1.0, palette.outline),
            egui::StrokeKind::Inside,
        );
    });
}

fn result_row(ui: &mut Ui, palette: theme::Palette, label: &str, value: &str) {
    ui.label(RichText::new(label).color(palette.subtle_text));
    ui.add_enabled(
        false,
        TextEdit::singleline(&mut &*value).desired_width(240.0),
    );
    ui.end_row();
}

impl AgeSightApp {
    /// Renders the central panel and reacts to its actions.
    pub fn show_display(&mut self, ctx: &egui::Context) {
        let palette = theme::palette();
        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| render_display(ui, &self.display, palette, self.is_busy))
            .inner;

        if actions.browse_clicked {
            self.open_image_dialog();
        }
    }
}
