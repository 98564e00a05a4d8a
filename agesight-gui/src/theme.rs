//! Global theme customizations for the AgeSight GUI.

use egui::{Color32, Context, CornerRadius, Margin, Shadow, Stroke, Visuals};

/// Shared color palette used by the GUI.
#[derive(Clone, Copy)]
pub struct Palette {
    pub canvas: Color32,
    pub panel: Color32,
    pub panel_dark: Color32,
    pub panel_light: Color32,
    pub accent: Color32,
    pub accent_soft: Color32,
    pub success: Color32,
    pub danger: Color32,
    pub subtle_text: Color32,
    pub outline: Color32,
    /// Fill of the empty image area.
    pub placeholder: Color32,
}

/// Returns the default palette.
pub fn palette() -> Palette {
    Palette {
        canvas: Color32::from_rgb(12, 14, 20),
        panel: Color32::from_rgb(24, 28, 38),
        panel_dark: Color32::from_rgb(16, 19, 27),
        panel_light: Color32::from_rgb(44, 50, 66),
        accent: Color32::from_rgb(120, 170, 255),
        accent_soft: Color32::from_rgba_unmultiplied(120, 170, 255, 70),
        success: Color32::from_rgb(104, 208, 160),
        danger: Color32::from_rgb(255, 120, 130),
        subtle_text: Color32::from_rgb(190, 198, 214),
        outline: Color32::from_rgba_unmultiplied(96, 108, 136, 150),
        placeholder: Color32::GRAY,
    }
}

/// Apply the AgeSight theme to the provided egui context.
pub fn apply(ctx: &Context) {
    let palette = palette();
    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = Margin::same(12);
    style.visuals = visuals_from_palette(palette);

    ctx.set_style(style);
}

fn visuals_from_palette(palette: Palette) -> Visuals {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(Color32::from_rgb(230, 234, 242));
    visuals.hyperlink_color = palette.accent;
    visuals.panel_fill = palette.panel;
    visuals.extreme_bg_color = palette.canvas;

    visuals.widgets.noninteractive.bg_fill = palette.panel_dark;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.subtle_text);

    visuals.widgets.inactive.bg_fill = palette.panel;
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, palette.outline);

    visuals.widgets.hovered.bg_fill = palette.panel_light;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, palette.accent_soft);

    visuals.widgets.active.bg_fill = palette.panel_light;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, palette.accent);

    visuals.selection.bg_fill = palette.accent;
    visuals.selection.stroke = Stroke::new(1.5, palette.panel_dark);

    visuals.window_corner_radius = CornerRadius::same(12);
    visuals.window_shadow = Shadow {
        offset: [0, 4],
        blur: 16,
        spread: 1,
        color: Color32::from_rgba_unmultiplied(0, 0, 0, 200),
    };

    visuals
}
