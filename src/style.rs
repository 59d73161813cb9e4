use eframe::egui;

// --- Sizing ---
pub const ICON_COL_WIDTH: f32 = 30.0;
pub const ROW_HEIGHT: f32 = 24.0;
pub const HEADER_HEIGHT: f32 = 20.0;
pub const SIDEBAR_DEFAULT: f32 = 220.0;
pub const AUTH_CARD_WIDTH: f32 = 320.0;

// --- Modals ---
pub const MODAL_MIN_WIDTH: f32 = 300.0;
pub const MODAL_MAX_WIDTH: f32 = 500.0;
pub const MODAL_WIDTH_RATIO: f32 = 0.6;

// --- Colors ---
pub const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);
pub const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(110, 190, 120);

// --- Helper functions ---

pub fn modal_width(ctx: &egui::Context) -> f32 {
    let width = ctx.input(|i| {
        i.viewport()
            .inner_rect
            .map(|r| r.width())
            .unwrap_or(800.0)
    });
    (width * MODAL_WIDTH_RATIO).clamp(MODAL_MIN_WIDTH, MODAL_MAX_WIDTH)
}

pub fn truncated_label(ui: &mut egui::Ui, text: impl Into<egui::WidgetText>) -> egui::Response {
    ui.add(egui::Label::new(text).truncate())
}

pub fn truncated_label_with_sense(
    ui: &mut egui::Ui,
    text: impl Into<egui::WidgetText>,
    sense: egui::Sense,
) -> egui::Response {
    ui.add(egui::Label::new(text).truncate().sense(sense))
}
