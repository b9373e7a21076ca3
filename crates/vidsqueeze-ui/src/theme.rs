// crates/vidsqueeze-ui/src/theme.rs
//
// Dark palette tuned for a single narrow panel: teal accent, blue-grey
// surfaces. `configure_style` is called once from VidSqueezeApp::new.

use egui::style::WidgetVisuals;
use egui::{Color32, Context, CornerRadius, Stroke, Style, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────
pub const ACCENT:        Color32 = Color32::from_rgb( 45, 185, 170);
pub const ACCENT_DIM:    Color32 = Color32::from_rgb( 25, 110, 102);
const     ACCENT_HOVER:  Color32 = Color32::from_rgb(110, 215, 200);

const     SURFACE_0:     Color32 = Color32::from_rgb( 12,  15,  18);
const     SURFACE_1:     Color32 = Color32::from_rgb( 18,  22,  27);
pub const DARK_BG_2:     Color32 = Color32::from_rgb( 26,  31,  38);
pub const DARK_BG_3:     Color32 = Color32::from_rgb( 36,  43,  52);
const     SURFACE_4:     Color32 = Color32::from_rgb( 48,  57,  68);

const     TEXT:          Color32 = Color32::from_rgb(222, 228, 234);
pub const DARK_TEXT_DIM: Color32 = Color32::from_rgb(125, 138, 150);
pub const DARK_BORDER:   Color32 = Color32::from_rgb( 52,  62,  74);

pub const SUCCESS:       Color32 = Color32::from_rgb( 80, 190, 120);
pub const ERROR:         Color32 = Color32::from_rgb(210,  85,  85);
pub const TRACK_BG:      Color32 = Color32::from_rgb( 32,  38,  45);

const RADIUS: CornerRadius = CornerRadius::same(5);

fn paint(w: &mut WidgetVisuals, fill: Color32, border: Stroke, text: Stroke) {
    w.bg_fill       = fill;
    w.weak_bg_fill  = fill;
    w.bg_stroke     = border;
    w.fg_stroke     = text;
    w.corner_radius = RADIUS;
}

pub fn configure_style(ctx: &Context) {
    let mut style = Style::default();
    style.spacing.item_spacing   = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin  = egui::Margin::same(10);

    let mut v = Visuals::dark();
    v.panel_fill          = SURFACE_1;
    v.window_fill         = DARK_BG_2;
    v.extreme_bg_color    = SURFACE_0;
    v.faint_bg_color      = SURFACE_0;
    v.window_stroke       = Stroke::new(1.0, DARK_BORDER);
    v.selection.bg_fill   = ACCENT_DIM;
    v.override_text_color = Some(TEXT);

    let w = &mut v.widgets;
    paint(&mut w.noninteractive, DARK_BG_2,  Stroke::new(1.0, DARK_BORDER), Stroke::new(1.0, DARK_TEXT_DIM));
    paint(&mut w.inactive,       DARK_BG_3,  Stroke::new(1.0, DARK_BORDER), Stroke::new(1.0, TEXT));
    paint(&mut w.hovered,        SURFACE_4,  Stroke::new(1.0, ACCENT_DIM),  Stroke::new(1.5, ACCENT_HOVER));
    paint(&mut w.active,         ACCENT_DIM, Stroke::new(1.0, ACCENT),      Stroke::new(2.0, Color32::WHITE));

    ctx.set_style(style);
    ctx.set_visuals(v);
}
