// crates/vidsqueeze-ui/src/modules/toast.rs
//
// Auto-expiring notification banners, stacked bottom-right.

use std::time::{Duration, Instant};

use egui::{Align2, Context, Margin, RichText, Stroke};

use crate::theme::{DARK_BG_2, ERROR, SUCCESS};

const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    kind:    ToastKind,
    text:    String,
    expires: Instant,
}

#[derive(Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn success(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Success, text.into(), Instant::now());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Error, text.into(), Instant::now());
    }

    fn push(&mut self, kind: ToastKind, text: String, now: Instant) {
        self.items.push(Toast { kind, text, expires: now + TOAST_TTL });
    }

    /// Drop expired toasts; returns how many remain.
    fn prune(&mut self, now: Instant) -> usize {
        self.items.retain(|t| t.expires > now);
        self.items.len()
    }

    pub fn show(&mut self, ctx: &Context) {
        if self.prune(Instant::now()) == 0 {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                for toast in &self.items {
                    let color = match toast.kind {
                        ToastKind::Success => SUCCESS,
                        ToastKind::Error   => ERROR,
                    };
                    egui::Frame::new()
                        .fill(DARK_BG_2)
                        .stroke(Stroke::new(1.0, color))
                        .corner_radius(egui::CornerRadius::same(4))
                        .inner_margin(Margin::same(8))
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.label(RichText::new(&toast.text).size(12.0).color(color));
                        });
                }
            });
        // Keep repainting so expiry is noticed without input.
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
