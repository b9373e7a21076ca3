// crates/vidsqueeze-ui/src/modules/compress_panel.rs
//
// CompressPanel: the single central panel.
//
//   Idle / Ready → "Select Video" + target size fields + "Resize & Compress"
//   Capturing    → progress bar, percentage readout, Stop button
//   Completed    → ✓ banner with size comparison + "Download Compressed Video"
//   Failed       → ✗ banner with the error until dismissed
//
// The width/height fields are local edit buffers. They are reloaded from the
// session whenever the selected asset changes (new asset id) and pushed back
// as SetTargetSize when the user edits them.

use super::PanelModule;
use crate::helpers::format::{format_bytes, size_ratio, truncate_name};
use crate::theme::{
    ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER, DARK_TEXT_DIM, ERROR, SUCCESS, TRACK_BG,
};
use egui::{Color32, Margin, RichText, Stroke, Ui};
use uuid::Uuid;
use vidsqueeze_core::commands::CompressCommand;
use vidsqueeze_core::error::CompressError;
use vidsqueeze_core::helpers::time::{format_duration, format_percent, format_position};
use vidsqueeze_core::media_types::Dimensions;
use vidsqueeze_core::session::SessionPhase;
use vidsqueeze_media::Compressor;

const MAX_SIDE: u32 = 7680;

#[derive(Default)]
pub struct CompressPanel {
    /// Asset the edit buffers were last loaded from.
    loaded_for: Option<Uuid>,
    width:      u32,
    height:     u32,
}

impl PanelModule for CompressPanel {
    fn ui(&mut self, ui: &mut Ui, compressor: &Compressor, cmd: &mut Vec<CompressCommand>) {
        self.sync_fields(compressor);
        let phase = compressor.phase();

        ui.vertical(|ui| {
            ui.add_space(6.0);
            self.source_row(ui, compressor, cmd);
            ui.add_space(10.0);

            self.size_fields(ui, compressor, cmd);
            ui.add_space(10.0);

            let can_start = matches!(
                phase,
                SessionPhase::Ready | SessionPhase::Completed | SessionPhase::Failed
            );
            let start_btn = egui::Button::new(
                RichText::new("🗜  Resize & Compress").size(13.0).strong(),
            )
            .fill(if can_start { ACCENT } else { DARK_BG_3 })
            .min_size(egui::vec2(ui.available_width(), 34.0));

            let hover = match phase {
                SessionPhase::Idle if compressor.is_probing() => "Reading video metadata…",
                SessionPhase::Idle      => "Select a video first",
                SessionPhase::Capturing => "A compression is already running",
                _                       => "Play the video through the encoder at the chosen size",
            };
            if ui.add_enabled(can_start, start_btn).on_hover_text(hover).clicked() {
                cmd.push(CompressCommand::StartCompress);
            }

            ui.add_space(12.0);
            match phase {
                SessionPhase::Capturing => capturing(ui, compressor, cmd),
                SessionPhase::Completed => completed(ui, compressor, cmd),
                SessionPhase::Failed if compressor.last_error().is_some() => {
                    failed(ui, compressor, cmd)
                }
                _ => {
                    // A finished artifact survives a retry that failed.
                    if compressor.artifact().is_some() {
                        download_button(ui, cmd);
                    }
                }
            }
        });
    }
}

impl CompressPanel {
    fn sync_fields(&mut self, compressor: &Compressor) {
        let id = compressor.asset().map(|a| a.id());
        if id == self.loaded_for {
            return;
        }
        // Wait for the probe before locking in the asset id, or the fields
        // would stay at zero.
        match compressor.target_size() {
            Some(size) => {
                self.width      = size.width;
                self.height     = size.height;
                self.loaded_for = id;
            }
            None if id.is_none() => {
                self.width      = 0;
                self.height     = 0;
                self.loaded_for = None;
            }
            None => {}
        }
    }

    fn source_row(&mut self, ui: &mut Ui, compressor: &Compressor, cmd: &mut Vec<CompressCommand>) {
        ui.horizontal(|ui| {
            let busy = compressor.phase() == SessionPhase::Capturing;
            let pick = egui::Button::new(RichText::new("📂  Select Video").size(12.0))
                .stroke(Stroke::new(1.0, DARK_BORDER))
                .fill(DARK_BG_2);
            if ui.add_enabled(!busy, pick).clicked() {
                cmd.push(CompressCommand::PickFile);
            }

            if compressor.asset().is_some() {
                let reset = egui::Button::new(
                    RichText::new("🔄 Reset").size(10.0).color(DARK_TEXT_DIM),
                )
                .fill(DARK_BG_3)
                .stroke(Stroke::new(1.0, DARK_BORDER));
                if ui.add(reset).on_hover_text("Forget the selected video").clicked() {
                    cmd.push(CompressCommand::Reset);
                }
            }
        });

        let Some(asset) = compressor.asset() else {
            ui.label(RichText::new("Drop a video here or pick one").size(11.0).color(DARK_TEXT_DIM));
            return;
        };

        ui.label(
            RichText::new(format!("Selected: {}", truncate_name(asset.name(), 48)))
                .size(12.0)
                .strong(),
        );
        let details = match compressor.media_info() {
            Some(info) => format!(
                "{}  ·  {}  ·  {}",
                info.dimensions(),
                format_duration(info.duration()),
                format_bytes(asset.len()),
            ),
            None => format!("probing…  ·  {}", format_bytes(asset.len())),
        };
        ui.label(RichText::new(details).size(10.0).color(DARK_TEXT_DIM));
    }

    fn size_fields(&mut self, ui: &mut Ui, compressor: &Compressor, cmd: &mut Vec<CompressCommand>) {
        let editable = compressor.phase() == SessionPhase::Ready
            || compressor.phase() == SessionPhase::Completed
            || compressor.phase() == SessionPhase::Failed;

        let mut changed = false;
        ui.add_enabled_ui(editable, |ui| {
            egui::Grid::new("target_size_grid")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Width").size(11.0).color(DARK_TEXT_DIM));
                    changed |= ui.add(
                        egui::DragValue::new(&mut self.width).range(1..=MAX_SIDE).suffix(" px"),
                    ).changed();
                    ui.end_row();

                    ui.label(RichText::new("Height").size(11.0).color(DARK_TEXT_DIM));
                    changed |= ui.add(
                        egui::DragValue::new(&mut self.height).range(1..=MAX_SIDE).suffix(" px"),
                    ).changed();
                    ui.end_row();
                });

            let overridden = compressor.media_info()
                .zip(compressor.target_size())
                .is_some_and(|(info, target)| info.dimensions() != target);
            if overridden {
                let restore = egui::Button::new(
                    RichText::new("Use original size").size(10.0).color(DARK_TEXT_DIM),
                )
                .fill(DARK_BG_2)
                .stroke(Stroke::new(1.0, DARK_BORDER));
                if ui.add(restore).clicked() {
                    // Reload from the session on the next frame.
                    self.loaded_for = None;
                    cmd.push(CompressCommand::SetTargetSize(None));
                }
            }
        });

        if changed {
            let size = Dimensions::new(self.width, self.height);
            if size.is_valid() {
                cmd.push(CompressCommand::SetTargetSize(Some(size)));
            }
        }
    }
}

// ── Phase views ───────────────────────────────────────────────────────────────

fn capturing(ui: &mut Ui, compressor: &Compressor, cmd: &mut Vec<CompressCommand>) {
    let pct      = compressor.progress();
    let fraction = (pct / 100.0).clamp(0.0, 1.0) as f32;

    ui.label(
        RichText::new(format_percent(pct))
            .size(34.0)
            .strong()
            .color(ACCENT),
    );
    ui.add_space(6.0);

    let (bar_rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), 8.0),
        egui::Sense::hover(),
    );
    let p = ui.painter();
    p.rect_filled(bar_rect, 4.0, TRACK_BG);
    if fraction > 0.0 {
        let mut fill = bar_rect;
        fill.max.x = bar_rect.min.x + bar_rect.width() * fraction;
        p.rect_filled(fill, 4.0, ACCENT);
    }
    ui.add_space(4.0);

    if let Some(info) = compressor.media_info() {
        let elapsed = info.duration() * pct / 100.0;
        let chunks  = compressor.session().capture().map_or(0, |c| c.chunk_count());
        ui.label(
            RichText::new(format!("{}  ·  {chunks} chunks", format_position(elapsed, info.duration())))
                .size(10.0)
                .color(DARK_TEXT_DIM),
        );
    }
    ui.add_space(10.0);

    let stop = egui::Button::new(
        RichText::new("✋  Stop").size(11.0).color(DARK_TEXT_DIM),
    )
    .stroke(Stroke::new(1.0, DARK_BORDER))
    .fill(DARK_BG_2)
    .min_size(egui::vec2(ui.available_width(), 28.0));

    if ui.add(stop).clicked() {
        cmd.push(CompressCommand::CancelCompress);
    }
}

fn completed(ui: &mut Ui, compressor: &Compressor, cmd: &mut Vec<CompressCommand>) {
    let Some(artifact) = compressor.artifact() else { return };
    let source_len = compressor.asset().map_or(0, |a| a.len());

    let mut text = format!("✔  Done: {}", format_bytes(artifact.len()));
    if let Some(ratio) = size_ratio(source_len, artifact.len()) {
        text.push_str(&format!("  ({ratio})"));
    }

    egui::Frame::new()
        .fill(Color32::from_rgb(30, 60, 40))
        .stroke(Stroke::new(1.0, SUCCESS))
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(Margin::same(8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(text).size(11.0).color(SUCCESS));
        });

    ui.add_space(8.0);
    download_button(ui, cmd);
}

fn failed(ui: &mut Ui, compressor: &Compressor, cmd: &mut Vec<CompressCommand>) {
    let display = match compressor.session().error() {
        Some(CompressError::Cancelled) => "💥  Compression cancelled".to_string(),
        Some(e) => format!("💥  {e}"),
        None    => "💥  Compression failed".to_string(),
    };

    egui::Frame::new()
        .fill(Color32::from_rgb(60, 25, 25))
        .stroke(Stroke::new(1.0, ERROR))
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(Margin::same(8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(&display).size(11.0).color(ERROR));
        });

    ui.add_space(8.0);
    if compressor.artifact().is_some() {
        download_button(ui, cmd);
        ui.add_space(4.0);
    }

    let dismiss = egui::Button::new(
        RichText::new("Dismiss").size(11.0).color(DARK_TEXT_DIM),
    )
    .stroke(Stroke::new(1.0, DARK_BORDER))
    .fill(DARK_BG_2)
    .min_size(egui::vec2(ui.available_width(), 28.0));

    if ui.add(dismiss).clicked() {
        cmd.push(CompressCommand::DismissError);
    }
}

fn download_button(ui: &mut Ui, cmd: &mut Vec<CompressCommand>) {
    let btn = egui::Button::new(
        RichText::new("⬇  Download Compressed Video").size(12.0).color(Color32::WHITE),
    )
    .fill(Color32::from_rgb(40, 110, 70))
    .stroke(Stroke::new(1.0, SUCCESS))
    .min_size(egui::vec2(ui.available_width(), 30.0));

    if ui.add(btn).clicked() {
        cmd.push(CompressCommand::PickSavePath);
    }
}
