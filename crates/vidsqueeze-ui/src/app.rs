// crates/vidsqueeze-ui/src/app.rs
use std::path::Path;

use eframe::egui;
use rfd::FileDialog;
use tracing::{info, warn};

use vidsqueeze_core::commands::CompressCommand;
use vidsqueeze_core::config::CaptureConfig;
use vidsqueeze_core::error::CompressError;
use vidsqueeze_core::asset::extension_for_mime;
use vidsqueeze_core::output::OutputArtifact;
use vidsqueeze_core::session::SessionPhase;
use vidsqueeze_media::Compressor;

use crate::helpers::format::format_bytes;
use crate::modules::{compress_panel::CompressPanel, toast::Toasts, PanelModule};
use crate::theme::configure_style;

/// Extensions offered by the open dialog. Anything else can still be dropped
/// on the window and is rejected by mime type.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "webm", "mkv", "avi", "ogv", "mpg", "mpeg", "ts", "m2ts", "3gp", "flv", "wmv",
];

/// Default file name and filter extension for the save dialog, both taken
/// from the artifact itself.
fn save_suggestion(artifact: &OutputArtifact) -> (&'static str, &'static str) {
    (artifact.file_name(), extension_for_mime(artifact.mime()))
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct VidSqueezeApp {
    compressor:   Compressor,
    panel:        CompressPanel,
    toasts:       Toasts,
    /// Commands emitted by the panel each frame, processed after the UI pass
    pending_cmds: Vec<CompressCommand>,
}

impl VidSqueezeApp {
    pub fn new(
        cc:           &eframe::CreationContext<'_>,
        config:       CaptureConfig,
        config_error: Option<String>,
    ) -> Self {
        configure_style(&cc.egui_ctx);
        // Pin to dark mode so OS theme changes don't overwrite the palette.
        cc.egui_ctx.options_mut(|o| {
            o.theme_preference = egui::ThemePreference::Dark;
        });

        let mut toasts = Toasts::default();
        if let Some(msg) = config_error {
            toasts.error(format!("Config ignored: {msg}"));
        }

        Self {
            compressor:   Compressor::new(config),
            panel:        CompressPanel::default(),
            toasts,
            pending_cmds: Vec::new(),
        }
    }

    fn process_command(&mut self, cmd: CompressCommand) {
        match cmd {
            // ── Input ────────────────────────────────────────────────────────
            CompressCommand::PickFile => {
                if let Some(path) = FileDialog::new()
                    .add_filter("Video", VIDEO_EXTENSIONS)
                    .pick_file()
                {
                    self.pending_cmds.push(CompressCommand::SelectFile(path));
                }
            }
            CompressCommand::SelectFile(path) => {
                if let Err(e) = self.compressor.select_file(&path) {
                    self.report(e);
                }
            }

            // ── Capture ──────────────────────────────────────────────────────
            CompressCommand::SetTargetSize(size) => {
                if let Err(e) = self.compressor.set_target_size(size) {
                    self.report(e);
                }
            }
            CompressCommand::StartCompress => {
                if let Err(e) = self.compressor.start() {
                    self.report(e);
                }
            }
            CompressCommand::CancelCompress => {
                self.compressor.cancel();
            }

            // ── Output ───────────────────────────────────────────────────────
            CompressCommand::PickSavePath => {
                let Some(artifact) = self.compressor.artifact() else { return };
                let (name, ext) = save_suggestion(artifact);
                if let Some(dest) = FileDialog::new()
                    .set_file_name(name)
                    .add_filter("WebM", &[ext])
                    .save_file()
                {
                    self.pending_cmds.push(CompressCommand::SaveOutput(dest));
                }
            }
            CompressCommand::SaveOutput(dest) => self.save_output(&dest),

            // ── View ─────────────────────────────────────────────────────────
            CompressCommand::DismissError => self.compressor.clear_error(),
            CompressCommand::Reset        => self.compressor.reset(),
        }
    }

    fn save_output(&mut self, dest: &Path) {
        let Some(artifact) = self.compressor.artifact() else { return };
        match std::fs::write(dest, artifact.bytes()) {
            Ok(()) => {
                info!("[app] saved {} bytes to {}", artifact.len(), dest.display());
                let name = dest.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.toasts.success(format!("Saved {name} ({})", format_bytes(artifact.len())));
            }
            Err(e) => {
                warn!("[app] save to {} failed: {e}", dest.display());
                self.toasts.error(format!("Could not save {}: {e}", dest.display()));
            }
        }
    }

    fn report(&mut self, error: CompressError) {
        let text = if error.is_input_error() {
            error.to_string()
        } else {
            format!("Compression failed: {error}")
        };
        warn!("[app] {error}");
        self.toasts.error(text);
    }

    fn poll_media(&mut self) {
        let before = self.compressor.phase();
        for e in self.compressor.poll() {
            self.report(e);
        }
        let after = self.compressor.phase();
        if before == SessionPhase::Capturing && after == SessionPhase::Completed {
            self.toasts.success("Compression finished");
        }
    }

    fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        let files = ctx.input(|i| i.raw.dropped_files.clone());
        // Only the last dropped file is kept; the session holds one asset.
        if let Some(path) = files.into_iter().filter_map(|f| f.path).last() {
            self.pending_cmds.push(CompressCommand::SelectFile(path));
        }
    }
}

// ── eframe::App ───────────────────────────────────────────────────────────────

impl eframe::App for VidSqueezeApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.compressor.reset();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_drag_and_drop(ctx);
        self.poll_media();

        egui::TopBottomPanel::top("top_panel")
            .exact_height(36.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new("🗜 VidSqueeze")
                            .strong().size(15.0).color(crate::theme::ACCENT),
                    );
                    ui.separator();
                    ui.label(egui::RichText::new("Resize & re-encode to WebM").size(12.0).weak());
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.panel.ui(ui, &self.compressor, &mut self.pending_cmds);
        });

        self.toasts.show(ctx);

        // ── Process commands emitted this frame ───────────────────────────────
        // Dialog commands may queue follow-ups (PickFile → SelectFile), so drain
        // until empty.
        while !self.pending_cmds.is_empty() {
            let cmds: Vec<CompressCommand> = self.pending_cmds.drain(..).collect();
            for cmd in cmds {
                self.process_command(cmd);
            }
        }

        if self.compressor.is_busy() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidsqueeze_core::chunks::ChunkAccumulator;
    use vidsqueeze_core::output::assemble;

    #[test]
    fn save_dialog_suggests_the_artifact_name() {
        let mut acc = ChunkAccumulator::new();
        acc.append(vec![0x1a, 0x45, 0xdf, 0xa3]);
        let artifact = assemble(acc.seal()).unwrap();

        let (name, ext) = save_suggestion(&artifact);
        assert_eq!(name, artifact.file_name());
        assert!(name.ends_with(&format!(".{ext}")));
        assert_eq!(ext, "webm");
    }
}
