// crates/vidsqueeze-ui/src/modules/mod.rs
//
// Panel registry. Panels read the Compressor and emit commands; they never
// mutate it directly. app.rs applies the commands after the UI pass.

pub mod compress_panel;
pub mod toast;

use egui::Ui;
use vidsqueeze_core::commands::CompressCommand;
use vidsqueeze_media::Compressor;

pub trait PanelModule {
    fn ui(&mut self, ui: &mut Ui, compressor: &Compressor, cmd: &mut Vec<CompressCommand>);
}
