// crates/vidsqueeze-core/src/commands.rs
//
// Every user action in VidSqueeze is expressed as a CompressCommand.
// Panels emit these; app.rs processes them after the UI pass.

use std::path::PathBuf;
use crate::media_types::Dimensions;

#[derive(Debug, Clone, PartialEq)]
pub enum CompressCommand {
    // ── Input ────────────────────────────────────────────────────────────────
    /// Load a file picked from the dialog or dropped on the window.
    SelectFile(PathBuf),
    /// Open the file picker; app.rs turns the result into `SelectFile`.
    PickFile,

    // ── Capture ──────────────────────────────────────────────────────────────
    /// `None` restores the probed source dimensions.
    SetTargetSize(Option<Dimensions>),
    StartCompress,
    CancelCompress,

    // ── Output ───────────────────────────────────────────────────────────────
    /// Open the save dialog for the latest artifact.
    PickSavePath,
    /// Write the latest artifact to `path`.
    SaveOutput(PathBuf),

    // ── View ─────────────────────────────────────────────────────────────────
    DismissError,
    Reset,
}
