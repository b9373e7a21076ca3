// crates/vidsqueeze-core/src/helpers/mod.rs
pub mod time;
