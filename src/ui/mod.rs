/// UI construction module
///
/// This module builds the widget tree:
/// - Control panel with character slots and prompts (panel.rs)
/// - Result gallery (gallery.rs)
/// - Full-screen zoom/pan viewer (viewer.rs)
/// - Help overlay (help.rs)

pub mod gallery;
pub mod help;
pub mod panel;
pub mod viewer;
