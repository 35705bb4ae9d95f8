/// Application state module
///
/// This module handles state that outlives the widgets:
/// - The persisted gallery manifest (gallery.rs)

pub mod gallery;
