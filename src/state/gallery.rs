/// Gallery manifest
///
/// The list of image slots the application shows, persisted as JSON next to
/// the executable so a curated gallery survives restarts.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Supported image file extensions for folder imports
pub const IMAGE_EXTENSIONS: [&str; 8] = [
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff",
];

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One image slot in the gallery
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GalleryEntry {
    /// Image source: an http(s) URL or a local path
    pub src: String,
    /// Defer the fetch until the slot scrolls into view
    #[serde(default = "default_lazy")]
    pub lazy: bool,
    /// Blank the slot instead of keeping the old image while a new one loads
    #[serde(default)]
    pub no_keep: bool,
    /// Visibility margin in pixels (load this early)
    #[serde(default)]
    pub offset: f32,
}

fn default_lazy() -> bool {
    true
}

impl GalleryEntry {
    pub fn new(src: impl Into<String>) -> Self {
        GalleryEntry {
            src: src.into(),
            lazy: true,
            no_keep: false,
            offset: 0.0,
        }
    }
}

/// The persisted gallery
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Gallery {
    pub entries: Vec<GalleryEntry>,
}

impl Gallery {
    /// Load the manifest from disk
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Write the manifest back to disk
    pub fn save(&self, path: &Path) -> Result<(), GalleryError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add an entry unless its source is already present.
    /// Returns whether the entry was added.
    pub fn push_unique(&mut self, entry: GalleryEntry) -> bool {
        if self.entries.iter().any(|e| e.src == entry.src) {
            return false;
        }
        self.entries.push(entry);
        true
    }
}

/// Check whether a path looks like a displayable image file
pub fn is_image_file(path: &Path) -> bool {
    match path.extension() {
        Some(extension) => {
            let ext = extension.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_serialization() {
        let mut gallery = Gallery::default();
        gallery.push_unique(GalleryEntry::new("https://example.com/a.png"));
        gallery.push_unique(GalleryEntry {
            src: "b.png".into(),
            lazy: false,
            no_keep: true,
            offset: 200.0,
        });

        let json = gallery.to_json().unwrap();
        let restored = Gallery::from_json(&json).unwrap();

        assert_eq!(gallery, restored);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let gallery = Gallery::from_json(r#"{"entries":[{"src":"a.png"}]}"#).unwrap();

        let entry = &gallery.entries[0];
        assert!(entry.lazy);
        assert!(!entry.no_keep);
        assert_eq!(entry.offset, 0.0);
    }

    #[test]
    fn test_push_unique_skips_duplicates() {
        let mut gallery = Gallery::default();

        assert!(gallery.push_unique(GalleryEntry::new("a.png")));
        assert!(!gallery.push_unique(GalleryEntry::new("a.png")));
        assert_eq!(gallery.entries.len(), 1);
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(&PathBuf::from("photo.JPG")));
        assert!(is_image_file(&PathBuf::from("dir/image.webp")));
        assert!(!is_image_file(&PathBuf::from("notes.txt")));
        assert!(!is_image_file(&PathBuf::from("Makefile")));
    }
}
