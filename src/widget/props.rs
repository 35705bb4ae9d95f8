use iced::widget::image::FilterMethod;
use iced::widget::scrollable;
use iced::ContentFit;

use crate::ui::inview::Offset;

/// Options consumed by a lazy image slot.
///
/// The named fields are the ones the widget interprets; everything a caller
/// wants on the rendered image element itself goes through `attrs`, which is
/// forwarded untouched.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// Target source; empty clears the image
    pub src: String,
    /// Defer the load until the slot is visible
    pub lazy: bool,
    /// Scroll container to track visibility from
    pub lazy_parent: Option<scrollable::Id>,
    /// Disable accepting reports from whichever scroll container delivers them
    pub no_parent_autodetect: bool,
    /// Margin before the slot counts as visible
    pub lazy_offset: Offset,
    /// Do not keep the previous image on screen while the next one loads
    pub no_keep: bool,
    /// Pass-through attributes for the rendered element
    pub attrs: ImageAttrs,
}

impl ImageOptions {
    pub fn new(src: impl Into<String>) -> Self {
        ImageOptions {
            src: src.into(),
            lazy: false,
            lazy_parent: None,
            no_parent_autodetect: false,
            lazy_offset: Offset::default(),
            no_keep: false,
            attrs: ImageAttrs::default(),
        }
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self::new("")
    }
}

/// Attributes applied verbatim to the rendered image element
#[derive(Debug, Clone)]
pub struct ImageAttrs {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub content_fit: ContentFit,
    pub filter_method: FilterMethod,
}

impl Default for ImageAttrs {
    fn default() -> Self {
        ImageAttrs {
            width: None,
            height: None,
            content_fit: ContentFit::Contain,
            filter_method: FilterMethod::Linear,
        }
    }
}
