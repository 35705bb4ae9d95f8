/// Viewport visibility trigger
///
/// Watches a rectangular region and reports when it enters or leaves a
/// scrolled viewport. Reports fire only on actual changes, and a watcher is
/// stopped by consuming it, so a one-shot subscription cannot fire twice.

use iced::widget::scrollable;
use iced::Rectangle;

/// Margins applied around the tracked region before the intersection test,
/// so a load can start shortly before the image actually scrolls into view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Offset {
    /// Same margin on all four sides
    pub fn all(value: f32) -> Self {
        Offset {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// A single visibility report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub visible: bool,
}

/// Where a viewport report originates from
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    /// The application window itself
    Window,
    /// A specific scroll container
    Scrollable(scrollable::Id),
}

/// Watches one region for viewport intersection.
///
/// With an explicit `parent`, only reports from that scroll container are
/// accepted. Without one, any report is accepted unless autodetection was
/// disabled, in which case only window-level reports count.
pub struct InView {
    region: Rectangle,
    parent: Option<scrollable::Id>,
    parent_autodetect: bool,
    offset: Offset,
    last: Option<bool>,
}

impl InView {
    pub fn new(parent: Option<scrollable::Id>, parent_autodetect: bool, offset: Offset) -> Self {
        InView {
            region: Rectangle::new(iced::Point::ORIGIN, iced::Size::ZERO),
            parent,
            parent_autodetect,
            offset,
            last: None,
        }
    }

    /// Update the tracked region (content coordinates)
    pub fn set_region(&mut self, region: Rectangle) {
        self.region = region;
    }

    /// Feed a viewport report.
    ///
    /// Returns a report only when visibility actually changed since the last
    /// accepted observation.
    pub fn observe(&mut self, scope: &Scope, window: Rectangle) -> Option<Visibility> {
        if !self.accepts(scope) {
            return None;
        }

        let visible = expand(self.region, self.offset).intersects(&window);

        if self.last == Some(visible) {
            return None;
        }

        self.last = Some(visible);
        Some(Visibility { visible })
    }

    fn accepts(&self, scope: &Scope) -> bool {
        match (&self.parent, scope) {
            (Some(parent), Scope::Scrollable(id)) => parent == id,
            (Some(_), Scope::Window) => false,
            (None, Scope::Window) => true,
            (None, Scope::Scrollable(_)) => self.parent_autodetect,
        }
    }

    /// Stop observing. Consumes the watcher so it can only happen once.
    pub fn stop(self) {}
}

impl std::fmt::Debug for InView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InView")
            .field("region", &self.region)
            .field("last", &self.last)
            .finish()
    }
}

/// Grow a rectangle by the offset margins
fn expand(region: Rectangle, offset: Offset) -> Rectangle {
    Rectangle {
        x: region.x - offset.left,
        y: region.y - offset.top,
        width: region.width + offset.left + offset.right,
        height: region.height + offset.top + offset.bottom,
    }
}
