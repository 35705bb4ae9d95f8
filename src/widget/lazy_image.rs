/// Lazy image slot
///
/// Ties the load state machine to a visibility watcher. When lazy, the first
/// load waits for the slot to scroll into view; the watcher is consumed on
/// that first visible report and visibility is never tracked again. Source
/// changes after that point always restart the load sequence.

use std::sync::Arc;

use iced::Rectangle;

use super::machine::{LoadMachine, StatusCallback};
use super::props::ImageOptions;
use super::status::{LoadState, LoadStatus};
use crate::load::{ImageFetcher, LoadError};
use crate::ui::inview::{InView, Scope};

pub struct LazyImage {
    machine: LoadMachine,
    images: Arc<dyn ImageFetcher>,
    opts: ImageOptions,
    watcher: Option<InView>,
    gate_open: bool,
}

impl LazyImage {
    pub fn new(
        images: Arc<dyn ImageFetcher>,
        opts: ImageOptions,
        on_changes: Option<StatusCallback>,
    ) -> Self {
        let watcher = opts.lazy.then(|| {
            InView::new(
                opts.lazy_parent.clone(),
                !opts.no_parent_autodetect,
                opts.lazy_offset,
            )
        });

        LazyImage {
            machine: LoadMachine::new(images.clone(), on_changes),
            images,
            gate_open: !opts.lazy,
            watcher,
            opts,
        }
    }

    /// Start the first load, unless the slot is lazy and still waiting for
    /// its visibility report. Returns the source to fetch, if any.
    pub fn mount(&mut self) -> Option<String> {
        if !self.gate_open {
            return None;
        }
        let src = self.opts.src.clone();
        self.machine.begin(&src)
    }

    /// Change the target source.
    ///
    /// An unchanged source is a no-op. Before the lazy gate has opened the
    /// new value is only recorded; the gated load fires once, for whatever
    /// source is current when visibility arrives. Afterwards a change always
    /// restarts the load, superseding any in-flight fetch.
    pub fn set_source(&mut self, src: &str) -> Option<String> {
        if self.opts.src == src {
            return None;
        }
        self.opts.src = src.to_string();
        if !self.gate_open {
            return None;
        }
        self.machine.begin(src)
    }

    /// Feed a viewport report to the watcher. On the first visible report the
    /// watcher is stopped and the load for the current source begins.
    pub fn observe(&mut self, scope: &Scope, window: Rectangle) -> Option<String> {
        let watcher = self.watcher.as_mut()?;
        let report = watcher.observe(scope, window)?;

        if !report.visible {
            return None;
        }

        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
        self.gate_open = true;

        let src = self.opts.src.clone();
        self.machine.begin(&src)
    }

    /// Update the region the watcher tracks (content coordinates)
    pub fn set_region(&mut self, region: Rectangle) {
        if let Some(watcher) = self.watcher.as_mut() {
            watcher.set_region(region);
        }
    }

    /// Resolve an asynchronous fetch outcome; stale completions are dropped
    /// by the machine
    pub fn finish(&mut self, src: &str, outcome: Result<(), LoadError>) {
        self.machine.finish(src, outcome);
    }

    pub fn state(&self) -> &LoadState {
        self.machine.state()
    }

    pub fn status(&self) -> LoadStatus {
        self.machine.status()
    }

    pub fn options(&self) -> &ImageOptions {
        &self.opts
    }

    pub fn images(&self) -> &Arc<dyn ImageFetcher> {
        &self.images
    }
}

impl std::fmt::Debug for LazyImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyImage")
            .field("src", &self.opts.src)
            .field("state", self.machine.state())
            .field("gate_open", &self.gate_open)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use iced::{Point, Size};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Fetcher with nothing ever in memory
    struct ColdImages;

    #[async_trait]
    impl ImageFetcher for ColdImages {
        fn is_ready(&self, _src: &str) -> bool {
            false
        }

        fn get(&self, _src: &str) -> Option<iced::widget::image::Handle> {
            None
        }

        async fn fetch(&self, _src: String) -> Result<(), LoadError> {
            Ok(())
        }
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    fn lazy_widget(src: &str) -> (LazyImage, Rc<RefCell<Vec<&'static str>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let mut opts = ImageOptions::new(src);
        opts.lazy = true;
        let mut widget = LazyImage::new(
            Arc::new(ColdImages),
            opts,
            Some(Box::new(move |status| sink.borrow_mut().push(status.as_str()))),
        );
        widget.set_region(rect(0.0, 500.0, 100.0, 100.0));
        (widget, log)
    }

    #[test]
    fn test_eager_slot_loads_at_mount() {
        let mut widget = LazyImage::new(Arc::new(ColdImages), ImageOptions::new("a.png"), None);

        assert_eq!(widget.mount().as_deref(), Some("a.png"));
        assert_eq!(widget.status(), LoadStatus::Busy);
    }

    #[test]
    fn test_lazy_slot_waits_for_visibility() {
        let (mut widget, log) = lazy_widget("a.png");

        assert_eq!(widget.mount(), None);
        assert_eq!(widget.status(), LoadStatus::Mounted);

        // region is below the window: not visible yet
        let window = rect(0.0, 0.0, 800.0, 200.0);
        assert_eq!(widget.observe(&Scope::Window, window), None);
        assert!(log.borrow().is_empty());

        // scrolled into view: the gate opens and the load starts
        let window = rect(0.0, 450.0, 800.0, 200.0);
        assert_eq!(widget.observe(&Scope::Window, window).as_deref(), Some("a.png"));
        assert_eq!(widget.status(), LoadStatus::Busy);
        assert_eq!(*log.borrow(), vec!["busy"]);

        // the watcher is gone; later reports do nothing
        assert_eq!(widget.observe(&Scope::Window, window), None);
    }

    #[test]
    fn test_source_change_before_visibility_is_only_recorded() {
        let (mut widget, log) = lazy_widget("a.png");
        widget.mount();

        assert_eq!(widget.set_source("b.png"), None);
        assert_eq!(widget.status(), LoadStatus::Mounted);
        assert!(log.borrow().is_empty());

        // visibility arrives: only the newest source loads
        let window = rect(0.0, 450.0, 800.0, 200.0);
        assert_eq!(widget.observe(&Scope::Window, window).as_deref(), Some("b.png"));
        assert_eq!(widget.state().next, "b.png");
        assert_eq!(*log.borrow(), vec!["busy"]);
    }

    #[test]
    fn test_source_change_after_gate_ignores_visibility() {
        let (mut widget, _log) = lazy_widget("a.png");
        widget.mount();

        let window = rect(0.0, 450.0, 800.0, 200.0);
        widget.observe(&Scope::Window, window);

        // no new visibility report needed for subsequent swaps
        assert_eq!(widget.set_source("c.png").as_deref(), Some("c.png"));
        assert_eq!(widget.status(), LoadStatus::Busy);
    }

    #[test]
    fn test_unchanged_source_is_a_noop() {
        let mut widget = LazyImage::new(Arc::new(ColdImages), ImageOptions::new("a.png"), None);
        widget.mount();

        assert_eq!(widget.set_source("a.png"), None);
        assert_eq!(widget.status(), LoadStatus::Busy);
    }

    #[test]
    fn test_mid_flight_swap_drops_the_stale_completion() {
        let mut widget = LazyImage::new(Arc::new(ColdImages), ImageOptions::new("a.png"), None);
        widget.mount();

        assert_eq!(widget.set_source("b.png").as_deref(), Some("b.png"));
        assert_eq!(widget.status(), LoadStatus::Busy);

        widget.finish("a.png", Ok(()));
        assert_eq!(widget.status(), LoadStatus::Busy);
        assert_eq!(widget.state().next, "b.png");

        widget.finish("b.png", Ok(()));
        assert_eq!(widget.status(), LoadStatus::Loaded);
        assert_eq!(widget.state().prev, "a.png");
    }
}
