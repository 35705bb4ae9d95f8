/// UI module
///
/// This module holds the presentation side:
/// - The viewport visibility trigger (inview.rs)
/// - The slot-to-element mapping (view.rs)

pub mod inview;
pub mod view;
