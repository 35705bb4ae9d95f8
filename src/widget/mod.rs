/// Lazy image widget module
///
/// This module holds the widget core:
/// - Load status and per-slot state (status.rs)
/// - The load state machine (machine.rs)
/// - Typed widget options (props.rs)
/// - The lazy/visibility coordinator (lazy_image.rs)

pub mod lazy_image;
pub mod machine;
pub mod props;
pub mod status;
