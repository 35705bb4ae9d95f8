/// Presentation mapping for image slots
///
/// Stateless: takes a slot snapshot and renders exactly one element, either
/// the decoded image when the fetcher has it or a status-styled placeholder
/// box.

use iced::widget::{container, image, text};
use iced::{Color, Element, Length};

use crate::widget::lazy_image::LazyImage;
use crate::widget::props::ImageAttrs;
use crate::widget::status::{LoadState, LoadStatus};

/// Source the renderer should show.
///
/// While a new source is busy the previous one stays on screen (crossfade
/// model), unless `no_keep` asks for a blank slot instead.
pub fn effective_source(state: &LoadState, no_keep: bool) -> &str {
    if state.status == LoadStatus::Busy {
        if no_keep {
            ""
        } else {
            &state.prev
        }
    } else {
        &state.next
    }
}

/// Build the element for one image slot
pub fn lazy_image<'a, M: 'a>(widget: &LazyImage) -> Element<'a, M> {
    let opts = widget.options();
    let src = effective_source(widget.state(), opts.no_keep);

    match widget.images().get(src) {
        Some(handle) => {
            let mut img = image(handle)
                .content_fit(opts.attrs.content_fit)
                .filter_method(opts.attrs.filter_method);

            if let Some(width) = opts.attrs.width {
                img = img.width(width);
            }
            if let Some(height) = opts.attrs.height {
                img = img.height(height);
            }

            img.into()
        }
        None => placeholder(widget.status(), &opts.attrs),
    }
}

/// Status-styled box shown while there is nothing to draw
fn placeholder<'a, M: 'a>(status: LoadStatus, attrs: &ImageAttrs) -> Element<'a, M> {
    let label = match status {
        LoadStatus::Busy => "loading…",
        LoadStatus::Failed => "failed",
        LoadStatus::Mounted | LoadStatus::Loaded => "",
    };

    container(text(label).size(14))
        .width(attrs.width.map(Length::Fixed).unwrap_or(Length::Fill))
        .height(attrs.height.map(Length::Fixed).unwrap_or(Length::Fill))
        .align_x(iced::Alignment::Center)
        .align_y(iced::Alignment::Center)
        .style(move |_theme| placeholder_style(status))
        .into()
}

fn placeholder_style(status: LoadStatus) -> container::Style {
    let background = match status {
        LoadStatus::Busy => Color::from_rgb(0.16, 0.16, 0.18),
        LoadStatus::Failed => Color::from_rgb(0.25, 0.10, 0.10),
        LoadStatus::Mounted | LoadStatus::Loaded => Color::from_rgb(0.12, 0.12, 0.13),
    };

    container::Style {
        background: Some(background.into()),
        text_color: Some(Color::from_rgb(0.62, 0.62, 0.65)),
        ..container::Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_source_keeps_previous_while_busy() {
        let state = LoadState {
            status: LoadStatus::Busy,
            next: "b.png".into(),
            prev: "a.png".into(),
        };

        assert_eq!(effective_source(&state, false), "a.png");
    }

    #[test]
    fn test_no_keep_blanks_the_slot_while_busy() {
        let state = LoadState {
            status: LoadStatus::Busy,
            next: "b.png".into(),
            prev: "a.png".into(),
        };

        assert_eq!(effective_source(&state, true), "");
    }

    #[test]
    fn test_settled_states_show_the_requested_source() {
        let mut state = LoadState {
            status: LoadStatus::Loaded,
            next: "b.png".into(),
            prev: "a.png".into(),
        };

        assert_eq!(effective_source(&state, false), "b.png");

        state.status = LoadStatus::Failed;
        assert_eq!(effective_source(&state, true), "b.png");
    }

    #[test]
    fn test_fresh_slot_has_no_source() {
        let state = LoadState::new();
        assert_eq!(effective_source(&state, false), "");
    }
}
