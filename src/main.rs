use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Alignment, Element, Length, Point, Rectangle, Size, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use walkdir::WalkDir;

mod load;
mod state;
mod ui;
mod widget;

use load::{ImageFetcher, LoadError, WebImageLoader};
use state::gallery::{self, Gallery, GalleryEntry};
use ui::inview::{Offset, Scope};
use widget::lazy_image::LazyImage;
use widget::props::{ImageAttrs, ImageOptions};
use widget::status::LoadStatus;

/// Fixed card geometry, so every slot's visibility region is computable
/// without asking the layout engine
const CARD_WIDTH: f32 = 420.0;
const CARD_HEIGHT: f32 = 240.0;
const CARD_SPACING: f32 = 16.0;
const LIST_PADDING: f32 = 16.0;

/// Assumed viewport until the first scroll report arrives
const WINDOW_WIDTH: f32 = 960.0;
const WINDOW_HEIGHT: f32 = 720.0;

/// Result of a folder import operation
#[derive(Debug, Clone)]
struct ImportResult {
    entries: Vec<GalleryEntry>,
}

/// One gallery slot, addressed by a stable id so a fetch completion can
/// never land on the wrong (or an already removed) widget
struct Slot {
    id: u64,
    entry: GalleryEntry,
    widget: LazyImage,
}

/// Main application state
struct LazyGallery {
    /// Shared platform loader; decoded images live here
    images: Arc<WebImageLoader>,
    /// The persisted manifest
    gallery: Gallery,
    manifest_path: PathBuf,
    /// Live slots, in display order
    slots: Vec<Slot>,
    next_id: u64,
    /// Current visible window of the gallery, in content coordinates
    window: Rectangle,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Import Folder" button
    ImportFolder,
    /// Background folder scan completed
    ImportComplete(ImportResult),
    /// The gallery scrollable moved
    Scrolled(scrollable::Viewport),
    /// An asynchronous fetch finished, tagged with the slot and the exact
    /// source it was started for
    Fetched {
        id: u64,
        src: String,
        result: Result<(), LoadError>,
    },
    /// User removed a slot
    Remove(u64),
}

fn gallery_scroll_id() -> scrollable::Id {
    scrollable::Id::new("gallery")
}

impl LazyGallery {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let manifest_path = PathBuf::from("gallery.json");

        let gallery = match Gallery::load(&manifest_path) {
            Ok(gallery) => {
                println!("📁 Loaded {} gallery entries", gallery.entries.len());
                gallery
            }
            Err(_) => Gallery::default(),
        };

        let mut app = LazyGallery {
            images: Arc::new(WebImageLoader::new()),
            gallery,
            manifest_path,
            slots: Vec::new(),
            next_id: 0,
            window: Rectangle::new(Point::ORIGIN, Size::new(WINDOW_WIDTH, WINDOW_HEIGHT)),
            status: String::from("Ready."),
        };

        let entries = app.gallery.entries.clone();
        let mut tasks: Vec<Task<Message>> =
            entries.iter().map(|entry| app.add_slot(entry)).collect();

        // lazy slots already inside the assumed window load right away
        app.sync_regions();
        tasks.push(app.observe_all());
        app.refresh_status();

        (app, Task::batch(tasks))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ImportFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Folder with Images")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    self.status = format!("Importing from {}...", folder_path.display());
                    return Task::perform(scan_folder_async(folder_path), Message::ImportComplete);
                }

                Task::none()
            }
            Message::ImportComplete(result) => {
                let total = result.entries.len();
                let mut added = 0;
                let mut tasks = Vec::new();

                for entry in result.entries {
                    if self.gallery.push_unique(entry.clone()) {
                        tasks.push(self.add_slot(&entry));
                        added += 1;
                    }
                }

                self.sync_regions();
                tasks.push(self.observe_all());

                if let Err(e) = self.gallery.save(&self.manifest_path) {
                    eprintln!("⚠️  Failed to save manifest: {}", e);
                }

                self.status = format!(
                    "✅ Import complete! Added {} images, skipped {} duplicates.",
                    added,
                    total - added
                );
                println!("📊 Import summary: {} new, {} skipped", added, total - added);

                Task::batch(tasks)
            }
            Message::Scrolled(viewport) => {
                let offset = viewport.absolute_offset();
                self.window =
                    Rectangle::new(Point::new(offset.x, offset.y), viewport.bounds().size());
                self.observe_all()
            }
            Message::Fetched { id, src, result } => {
                match self.slots.iter_mut().find(|slot| slot.id == id) {
                    Some(slot) => slot.widget.finish(&src, result),
                    // slot was removed while its fetch was in flight
                    None => println!("🗑️  Dropped completion for removed slot ({})", src),
                }
                self.refresh_status();
                Task::none()
            }
            Message::Remove(id) => {
                self.slots.retain(|slot| slot.id != id);
                self.gallery.entries = self.slots.iter().map(|slot| slot.entry.clone()).collect();

                if let Err(e) = self.gallery.save(&self.manifest_path) {
                    eprintln!("⚠️  Failed to save manifest: {}", e);
                }

                // rows shifted: other slots may have scrolled into view
                self.sync_regions();
                self.refresh_status();
                self.observe_all()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = row![
            text("Lazy Gallery").size(28),
            button("Import Folder")
                .on_press(Message::ImportFolder)
                .padding(10),
            text(&self.status).size(14),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let mut list = Column::new().spacing(CARD_SPACING).padding(LIST_PADDING);
        for slot in &self.slots {
            list = list.push(card(slot));
        }

        let body = scrollable(list)
            .id(gallery_scroll_id())
            .on_scroll(Message::Scrolled)
            .width(Length::Fill)
            .height(Length::Fill);

        column![header, body].spacing(10).padding(16).into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Create a slot for `entry` and start its first load when not lazy
    fn add_slot(&mut self, entry: &GalleryEntry) -> Task<Message> {
        let id = self.next_id;
        self.next_id += 1;

        let mut opts = ImageOptions::new(entry.src.clone());
        opts.lazy = entry.lazy;
        opts.no_keep = entry.no_keep;
        opts.lazy_offset = Offset::all(entry.offset);
        opts.attrs = ImageAttrs {
            height: Some(CARD_HEIGHT),
            ..ImageAttrs::default()
        };

        let label = entry.src.clone();
        let mut slot_widget = LazyImage::new(
            self.images.clone(),
            opts,
            Some(Box::new(move |status: LoadStatus| {
                println!("🖼️  {} → {}", label, status);
            })),
        );

        let pending = slot_widget.mount();
        self.slots.push(Slot {
            id,
            entry: entry.clone(),
            widget: slot_widget,
        });

        self.fetch(id, pending)
    }

    /// Spawn the asynchronous fetch a slot asked for, if any
    fn fetch(&self, id: u64, pending: Option<String>) -> Task<Message> {
        match pending {
            Some(src) => {
                let images: Arc<dyn ImageFetcher> = self.images.clone();
                Task::perform(
                    async move {
                        let result = images.fetch(src.clone()).await;
                        (src, result)
                    },
                    move |(src, result)| Message::Fetched { id, src, result },
                )
            }
            None => Task::none(),
        }
    }

    /// Recompute every slot's tracked region from its row index
    fn sync_regions(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let y = LIST_PADDING + index as f32 * (CARD_HEIGHT + CARD_SPACING);
            slot.widget.set_region(Rectangle::new(
                Point::new(LIST_PADDING, y),
                Size::new(CARD_WIDTH, CARD_HEIGHT),
            ));
        }
    }

    /// Feed the current window to every watcher and spawn the loads that
    /// became due
    fn observe_all(&mut self) -> Task<Message> {
        let scope = Scope::Scrollable(gallery_scroll_id());
        let window = self.window;

        let mut due = Vec::new();
        for slot in &mut self.slots {
            if let Some(src) = slot.widget.observe(&scope, window) {
                due.push((slot.id, src));
            }
        }

        Task::batch(due.into_iter().map(|(id, src)| self.fetch(id, Some(src))))
    }

    fn refresh_status(&mut self) {
        let loaded = self
            .slots
            .iter()
            .filter(|slot| slot.widget.status() == LoadStatus::Loaded)
            .count();
        let failed = self
            .slots
            .iter()
            .filter(|slot| slot.widget.status() == LoadStatus::Failed)
            .count();

        self.status = format!(
            "{} images, {} loaded, {} failed",
            self.slots.len(),
            loaded,
            failed
        );
    }
}

/// Build the card for one slot
fn card(slot: &Slot) -> Element<'static, Message> {
    let details = column![
        text(slot.entry.src.clone()).size(14),
        text(format!("status: {}", slot.widget.status())).size(12),
        button("Remove")
            .on_press(Message::Remove(slot.id))
            .padding(6),
    ]
    .spacing(8)
    .width(Length::Fill);

    let picture = container(ui::view::lazy_image(&slot.widget))
        .width(Length::Fixed(CARD_WIDTH))
        .height(Length::Fixed(CARD_HEIGHT));

    container(row![picture, details].spacing(16).align_y(Alignment::Center))
        .height(Length::Fixed(CARD_HEIGHT))
        .into()
}

fn main() -> iced::Result {
    iced::application("Lazy Gallery", LazyGallery::update, LazyGallery::view)
        .theme(LazyGallery::theme)
        .window_size(Size::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .centered()
        .run_with(LazyGallery::new)
}

/// Scan a folder for image files and build gallery entries for them.
/// Runs in a background task to avoid blocking the UI.
async fn scan_folder_async(folder_path: PathBuf) -> ImportResult {
    println!("🔍 Scanning folder: {}", folder_path.display());

    let entries = tokio::task::spawn_blocking(move || {
        let mut entries = Vec::new();

        // Walk the directory tree recursively
        for entry in WalkDir::new(&folder_path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() || !gallery::is_image_file(path) {
                continue;
            }

            entries.push(GalleryEntry::new(path.to_string_lossy().to_string()));
        }

        entries
    })
    .await
    .unwrap_or_default();

    println!("✅ Scan complete: {} image files found", entries.len());

    ImportResult { entries }
}
