/// Loading status of a single image slot.
///
/// Every slot starts at `Mounted` and moves through the machine in
/// `widget::machine`; there are no other states and no sub-states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Created, nothing requested yet
    Mounted,
    /// A fetch is in flight
    Busy,
    /// The fetch succeeded
    Loaded,
    /// The fetch errored
    Failed,
}

impl LoadStatus {
    /// Short token for logs and status lines
    pub fn as_str(self) -> &'static str {
        match self {
            LoadStatus::Mounted => "mount",
            LoadStatus::Busy => "busy",
            LoadStatus::Loaded => "load",
            LoadStatus::Failed => "error",
        }
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load state owned by exactly one image slot.
///
/// `next` is the source currently considered current (being loaded or already
/// loaded); empty means "no source". `prev` holds the `next` value from
/// immediately before the most recent transition that changed `next`, so a
/// renderer can keep showing the old image while the new one is busy.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState {
    pub status: LoadStatus,
    pub next: String,
    pub prev: String,
}

impl LoadState {
    pub fn new() -> Self {
        LoadState {
            status: LoadStatus::Mounted,
            next: String::new(),
            prev: String::new(),
        }
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = LoadState::new();
        assert_eq!(state.status, LoadStatus::Mounted);
        assert_eq!(state.next, "");
        assert_eq!(state.prev, "");
    }

    #[test]
    fn test_status_tokens() {
        assert_eq!(LoadStatus::Mounted.as_str(), "mount");
        assert_eq!(LoadStatus::Busy.as_str(), "busy");
        assert_eq!(LoadStatus::Loaded.as_str(), "load");
        assert_eq!(LoadStatus::Failed.as_str(), "error");
    }
}
