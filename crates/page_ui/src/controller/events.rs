//! Events fed to the page controller.

/// Discrete things that happen on the page, in the order the host observes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Mount,
    Unmount,
    UserFilterChanged(String),
    FromChanged(String),
    ToChanged(String),
    SearchClicked,
    RetryClicked,
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Unmount => "unmount",
            Self::UserFilterChanged(_) => "user_filter_changed",
            Self::FromChanged(_) => "from_changed",
            Self::ToChanged(_) => "to_changed",
            Self::SearchClicked => "search_clicked",
            Self::RetryClicked => "retry_clicked",
        }
    }
}
