use crate::ScrollRatio;

/// Which scroll position a loader observes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollMode {
    /// A bounded scrollable container owned by the list.
    Element,
    /// The whole viewport.
    #[default]
    Window,
}

impl ScrollMode {
    pub fn is_element(self) -> bool {
        matches!(self, Self::Element)
    }
}

/// Scroll geometry read from the observed target.
///
/// For an element this is `clientHeight` / `scrollTop` / `scrollHeight`; for the window it is
/// the viewport height, the vertical scroll position and the document scroll height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollMetrics {
    pub visible: u64,
    pub offset: u64,
    pub total: u64,
}

impl ScrollMetrics {
    pub fn new(visible: u64, offset: u64, total: u64) -> Self {
        Self {
            visible,
            offset,
            total,
        }
    }

    pub fn ratio(&self) -> Option<ScrollRatio> {
        crate::scroll_ratio(self.visible, self.offset, self.total)
    }

    /// `true` when all content fits in the visible extent, i.e. there is no scrollbar.
    pub fn is_exhausted(&self) -> bool {
        self.total == self.visible
    }

    /// The largest valid scroll offset for this geometry.
    pub fn max_offset(&self) -> u64 {
        self.total.saturating_sub(self.visible)
    }
}

/// The externally owned list state a loader reads on every decision.
///
/// The loader only needs the item count; the items themselves stay with the owner and are
/// addressed by index when rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListState {
    pub len: usize,
    /// Last successfully loaded page (1-based).
    pub page: u32,
    pub has_next_page: bool,
    pub is_next_page_loading: bool,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            len: 0,
            page: 1,
            has_next_page: false,
            is_next_page_loading: false,
        }
    }
}

impl ListState {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` when another page exists and none is in flight.
    pub fn can_request(&self) -> bool {
        self.has_next_page && !self.is_next_page_loading
    }

    pub fn shows_loading_indicator(&self) -> bool {
        self.is_next_page_loading && self.has_next_page
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestKind {
    /// Advance to `page + 1`.
    Next,
    /// Re-request the current page to backfill removed items.
    Refetch,
}

/// A page number handed to `load_next_page`, and why it was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    pub page: u32,
    pub kind: RequestKind,
}
