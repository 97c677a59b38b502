use alloc::string::String;
use alloc::sync::Arc;

use crate::{ScrollMode, ScrollRatio};

/// A callback that starts fetching the given page.
///
/// It is fire-and-forget: completion is observed later through a changed [`crate::ListState`]
/// (new `len`/`page`, cleared `is_next_page_loading`). The owner of the list state is expected
/// to flip `is_next_page_loading` to `true` before the next scroll event is delivered.
pub type LoadNextPage = Arc<dyn Fn(u32) + Send + Sync>;

/// Configuration for [`crate::ListLoader`].
///
/// Cheap to clone: the callback is stored in an `Arc`.
pub struct LoaderOptions {
    pub load_next_page: Option<LoadNextPage>,

    /// Re-request the current page instead of `page + 1`.
    ///
    /// Set by the list owner after deletions left a gap in the last loaded page.
    pub refetch_page: bool,

    pub mode: ScrollMode,

    /// Render rows as a bare sequence, without a wrapping container.
    pub no_container: bool,

    /// Opaque styling passed through to the container node.
    pub style: Option<String>,

    /// Loading starts once the scroll ratio is strictly greater than this.
    pub threshold: ScrollRatio,

    pub show_loading_indicator: bool,
}

impl Clone for LoaderOptions {
    fn clone(&self) -> Self {
        Self {
            load_next_page: self.load_next_page.clone(),
            refetch_page: self.refetch_page,
            mode: self.mode,
            no_container: self.no_container,
            style: self.style.clone(),
            threshold: self.threshold,
            show_loading_indicator: self.show_loading_indicator,
        }
    }
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderOptions {
    /// Window-scoped options with no callback and the default `0.8` threshold.
    pub fn new() -> Self {
        Self {
            load_next_page: None,
            refetch_page: false,
            mode: ScrollMode::Window,
            no_container: false,
            style: None,
            threshold: ScrollRatio::DEFAULT_THRESHOLD,
            show_loading_indicator: true,
        }
    }

    pub fn with_load_next_page(
        mut self,
        load_next_page: impl Fn(u32) + Send + Sync + 'static,
    ) -> Self {
        self.load_next_page = Some(Arc::new(load_next_page));
        self
    }

    pub fn with_refetch_page(mut self, refetch_page: bool) -> Self {
        self.refetch_page = refetch_page;
        self
    }

    pub fn with_mode(mut self, mode: ScrollMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `with_mode(ScrollMode::Element)` / `with_mode(ScrollMode::Window)`.
    pub fn with_is_element(self, is_element: bool) -> Self {
        self.with_mode(if is_element {
            ScrollMode::Element
        } else {
            ScrollMode::Window
        })
    }

    pub fn with_no_container(mut self, no_container: bool) -> Self {
        self.no_container = no_container;
        self
    }

    pub fn with_style(mut self, style: Option<impl Into<String>>) -> Self {
        self.style = style.map(Into::into);
        self
    }

    pub fn with_threshold(mut self, threshold: ScrollRatio) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_show_loading_indicator(mut self, show: bool) -> Self {
        self.show_loading_indicator = show;
        self
    }
}

impl core::fmt::Debug for LoaderOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("refetch_page", &self.refetch_page)
            .field("mode", &self.mode)
            .field("no_container", &self.no_container)
            .field("style", &self.style)
            .field("threshold", &self.threshold)
            .field("show_loading_indicator", &self.show_loading_indicator)
            .finish_non_exhaustive()
    }
}
