use alloc::vec::Vec;
use core::cell::Cell;

use crate::{
    Container, ListState, LoaderOptions, Node, PageRequest, Rendered, RequestKind, ScrollMetrics,
    ScrollMode, ScrollRatio,
};

/// A headless incremental list loader.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold the items or any UI objects.
/// - Your adapter drives it with scroll metrics and the current [`ListState`].
/// - It calls `load_next_page` (if configured) and also returns the [`PageRequest`] it issued,
///   so adapters without a callback can act on the return value.
///
/// For listener lifecycle management (mount/unmount against an element or the window), see the
/// `list-loader-adapter` crate.
#[derive(Debug)]
pub struct ListLoader {
    options: LoaderOptions,
    dispatching: Cell<bool>,
}

struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Clone for ListLoader {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            dispatching: Cell::new(false),
        }
    }
}

impl Default for ListLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::new())
    }
}

impl ListLoader {
    pub fn new(options: LoaderOptions) -> Self {
        ldebug!(
            mode = ?options.mode,
            refetch_page = options.refetch_page,
            no_container = options.no_container,
            "ListLoader::new"
        );
        Self {
            options,
            dispatching: Cell::new(false),
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: LoaderOptions) {
        self.options = options;
    }

    /// Clones the current options, applies `f`, then stores the result.
    pub fn update_options(&mut self, f: impl FnOnce(&mut LoaderOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn mode(&self) -> ScrollMode {
        self.options.mode
    }

    pub fn refetch_page(&self) -> bool {
        self.options.refetch_page
    }

    pub fn set_refetch_page(&mut self, refetch_page: bool) {
        self.options.refetch_page = refetch_page;
    }

    /// `true` while `load_next_page` is running.
    pub fn is_dispatching(&self) -> bool {
        self.dispatching.get()
    }

    /// The page a scroll-triggered load would request for `state`.
    pub fn next_page(&self, state: &ListState) -> PageRequest {
        if self.options.refetch_page {
            PageRequest {
                page: state.page,
                kind: RequestKind::Refetch,
            }
        } else {
            PageRequest {
                page: state.page.saturating_add(1),
                kind: RequestKind::Next,
            }
        }
    }

    /// The scroll-trigger condition.
    ///
    /// Requires a measurable ratio strictly above the threshold, a non-empty list, another page
    /// to load and no load in flight.
    pub fn should_load(&self, ratio: Option<ScrollRatio>, state: &ListState) -> bool {
        let Some(ratio) = ratio else {
            return false;
        };
        state.can_request() && !state.is_empty() && ratio > self.options.threshold
    }

    /// Handles a scroll event on the observed target.
    ///
    /// Calls `load_next_page` at most once and returns the request it issued.
    pub fn on_scroll(&self, metrics: ScrollMetrics, state: &ListState) -> Option<PageRequest> {
        let ratio = metrics.ratio();
        ltrace!(?metrics, ?ratio, ?state, "on_scroll");
        if !self.should_load(ratio, state) {
            return None;
        }
        self.dispatch(self.next_page(state))
    }

    /// Runs the shrink correction after the list state changed.
    ///
    /// In window mode, when the document no longer has a scrollbar (`total == visible`) and the
    /// owner asked for a refetch, the current page is requested again so the gap left by
    /// deleted items gets backfilled without waiting for a scroll event that can no longer
    /// happen. Element-scoped lists are never corrected.
    pub fn on_update(
        &self,
        window_metrics: ScrollMetrics,
        state: &ListState,
    ) -> Option<PageRequest> {
        if self.options.mode.is_element() {
            return None;
        }
        if !window_metrics.is_exhausted() || !state.can_request() || !self.options.refetch_page {
            return None;
        }
        ldebug!(page = state.page, "shrink correction");
        self.dispatch(PageRequest {
            page: state.page,
            kind: RequestKind::Refetch,
        })
    }

    fn dispatch(&self, request: PageRequest) -> Option<PageRequest> {
        if self.dispatching.get() {
            lwarn!(
                page = request.page,
                "load_next_page re-entered from its own callback; dropping request"
            );
            return None;
        }
        ldebug!(page = request.page, kind = ?request.kind, "load_next_page");
        if let Some(load) = &self.options.load_next_page {
            self.dispatching.set(true);
            let _guard = DispatchGuard(&self.dispatching);
            load(request.page);
        }
        Some(request)
    }

    /// Renders one row per item plus, while the next page is loading, a loading indicator.
    pub fn render<R>(
        &self,
        state: &ListState,
        mut row_renderer: impl FnMut(usize) -> R,
    ) -> Rendered<R> {
        let show_loading = self.options.show_loading_indicator && state.shows_loading_indicator();
        let mut nodes = Vec::with_capacity(state.len + usize::from(show_loading));
        for index in 0..state.len {
            nodes.push(Node::Row {
                index,
                content: row_renderer(index),
            });
        }
        if show_loading {
            nodes.push(Node::Loading);
        }

        if self.options.no_container {
            return Rendered::Bare(nodes);
        }
        Rendered::Container(Container {
            scrollable: self.options.mode.is_element(),
            style: self.options.style.clone(),
            children: nodes,
        })
    }
}
