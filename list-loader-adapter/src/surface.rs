use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use list_loader::ScrollMetrics;

/// A scroll event handler registered on a [`ScrollSurface`].
pub type ScrollListener = Box<dyn FnMut(ScrollMetrics)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListenerId(u64);

type SharedListener = Rc<RefCell<ScrollListener>>;

struct Inner {
    metrics: ScrollMetrics,
    next_id: u64,
    listeners: Vec<(ListenerId, SharedListener)>,
}

/// An in-memory scrollable region: a bounded element or the window.
///
/// Handles are cheap to clone and share the same state. Adapters mirror the real geometry into
/// it (`set_extents`, `scroll_to`) and it delivers scroll events to registered listeners, the
/// way a DOM element or `window` would.
#[derive(Clone)]
pub struct ScrollSurface {
    inner: Rc<RefCell<Inner>>,
}

impl ScrollSurface {
    /// Creates a surface scrolled to the top.
    pub fn new(visible: u64, total: u64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                metrics: ScrollMetrics::new(visible, 0, total.max(visible)),
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.inner.borrow().metrics
    }

    /// Updates the visible and content extents after a layout change.
    ///
    /// Content never reports less than the visible extent (a short document still fills the
    /// viewport), and the offset is clamped to the new range. No scroll event is delivered.
    pub fn set_extents(&self, visible: u64, content: u64) {
        let mut inner = self.inner.borrow_mut();
        let total = content.max(visible);
        let offset = inner.metrics.offset.min(total.saturating_sub(visible));
        inner.metrics = ScrollMetrics::new(visible, offset, total);
    }

    pub fn set_content_extent(&self, content: u64) {
        let visible = self.metrics().visible;
        self.set_extents(visible, content);
    }

    /// Scrolls to `offset` (clamped) and delivers a scroll event if the position changed.
    ///
    /// Returns the applied offset.
    pub fn scroll_to(&self, offset: u64) -> u64 {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let clamped = offset.min(inner.metrics.max_offset());
            let changed = clamped != inner.metrics.offset;
            inner.metrics.offset = clamped;
            changed
        };
        if changed {
            self.dispatch_scroll();
        }
        self.metrics().offset
    }

    pub fn scroll_by(&self, delta: i64) -> u64 {
        let current = self.metrics().offset;
        let target = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as u64)
        };
        self.scroll_to(target)
    }

    pub fn scroll_to_end(&self) -> u64 {
        let end = self.metrics().max_offset();
        self.scroll_to(end)
    }

    pub fn add_listener(&self, listener: ScrollListener) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(RefCell::new(listener))));
        atrace!(?id, count = inner.listeners.len(), "add_listener");
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(l, _)| *l != id);
        atrace!(?id, count = inner.listeners.len(), "remove_listener");
        inner.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow().listeners.iter().any(|(l, _)| *l == id)
    }

    /// Delivers a scroll event at the current position to every registered listener.
    ///
    /// Listeners may add or remove listeners and scroll the surface. A listener removed during
    /// dispatch is not called, and a listener that is already running is not re-entered.
    pub fn dispatch_scroll(&self) {
        let snapshot: Vec<(ListenerId, SharedListener)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(id, l)| (*id, Rc::clone(l)))
            .collect();

        for (id, listener) in snapshot {
            if !self.has_listener(id) {
                continue;
            }
            let Ok(mut listener) = listener.try_borrow_mut() else {
                awarn!(?id, "scroll listener re-entered; skipping");
                continue;
            };
            let metrics = self.metrics();
            (*listener)(metrics);
        }
    }
}

impl fmt::Debug for ScrollSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ScrollSurface")
            .field("metrics", &inner.metrics)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
