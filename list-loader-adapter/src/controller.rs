use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use list_loader::{
    ListLoader, ListState, LoaderOptions, PageRequest, Rendered, ScrollMetrics, ScrollMode,
};

use crate::{ScrollSurface, Subscription, ViewportObserver, WindowObserver, observer_for};

/// Where a mounted loader reads the current list state from.
pub trait ListStateSource {
    fn list_state(&self) -> ListState;
}

impl<F: Fn() -> ListState> ListStateSource for F {
    fn list_state(&self) -> ListState {
        self()
    }
}

type RequestHandler = Box<dyn FnMut(PageRequest)>;

struct Shared {
    loader: RefCell<ListLoader>,
    source: Box<dyn ListStateSource>,
    handler: RefCell<Option<RequestHandler>>,
    last_request: Cell<Option<PageRequest>>,
    request_count: Cell<usize>,
}

impl Shared {
    fn handle_scroll(&self, metrics: ScrollMetrics) {
        let state = self.source.list_state();
        let request = self.loader.borrow().on_scroll(metrics, &state);
        self.record(request);
    }

    fn record(&self, request: Option<PageRequest>) -> Option<PageRequest> {
        let request = request?;
        self.last_request.set(Some(request));
        self.request_count.set(self.request_count.get() + 1);
        match self.handler.try_borrow_mut() {
            Ok(mut handler) => {
                if let Some(handler) = handler.as_mut() {
                    handler(request);
                }
            }
            Err(_) => {
                awarn!(page = request.page, "request handler re-entered; skipping");
            }
        }
        Some(request)
    }
}

/// A [`ListLoader`] mounted against a scroll target.
///
/// Mounting attaches exactly one scroll listener: to the list's own container in element mode,
/// to the window otherwise. Unmounting (or dropping the controller) removes exactly that
/// listener.
///
/// Besides the loader's thread-safe `load_next_page` callback, a local request handler can be
/// installed for single-threaded stores (see [`Controller::set_request_handler`]). It runs
/// synchronously inside the scroll event, so a store that flips its loading flag there blocks
/// duplicate requests from the very next event.
pub struct Controller {
    shared: Rc<Shared>,
    mode: ScrollMode,
    window: WindowObserver,
    observer: Box<dyn ViewportObserver>,
    subscription: Option<Subscription>,
}

impl Controller {
    pub fn mount(
        loader: ListLoader,
        element: &ScrollSurface,
        window: &ScrollSurface,
        source: impl ListStateSource + 'static,
    ) -> Self {
        let mode = loader.mode();
        let observer = observer_for(mode, element, window);
        Self::mount_with_observer(loader, observer, window, source)
    }

    /// Mounts against an explicit observer. `window` is still used for the shrink correction.
    pub fn mount_with_observer(
        loader: ListLoader,
        observer: Box<dyn ViewportObserver>,
        window: &ScrollSurface,
        source: impl ListStateSource + 'static,
    ) -> Self {
        let mode = loader.mode();
        debug_assert_eq!(observer.mode(), mode, "observer does not match the loader mode");
        let shared = Rc::new(Shared {
            loader: RefCell::new(loader),
            source: Box::new(source),
            handler: RefCell::new(None),
            last_request: Cell::new(None),
            request_count: Cell::new(0),
        });
        let subscription = observer.on_scroll({
            let shared = Rc::clone(&shared);
            Box::new(move |metrics| shared.handle_scroll(metrics))
        });
        adebug!(?mode, "Controller::mount");
        Self {
            shared,
            mode,
            window: WindowObserver::new(window),
            observer,
            subscription: Some(subscription),
        }
    }

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Removes the scroll listener. Later scroll events are ignored.
    pub fn unmount(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
            adebug!(mode = ?self.mode, "Controller::unmount");
        }
    }

    pub fn set_request_handler(&mut self, handler: impl FnMut(PageRequest) + 'static) {
        *self.shared.handler.borrow_mut() = Some(Box::new(handler));
    }

    pub fn list_state(&self) -> ListState {
        self.shared.source.list_state()
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.observer.metrics()
    }

    pub fn last_request(&self) -> Option<PageRequest> {
        self.shared.last_request.get()
    }

    pub fn request_count(&self) -> usize {
        self.shared.request_count.get()
    }

    /// Applies `f` to the loader options. The scroll mode is fixed once mounted.
    pub fn update_options(&mut self, f: impl FnOnce(&mut LoaderOptions)) {
        let mode = self.mode;
        self.shared.loader.borrow_mut().update_options(|o| {
            f(o);
            o.mode = mode;
        });
    }

    pub fn set_refetch_page(&mut self, refetch_page: bool) {
        self.shared.loader.borrow_mut().set_refetch_page(refetch_page);
    }

    /// Runs the loader on the current position without waiting for a scroll event.
    pub fn check_scroll(&self) -> Option<PageRequest> {
        if !self.is_mounted() {
            return None;
        }
        let state = self.list_state();
        let request = self
            .shared
            .loader
            .borrow()
            .on_scroll(self.observer.metrics(), &state);
        self.shared.record(request)
    }

    /// Call after the list state changed (items added or removed).
    ///
    /// Runs the shrink correction against the window geometry. It only fires while
    /// `refetch_page` is set, and the controller never clears that flag itself. The list owner
    /// resets it with [`Controller::set_refetch_page`] once the refetched page has landed, e.g.
    /// `set_refetch_page(store.needs_refetch())` after every store change. Otherwise every later
    /// scroll re-requests the same page instead of `page + 1`.
    pub fn update(&self) -> Option<PageRequest> {
        if !self.is_mounted() {
            return None;
        }
        let state = self.list_state();
        let request = self
            .shared
            .loader
            .borrow()
            .on_update(self.window.metrics(), &state);
        self.shared.record(request)
    }

    pub fn render<R>(&self, row_renderer: impl FnMut(usize) -> R) -> Rendered<R> {
        let state = self.list_state();
        self.shared.loader.borrow().render(&state, row_renderer)
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("mode", &self.mode)
            .field("mounted", &self.is_mounted())
            .field("last_request", &self.last_request())
            .field("request_count", &self.request_count())
            .finish_non_exhaustive()
    }
}
