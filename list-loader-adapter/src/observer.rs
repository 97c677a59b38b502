use alloc::boxed::Box;

use list_loader::{ScrollMetrics, ScrollMode};

use crate::{ListenerId, ScrollListener, ScrollSurface};

/// The scroll capability a loader is mounted against.
///
/// Two implementations exist, selected by [`ScrollMode`]: [`ElementObserver`] for a bounded
/// container and [`WindowObserver`] for the viewport. Tests can implement this with a fake.
pub trait ViewportObserver {
    fn mode(&self) -> ScrollMode;

    fn metrics(&self) -> ScrollMetrics;

    /// Registers `listener` for scroll events until the returned [`Subscription`] is dropped.
    fn on_scroll(&self, listener: ScrollListener) -> Subscription;
}

/// A registered scroll listener.
///
/// Dropping the subscription removes exactly the listener it was created for, from the surface
/// it was registered on. This also runs during unwinding.
#[must_use = "dropping a Subscription removes its listener immediately"]
#[derive(Debug)]
pub struct Subscription {
    surface: ScrollSurface,
    id: Option<ListenerId>,
}

impl Subscription {
    pub fn new(surface: &ScrollSurface, listener: ScrollListener) -> Self {
        let id = surface.add_listener(listener);
        Self {
            surface: surface.clone(),
            id: Some(id),
        }
    }

    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some_and(|id| self.surface.has_listener(id))
    }

    /// Removes the listener now. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self) -> bool {
        match self.id.take() {
            Some(id) => self.surface.remove_listener(id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Observes the scroll position of a bounded element (`clientHeight`/`scrollTop`/`scrollHeight`).
#[derive(Clone, Debug)]
pub struct ElementObserver {
    surface: ScrollSurface,
}

impl ElementObserver {
    pub fn new(surface: &ScrollSurface) -> Self {
        Self {
            surface: surface.clone(),
        }
    }

    pub fn surface(&self) -> &ScrollSurface {
        &self.surface
    }
}

impl ViewportObserver for ElementObserver {
    fn mode(&self) -> ScrollMode {
        ScrollMode::Element
    }

    fn metrics(&self) -> ScrollMetrics {
        self.surface.metrics()
    }

    fn on_scroll(&self, listener: ScrollListener) -> Subscription {
        Subscription::new(&self.surface, listener)
    }
}

/// Observes the window (`innerHeight`/`scrollY`/document scroll height).
#[derive(Clone, Debug)]
pub struct WindowObserver {
    surface: ScrollSurface,
}

impl WindowObserver {
    pub fn new(surface: &ScrollSurface) -> Self {
        Self {
            surface: surface.clone(),
        }
    }

    pub fn surface(&self) -> &ScrollSurface {
        &self.surface
    }
}

impl ViewportObserver for WindowObserver {
    fn mode(&self) -> ScrollMode {
        ScrollMode::Window
    }

    fn metrics(&self) -> ScrollMetrics {
        self.surface.metrics()
    }

    fn on_scroll(&self, listener: ScrollListener) -> Subscription {
        Subscription::new(&self.surface, listener)
    }
}

/// Picks the observer for `mode`: the list's own container or the window.
pub fn observer_for(
    mode: ScrollMode,
    element: &ScrollSurface,
    window: &ScrollSurface,
) -> Box<dyn ViewportObserver> {
    match mode {
        ScrollMode::Element => Box::new(ElementObserver::new(element)),
        ScrollMode::Window => Box::new(WindowObserver::new(window)),
    }
}
