use crate::*;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use list_loader::{
    ListLoader, ListState, LoaderOptions, Node, PageRequest, RequestKind, ScrollMode,
};

const ROW: u64 = 100;

fn store_with_pages(per_page: u32, pages: u32) -> SharedPagedList<u32, u32> {
    let store = SharedPagedList::new(PagedList::new(per_page as usize, |id: &u32| *id));
    for page in 1..=pages {
        let mut list = store.borrow_mut();
        list.begin_load(page).unwrap();
        let start = (page - 1) * per_page;
        list.finish_load(page, start..start + per_page, true).unwrap();
    }
    store
}

/// Records every request and feeds it into the store, like a dispatch that flips the loading
/// flag before the fetch resolves.
fn wire_store(
    controller: &mut Controller,
    store: &SharedPagedList<u32, u32>,
) -> Rc<RefCell<Vec<PageRequest>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let store = store.clone();
    let sink = Rc::clone(&seen);
    controller.set_request_handler(move |req| {
        sink.borrow_mut().push(req);
        store.borrow_mut().begin_load(req.page).unwrap();
    });
    seen
}

#[test]
fn element_mode_listens_on_element_only() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 1000);
    let mut c = Controller::mount(
        ListLoader::new(LoaderOptions::new().with_is_element(true)),
        &element,
        &window,
        ListState::default,
    );
    assert_eq!(c.mode(), ScrollMode::Element);
    assert_eq!(element.listener_count(), 1);
    assert_eq!(window.listener_count(), 0);
    assert!(c.is_mounted());

    c.unmount();
    assert!(!c.is_mounted());
    assert_eq!(element.listener_count(), 0);
    assert_eq!(window.listener_count(), 0);
}

#[test]
fn window_mode_listens_on_window_only() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 1000);
    let c = Controller::mount(
        ListLoader::new(LoaderOptions::new()),
        &element,
        &window,
        ListState::default,
    );
    assert_eq!(window.listener_count(), 1);
    assert_eq!(element.listener_count(), 0);

    drop(c);
    assert_eq!(window.listener_count(), 0);
}

#[test]
fn unmount_removes_only_its_own_listener() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 1000);
    let other_calls = Rc::new(Cell::new(0usize));
    let _other = WindowObserver::new(&window).on_scroll({
        let other_calls = Rc::clone(&other_calls);
        Box::new(move |_| other_calls.set(other_calls.get() + 1))
    });

    let mut a = Controller::mount(ListLoader::default(), &element, &window, ListState::default);
    let b = Controller::mount(ListLoader::default(), &element, &window, ListState::default);
    assert_eq!(window.listener_count(), 3);

    a.unmount();
    a.unmount();
    assert_eq!(window.listener_count(), 2);
    assert!(b.is_mounted());

    window.set_content_extent(2000);
    window.scroll_to(10);
    assert_eq!(other_calls.get(), 1);
}

#[test]
fn scrolling_the_window_loads_pages_in_order() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 1000);
    let store = store_with_pages(20, 1);
    window.set_content_extent(store.borrow().len() as u64 * ROW);

    let mut c = Controller::mount(ListLoader::default(), &element, &window, store.clone());
    let seen = wire_store(&mut c, &store);

    // (1000 + 500) / 2000 = 0.75 -> 0.8, not above the threshold
    window.scroll_to(500);
    assert!(seen.borrow().is_empty());

    // 0.9
    window.scroll_to(800);
    assert_eq!(
        *seen.borrow(),
        vec![PageRequest {
            page: 2,
            kind: RequestKind::Next
        }]
    );
    assert!(store.borrow().is_loading());

    // Further events while loading request nothing.
    window.scroll_to(900);
    window.scroll_to(1000);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(c.request_count(), 1);

    store.borrow_mut().finish_load(2, 20..40, true).unwrap();
    window.set_content_extent(store.borrow().len() as u64 * ROW);
    window.scroll_to(3000);
    assert_eq!(seen.borrow().last().map(|r| r.page), Some(3));
    assert_eq!(c.last_request().map(|r| r.page), Some(3));
}

#[test]
fn element_scroll_drives_element_mode() {
    let element = ScrollSurface::new(400, 2000);
    let window = ScrollSurface::new(1000, 5000);
    let store = store_with_pages(20, 1);
    let mut c = Controller::mount(
        ListLoader::new(LoaderOptions::new().with_mode(ScrollMode::Element)),
        &element,
        &window,
        store.clone(),
    );
    let seen = wire_store(&mut c, &store);

    window.scroll_to(4000);
    assert!(seen.borrow().is_empty());

    // (400 + 1400) / 2000 = 0.9
    element.scroll_to(1400);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(c.metrics().offset, 1400);
}

#[test]
fn no_events_after_unmount() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 2000);
    let store = store_with_pages(20, 1);
    let mut c = Controller::mount(ListLoader::default(), &element, &window, store.clone());
    let seen = wire_store(&mut c, &store);

    c.unmount();
    window.scroll_to_end();
    assert!(seen.borrow().is_empty());
    assert_eq!(c.check_scroll(), None);
    assert_eq!(c.update(), None);
}

#[test]
fn check_scroll_evaluates_current_position() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 2000);
    let store = store_with_pages(20, 1);
    window.scroll_to(1000);

    // Mounted after the user already scrolled to the bottom.
    let mut c = Controller::mount(ListLoader::default(), &element, &window, store.clone());
    let seen = wire_store(&mut c, &store);
    assert_eq!(c.check_scroll().map(|r| r.page), Some(2));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn deletion_that_removes_scrollbar_refetches_current_page() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 1000);
    let store = store_with_pages(10, 2);
    window.set_content_extent(store.borrow().len() as u64 * ROW);
    assert!(!window.metrics().is_exhausted());

    let mut c = Controller::mount(ListLoader::default(), &element, &window, store.clone());
    let seen = wire_store(&mut c, &store);

    assert_eq!(store.borrow_mut().remove_where(|id| *id <= 10), 11);
    window.set_content_extent(store.borrow().len() as u64 * ROW);
    assert!(window.metrics().is_exhausted());

    // Without refetch_page nothing happens.
    assert_eq!(c.update(), None);

    assert!(store.borrow().needs_refetch());
    c.set_refetch_page(store.borrow().needs_refetch());
    assert_eq!(
        c.update(),
        Some(PageRequest {
            page: 2,
            kind: RequestKind::Refetch
        })
    );
    assert_eq!(seen.borrow().len(), 1);

    // The server's page 2 now overlaps with what is still loaded.
    let added = store.borrow_mut().finish_load(2, 15..25, true).unwrap();
    assert_eq!(added, 5);
    assert_eq!(store.borrow().len(), 14);
    assert_eq!(store.borrow().page(), 2);
}

#[test]
fn backfill_then_scroll_moves_on_to_next_page() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 1000);
    let store = store_with_pages(10, 2);
    window.set_content_extent(store.borrow().len() as u64 * ROW);

    let mut c = Controller::mount(ListLoader::default(), &element, &window, store.clone());
    let seen = wire_store(&mut c, &store);

    store.borrow_mut().remove_where(|id| *id <= 10);
    window.set_content_extent(store.borrow().len() as u64 * ROW);
    c.set_refetch_page(store.borrow().needs_refetch());
    assert_eq!(c.update().map(|r| r.kind), Some(RequestKind::Refetch));

    // Server pages now start at id 11, so page 2 is 21..31 and id 20 shifted into page 1.
    let added = store.borrow_mut().finish_load(2, 21..31, true).unwrap();
    assert_eq!(added, 10);
    assert_eq!(store.borrow().len(), 19);
    assert!(!store.borrow().needs_refetch());
    c.set_refetch_page(store.borrow().needs_refetch());

    window.set_content_extent(store.borrow().len() as u64 * ROW);
    assert_eq!(c.update(), None);
    window.scroll_to_end();
    assert_eq!(
        seen.borrow().last().copied(),
        Some(PageRequest {
            page: 3,
            kind: RequestKind::Next
        })
    );
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn element_mode_never_backfills() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 1000);
    let store = store_with_pages(10, 1);
    let mut c = Controller::mount(
        ListLoader::new(
            LoaderOptions::new()
                .with_mode(ScrollMode::Element)
                .with_refetch_page(true),
        ),
        &element,
        &window,
        store.clone(),
    );
    let seen = wire_store(&mut c, &store);

    assert!(window.metrics().is_exhausted());
    assert_eq!(c.update(), None);
    assert!(seen.borrow().is_empty());
}

#[test]
fn update_options_keeps_mounted_mode() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 1000);
    let mut c = Controller::mount(ListLoader::default(), &element, &window, ListState::default);
    c.update_options(|o| {
        o.mode = ScrollMode::Element;
        o.no_container = true;
    });
    assert_eq!(c.mode(), ScrollMode::Window);
    assert!(!c.render(|i| i).is_wrapped());
}

#[test]
fn controller_renders_from_store_state() {
    let element = ScrollSurface::new(400, 400);
    let window = ScrollSurface::new(1000, 1000);
    let store = store_with_pages(3, 1);
    store.borrow_mut().begin_load(2).unwrap();

    let c = Controller::mount(ListLoader::default(), &element, &window, store.clone());
    let out = c.render(|i| store.borrow().get(i).copied());
    assert!(out.is_wrapped());
    assert_eq!(out.row_count(), 3);
    assert_eq!(out.nodes().last(), Some(&Node::Loading));
    assert_eq!(
        out.nodes()[1],
        Node::Row {
            index: 1,
            content: Some(1)
        }
    );
}

#[test]
fn subscription_is_released_on_panic() {
    let window = ScrollSurface::new(100, 100);
    let result = std::panic::catch_unwind(core::panic::AssertUnwindSafe(|| {
        let _sub = WindowObserver::new(&window).on_scroll(Box::new(|_| {}));
        assert_eq!(window.listener_count(), 1);
        panic!("teardown failed");
    }));
    assert!(result.is_err());
    assert_eq!(window.listener_count(), 0);
}

#[test]
fn subscription_unsubscribe_is_idempotent() {
    let surface = ScrollSurface::new(100, 200);
    let mut sub = ElementObserver::new(&surface).on_scroll(Box::new(|_| {}));
    let id = sub.id().unwrap();
    assert!(surface.has_listener(id));
    assert!(sub.unsubscribe());
    assert!(!sub.unsubscribe());
    assert!(!sub.is_active());
    assert!(!surface.has_listener(id));
}

#[test]
fn observer_for_selects_target_by_mode() {
    let element = ScrollSurface::new(400, 800);
    let window = ScrollSurface::new(1000, 3000);
    let e = observer_for(ScrollMode::Element, &element, &window);
    let w = observer_for(ScrollMode::Window, &element, &window);
    assert_eq!(e.mode(), ScrollMode::Element);
    assert_eq!(e.metrics().total, 800);
    assert_eq!(w.mode(), ScrollMode::Window);
    assert_eq!(w.metrics().total, 3000);
}

#[test]
fn surface_clamps_offsets_and_skips_unchanged_positions() {
    let surface = ScrollSurface::new(100, 300);
    let events = Rc::new(Cell::new(0usize));
    let _sub = Subscription::new(&surface, {
        let events = Rc::clone(&events);
        Box::new(move |_| events.set(events.get() + 1))
    });

    assert_eq!(surface.scroll_to(1000), 200);
    assert_eq!(surface.scroll_to(200), 200);
    assert_eq!(events.get(), 1);
    assert_eq!(surface.scroll_by(-50), 150);
    assert_eq!(surface.scroll_by(-500), 0);
    assert_eq!(events.get(), 3);

    // Shrinking content clamps the offset without an event.
    surface.scroll_to_end();
    surface.set_content_extent(50);
    assert_eq!(surface.metrics().offset, 0);
    assert_eq!(surface.metrics().total, 100);
    assert_eq!(events.get(), 4);
}

#[test]
fn listener_is_not_reentered_by_its_own_scroll() {
    let surface = ScrollSurface::new(100, 1000);
    let calls = Rc::new(Cell::new(0usize));
    let _sub = Subscription::new(&surface, {
        let calls = Rc::clone(&calls);
        let surface = surface.clone();
        Box::new(move |m| {
            calls.set(calls.get() + 1);
            surface.scroll_to(m.offset + 10);
        })
    });
    surface.scroll_to(10);
    assert_eq!(calls.get(), 1);
    assert_eq!(surface.metrics().offset, 20);
}

#[test]
fn listener_removed_during_dispatch_is_not_called() {
    let surface = ScrollSurface::new(100, 1000);
    let second_calls = Rc::new(Cell::new(0usize));
    let second_id = Rc::new(Cell::new(None));

    let _first = Subscription::new(&surface, {
        let surface = surface.clone();
        let second_id = Rc::clone(&second_id);
        Box::new(move |_| {
            if let Some(id) = second_id.get() {
                surface.remove_listener(id);
            }
        })
    });
    let second = Subscription::new(&surface, {
        let second_calls = Rc::clone(&second_calls);
        Box::new(move |_| second_calls.set(second_calls.get() + 1))
    });
    second_id.set(second.id());

    surface.scroll_to(10);
    assert_eq!(second_calls.get(), 0);
    assert!(!second.is_active());
}

#[test]
fn store_rejects_out_of_protocol_loads() {
    let mut list = PagedList::new(5, |id: &u32| *id);
    assert_eq!(list.begin_load(0), Err(StoreError::InvalidPage));
    assert_eq!(
        list.finish_load(1, 0..5, true),
        Err(StoreError::UnexpectedPage {
            expected: None,
            got: 1
        })
    );

    list.begin_load(1).unwrap();
    assert_eq!(
        list.begin_load(2),
        Err(StoreError::AlreadyLoading { pending: 1 })
    );
    assert_eq!(
        list.finish_load(2, 0..5, true),
        Err(StoreError::UnexpectedPage {
            expected: Some(1),
            got: 2
        })
    );
    assert_eq!(
        StoreError::AlreadyLoading { pending: 1 }.to_string(),
        "page 1 is already loading"
    );
}

#[test]
fn store_first_page_replaces_and_later_pages_append() {
    let mut list = PagedList::new(3, |id: &u32| *id);
    assert_eq!(list.list_state().page, 0);

    list.begin_load(1).unwrap();
    assert!(list.list_state().is_next_page_loading);
    assert_eq!(list.finish_load(1, [1, 2, 3], true), Ok(3));

    list.begin_load(2).unwrap();
    assert_eq!(list.finish_load(2, [3, 4, 5], false), Ok(2));
    assert_eq!(list.items(), &[1, 2, 3, 4, 5]);
    assert_eq!(
        list.list_state(),
        ListState {
            len: 5,
            page: 2,
            has_next_page: false,
            is_next_page_loading: false
        }
    );

    // Reloading page 1 starts over.
    list.begin_load(1).unwrap();
    assert_eq!(list.finish_load(1, [9, 8], true), Ok(2));
    assert_eq!(list.items(), &[9, 8]);
}

#[test]
fn store_fail_load_keeps_items() {
    let mut list = PagedList::new(2, |id: &u32| *id);
    list.begin_load(1).unwrap();
    list.finish_load(1, [1, 2], true).unwrap();
    list.begin_load(2).unwrap();
    list.fail_load();
    assert!(!list.is_loading());
    assert_eq!(list.len(), 2);
    assert!(list.begin_load(2).is_ok());
}

#[test]
fn store_needs_refetch_after_deletion_until_reload() {
    let mut list = PagedList::new(2, |id: &u32| *id);
    list.begin_load(1).unwrap();
    list.finish_load(1, [1, 2], true).unwrap();
    assert!(!list.needs_refetch());

    assert_eq!(list.remove_where(|id| *id == 1), 1);
    assert!(list.needs_refetch());

    // A removed key can come back.
    list.begin_load(1).unwrap();
    assert_eq!(list.finish_load(1, [1, 2], false), Ok(2));
    list.remove_where(|id| *id == 2);
    assert!(!list.needs_refetch());
}

#[test]
fn store_refetch_is_disarmed_even_when_nothing_was_added() {
    let mut list = PagedList::new(3, |id: &u32| *id);
    for page in 1..=2u32 {
        list.begin_load(page).unwrap();
        let start = (page - 1) * 3;
        list.finish_load(page, start..start + 3, true).unwrap();
    }
    assert_eq!(list.remove_where(|id| *id == 0), 1);
    assert!(list.needs_refetch());

    // The refetched page only holds items that are already loaded.
    list.begin_load(2).unwrap();
    assert_eq!(list.finish_load(2, [3, 4, 5], true), Ok(0));
    assert!(!list.needs_refetch());
}

#[test]
fn store_refetch_survives_advancing_past_the_gap() {
    let mut list = PagedList::new(2, |id: &u32| *id);
    list.begin_load(1).unwrap();
    list.finish_load(1, [1, 2], true).unwrap();
    list.begin_load(2).unwrap();

    // Deleted while page 2 was in flight.
    list.remove_where(|id| *id == 1);
    list.finish_load(2, [3, 4], true).unwrap();
    assert!(list.needs_refetch());

    list.begin_load(2).unwrap();
    list.finish_load(2, [4, 5], true).unwrap();
    assert!(!list.needs_refetch());
}

#[cfg(feature = "serde")]
#[test]
fn adapter_types_derive_serde() {
    fn assert_serde<T: serde::Serialize + for<'de> serde::Deserialize<'de>>() {}
    assert_serde::<StoreError>();
    assert_serde::<ListenerId>();
}
