use list_loader::{ListLoader, LoaderOptions};
use list_loader_adapter::{Controller, PagedList, ScrollSurface, SharedPagedList};

const ROW: u64 = 40;
const PER_PAGE: u32 = 25;

fn main() {
    // Example: a window-scrolled list backed by a paged store.
    //
    // An adapter would:
    // - mirror the real window geometry into the surface on layout/scroll
    // - start the fetch from the request handler (here: answered synchronously)
    // - render rows from the store
    let window = ScrollSurface::new(800, 800);
    let element = ScrollSurface::new(0, 0);
    let store = SharedPagedList::new(PagedList::new(PER_PAGE as usize, |id: &u32| *id));

    store.borrow_mut().begin_load(1).unwrap();
    store
        .borrow_mut()
        .finish_load(1, 0..PER_PAGE, true)
        .unwrap();
    window.set_content_extent(store.borrow().len() as u64 * ROW);

    let mut c = Controller::mount(
        ListLoader::new(LoaderOptions::new()),
        &element,
        &window,
        store.clone(),
    );
    c.set_request_handler({
        let store = store.clone();
        move |req| {
            println!("request {req:?}");
            store.borrow_mut().begin_load(req.page).unwrap();
        }
    });

    for _ in 0..4 {
        window.scroll_to_end();
        let pending = store.borrow().pending_page();
        if let Some(page) = pending {
            let start = (page - 1) * PER_PAGE;
            let has_next = page < 4;
            store
                .borrow_mut()
                .finish_load(page, start..start + PER_PAGE, has_next)
                .unwrap();
            window.set_content_extent(store.borrow().len() as u64 * ROW);
        }
        println!(
            "items={} page={} has_next_page={}",
            store.borrow().len(),
            store.borrow().page(),
            store.borrow().has_next_page()
        );
    }

    let out = c.render(|i| store.borrow().get(i).copied());
    println!("rendered rows={}", out.row_count());
}
