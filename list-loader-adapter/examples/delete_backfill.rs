use list_loader::{ListLoader, LoaderOptions};
use list_loader_adapter::{Controller, PagedList, ScrollSurface, SharedPagedList};

fn main() {
    // Example: deleting rows until the window loses its scrollbar, then backfilling the
    // current page instead of skipping ahead.
    let window = ScrollSurface::new(500, 500);
    let element = ScrollSurface::new(0, 0);
    let store = SharedPagedList::new(PagedList::new(10, |id: &u32| *id));

    for page in 1..=2u32 {
        store.borrow_mut().begin_load(page).unwrap();
        let start = (page - 1) * 10;
        store
            .borrow_mut()
            .finish_load(page, start..start + 10, true)
            .unwrap();
    }
    window.set_content_extent(store.borrow().len() as u64 * 50);

    let mut c = Controller::mount(
        ListLoader::new(LoaderOptions::new()),
        &element,
        &window,
        store.clone(),
    );

    let removed = store.borrow_mut().remove_where(|id| id % 2 == 0);
    window.set_content_extent(store.borrow().len() as u64 * 50);
    println!("removed={removed} window={:?}", window.metrics());

    c.set_refetch_page(store.borrow().needs_refetch());
    match c.update() {
        Some(req) => {
            store.borrow_mut().begin_load(req.page).unwrap();
            let added = store
                .borrow_mut()
                .finish_load(req.page, 10..25, true)
                .unwrap();
            println!("refetched page {} (+{added} items)", req.page);
        }
        None => println!("no backfill needed"),
    }
    c.set_refetch_page(store.borrow().needs_refetch());
    println!(
        "items={} needs_refetch={}",
        store.borrow().len(),
        store.borrow().needs_refetch()
    );
}
