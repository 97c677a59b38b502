// Example: deletions removed the window scrollbar; the current page is requested again.
use list_loader::{ListLoader, ListState, LoaderOptions, ScrollMetrics};

fn main() {
    let loader = ListLoader::new(
        LoaderOptions::new()
            .with_refetch_page(true)
            .with_load_next_page(|page| println!("load_next_page({page})")),
    );

    let state = ListState {
        len: 7,
        page: 3,
        has_next_page: true,
        is_next_page_loading: false,
    };

    // Document height equals the viewport height: no scroll event can happen anymore.
    let window = ScrollMetrics::new(900, 0, 900);
    println!("update -> {:?}", loader.on_update(window, &state));

    // With a scrollbar still present nothing is requested.
    let window = ScrollMetrics::new(900, 0, 1500);
    println!("update -> {:?}", loader.on_update(window, &state));
}
