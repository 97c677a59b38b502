// Example: feed scroll metrics and list state, act on the returned page requests.
use list_loader::{ListLoader, ListState, LoaderOptions, ScrollMetrics, scroll_ratio};

fn main() {
    let loader = ListLoader::new(
        LoaderOptions::new().with_load_next_page(|page| println!("load_next_page({page})")),
    );

    let mut state = ListState {
        len: 25,
        page: 1,
        has_next_page: true,
        is_next_page_loading: false,
    };

    for offset in [0u64, 500, 800, 1000] {
        let metrics = ScrollMetrics::new(800, offset, 2000);
        let req = loader.on_scroll(metrics, &state);
        println!(
            "offset={offset} ratio={:?} request={req:?}",
            scroll_ratio(metrics.visible, metrics.offset, metrics.total).map(|r| r.to_string())
        );
        if req.is_some() {
            // The list owner marks the page as in flight right away.
            state.is_next_page_loading = true;
        }
    }

    let out = loader.render(&state, |i| format!("row {i}"));
    println!(
        "rows={} loading_indicator={}",
        out.row_count(),
        out.has_loading_indicator()
    );
}
