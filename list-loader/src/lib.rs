//! A headless incremental list loader ("infinite scroll").
//!
//! For listener lifecycle, scroll observers and a reference paged store, see the
//! `list-loader-adapter` crate.
//!
//! The loader decides, from scroll geometry and an externally owned [`ListState`], when the next
//! page should be requested:
//! - the scroll ratio `(visible + offset) / total` is rounded to one decimal place
//! - a page is requested once the ratio exceeds `0.8`, the list is non-empty, another page
//!   exists and none is in flight
//! - after deletions removed the window scrollbar, the current page can be re-requested
//!   (shrink correction)
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - scroll metrics of the observed element or window
//! - the current list state (item count, page, loading flags)
//! - a row renderer
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod loader;
mod options;
mod ratio;
mod render;
mod types;


pub use loader::ListLoader;
pub use options::{LoadNextPage, LoaderOptions};
pub use ratio::{ScrollRatio, scroll_ratio};
pub use render::{Container, Node, Rendered};
pub use types::{ListState, PageRequest, RequestKind, ScrollMetrics, ScrollMode};
