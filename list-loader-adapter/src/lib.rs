//! Adapter utilities for the `list-loader` crate.
//!
//! The `list-loader` crate decides when to request pages and what to render. This crate provides
//! small, framework-neutral pieces adapters need around it:
//!
//! - Scroll surfaces standing in for a scrollable element or the window
//! - Element- and window-scoped viewport observers with scoped listener subscriptions
//! - A mounted controller tying a loader to an observer and a list-state source
//! - A reference paged-list store (append, de-duplicate, backfill after deletions)
//!
//! This crate is intentionally framework-agnostic (no DOM/web-sys bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod key;
mod observer;
mod store;
mod surface;

#[cfg(test)]
mod tests;

pub use controller::{Controller, ListStateSource};
pub use key::ItemKey;
pub use observer::{ElementObserver, Subscription, ViewportObserver, WindowObserver, observer_for};
pub use store::{PagedList, SharedPagedList, StoreError};
pub use surface::{ListenerId, ScrollListener, ScrollSurface};
