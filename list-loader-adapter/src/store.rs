use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use list_loader::ListState;

use crate::ListStateSource;
use crate::key::{ItemKey, KeySet};

/// Misuse of the [`PagedList`] load protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StoreError {
    /// Page numbers are 1-based.
    InvalidPage,
    /// `begin_load` while another page is in flight.
    AlreadyLoading { pending: u32 },
    /// `finish_load` for a page that was not requested.
    UnexpectedPage { expected: Option<u32>, got: u32 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPage => f.write_str("page numbers start at 1"),
            Self::AlreadyLoading { pending } => write!(f, "page {pending} is already loading"),
            Self::UnexpectedPage {
                expected: Some(expected),
                got,
            } => write!(f, "finished page {got} while page {expected} was loading"),
            Self::UnexpectedPage { expected: None, got } => {
                write!(f, "finished page {got} but no page was loading")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StoreError {}

/// A reference owner for paged list state.
///
/// - page 1 replaces the list, later pages append
/// - items whose key is already present are skipped, so re-requesting a page after deletions
///   only backfills what is missing
/// - a deletion arms a single refetch of the current page; the next load that lands at or
///   below the current page disarms it, however many items it added
/// - `is_next_page_loading` flips synchronously in `begin_load`, which is what keeps a loader
///   from issuing a second request before the first completes
pub struct PagedList<T, K> {
    items: Vec<T>,
    keys: KeySet<K>,
    key_of: Box<dyn Fn(&T) -> K>,
    per_page: usize,
    page: u32,
    has_next_page: bool,
    pending: Option<u32>,
    refetch: bool,
}

impl<T, K: ItemKey> PagedList<T, K> {
    /// An empty list. Nothing is loaded yet, so `page` is `0` and a next page is assumed.
    pub fn new(per_page: usize, key_of: impl Fn(&T) -> K + 'static) -> Self {
        debug_assert!(per_page > 0, "per_page must be positive");
        Self {
            items: Vec::new(),
            keys: KeySet::new(),
            key_of: Box::new(key_of),
            per_page,
            page: 0,
            has_next_page: true,
            pending: None,
            refetch: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_page(&self) -> Option<u32> {
        self.pending
    }

    pub fn list_state(&self) -> ListState {
        ListState {
            len: self.items.len(),
            page: self.page,
            has_next_page: self.has_next_page,
            is_next_page_loading: self.pending.is_some(),
        }
    }

    /// Marks `page` as in flight.
    pub fn begin_load(&mut self, page: u32) -> Result<(), StoreError> {
        if page == 0 {
            return Err(StoreError::InvalidPage);
        }
        if let Some(pending) = self.pending {
            return Err(StoreError::AlreadyLoading { pending });
        }
        adebug!(page, "begin_load");
        self.pending = Some(page);
        Ok(())
    }

    /// Applies a fetched page. Returns how many items were added.
    pub fn finish_load(
        &mut self,
        page: u32,
        items: impl IntoIterator<Item = T>,
        has_next_page: bool,
    ) -> Result<usize, StoreError> {
        if self.pending != Some(page) {
            return Err(StoreError::UnexpectedPage {
                expected: self.pending,
                got: page,
            });
        }

        if page == 1 {
            self.items.clear();
            self.keys.clear();
        }
        let before = self.items.len();
        for item in items {
            let key = (self.key_of)(&item);
            if self.keys.insert(key) {
                self.items.push(item);
            }
        }
        let added = self.items.len() - before;

        if page <= self.page {
            self.refetch = false;
        }
        self.page = page;
        self.has_next_page = has_next_page;
        self.pending = None;
        adebug!(page, added, has_next_page, "finish_load");
        Ok(added)
    }

    /// Clears the in-flight marker after a failed fetch; items are left untouched.
    pub fn fail_load(&mut self) {
        let failed = self.pending.take();
        if failed.is_some() {
            awarn!(page = ?failed, "page load failed");
        }
    }

    /// Removes every item matching `pred`. Returns how many were removed.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        let key_of = &self.key_of;
        let keys = &mut self.keys;
        self.items.retain(|item| {
            if pred(item) {
                keys.remove(&key_of(item));
                false
            } else {
                true
            }
        });
        let removed = before - self.items.len();
        if removed > 0 && self.has_next_page {
            self.refetch = true;
        }
        removed
    }

    /// `true` after a deletion while more pages exist, until the current page has been loaded
    /// again.
    ///
    /// Feed this into the loader's `refetch_page` after every store change, so the current page
    /// is requested once and loading then moves on to `page + 1`.
    pub fn needs_refetch(&self) -> bool {
        self.refetch && self.has_next_page
    }
}

impl<T: fmt::Debug, K> fmt::Debug for PagedList<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedList")
            .field("items", &self.items)
            .field("per_page", &self.per_page)
            .field("page", &self.page)
            .field("has_next_page", &self.has_next_page)
            .field("pending", &self.pending)
            .field("refetch", &self.refetch)
            .finish_non_exhaustive()
    }
}

/// A shared handle to a [`PagedList`] for single-threaded UIs.
pub struct SharedPagedList<T, K> {
    inner: Rc<RefCell<PagedList<T, K>>>,
}

impl<T, K> Clone for SharedPagedList<T, K> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, K: ItemKey> SharedPagedList<T, K> {
    pub fn new(list: PagedList<T, K>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(list)),
        }
    }

    pub fn borrow(&self) -> Ref<'_, PagedList<T, K>> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, PagedList<T, K>> {
        self.inner.borrow_mut()
    }
}

impl<T, K: ItemKey> ListStateSource for SharedPagedList<T, K> {
    fn list_state(&self) -> ListState {
        self.inner.borrow().list_state()
    }
}
