use alloc::string::String;
use alloc::vec::Vec;

/// One rendered entry in a loaded list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node<R> {
    Row { index: usize, content: R },
    /// Placeholder shown while the next page is in flight.
    Loading,
}

impl<R> Node<R> {
    pub fn is_row(&self) -> bool {
        matches!(self, Self::Row { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// The wrapping element emitted unless `no_container` is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container<R> {
    /// `true` in element mode: this container owns the scroll listener.
    pub scrollable: bool,
    pub style: Option<String>,
    pub children: Vec<Node<R>>,
}

/// A framework-neutral description of what a [`crate::ListLoader`] renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered<R> {
    /// Rows emitted directly, for composition inside another scrollable region.
    Bare(Vec<Node<R>>),
    Container(Container<R>),
}

impl<R> Rendered<R> {
    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    pub fn nodes(&self) -> &[Node<R>] {
        match self {
            Self::Bare(nodes) => nodes,
            Self::Container(c) => &c.children,
        }
    }

    pub fn into_nodes(self) -> Vec<Node<R>> {
        match self {
            Self::Bare(nodes) => nodes,
            Self::Container(c) => c.children,
        }
    }

    pub fn row_count(&self) -> usize {
        self.nodes().iter().filter(|n| n.is_row()).count()
    }

    pub fn has_loading_indicator(&self) -> bool {
        self.nodes().iter().any(Node::is_loading)
    }
}
