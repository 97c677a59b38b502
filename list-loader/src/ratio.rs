use core::fmt;

/// A normalized scroll position rounded to one decimal place.
///
/// Stored as a whole number of tenths so threshold comparisons are exact: `0.8` is
/// `ScrollRatio::from_tenths(8)`. Values above `1.0` are possible when the reported offset
/// overshoots (e.g. elastic scrolling).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollRatio(u32);

impl ScrollRatio {
    pub const ZERO: Self = Self(0);
    pub const END: Self = Self(10);
    /// The default trigger threshold (`0.8`); loading starts strictly above it.
    pub const DEFAULT_THRESHOLD: Self = Self(8);

    pub const fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    pub const fn tenths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl fmt::Display for ScrollRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Computes `(visible + offset) / total`, rounded half-up to one decimal place.
///
/// Returns `None` when `total` is zero (nothing has been laid out yet).
pub fn scroll_ratio(visible: u64, offset: u64, total: u64) -> Option<ScrollRatio> {
    if total == 0 {
        return None;
    }
    let seen = visible as u128 + offset as u128;
    let total = total as u128;
    // round(seen * 10 / total) == floor((seen * 20 + total) / (2 * total))
    let tenths = (seen * 20 + total) / (total * 2);
    Some(ScrollRatio(u32::try_from(tenths).unwrap_or(u32::MAX)))
}
