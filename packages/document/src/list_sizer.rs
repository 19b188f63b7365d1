//! # List Sizing
//!
//! Keeps an editable list at "everything up to the last filled row, plus one
//! blank row", bounded by `[min_len, max_len]`.
//!
//! ```text
//! [a, _, b, _, _, _]  →  [a, _, b, _]        trailing blanks trimmed to one
//! [a, _, _, b]        →  [a, _, _, b, _]     one blank appended
//! []                  →  [_, _, _, _]        padded to min_len (4)
//! ```
//!
//! A list that is already the right length comes back as the same `Vec`
//! (same allocation, nothing moved).

/// Length bounds for a self-sizing list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSizer {
    min_len: usize,
    max_len: usize,
}

impl ListSizer {
    /// # Panics
    ///
    /// Panics if `min_len > max_len`.
    pub const fn new(min_len: usize, max_len: usize) -> Self {
        assert!(min_len <= max_len, "ListSizer: min_len must not exceed max_len");
        Self { min_len, max_len }
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Length `items` should have: one past the last non-empty element plus
    /// one blank slot, clamped to the bounds.
    pub fn target_len<T>(&self, items: &[T], is_non_empty: impl Fn(&T) -> bool) -> usize {
        let wanted = items
            .iter()
            .rposition(|item| is_non_empty(item))
            .map_or(1, |last| last + 2);
        wanted.clamp(self.min_len, self.max_len)
    }

    /// Grow or truncate `items` to [`Self::target_len`].
    ///
    /// `make_empty` runs once per appended slot.
    pub fn resize<T>(
        &self,
        mut items: Vec<T>,
        is_non_empty: impl Fn(&T) -> bool,
        make_empty: impl FnMut() -> T,
    ) -> Vec<T> {
        let target = self.target_len(&items, is_non_empty);
        if items.len() > target {
            items.truncate(target);
        } else if items.len() < target {
            items.resize_with(target, make_empty);
        }
        items
    }
}

/// Free-standing form of [`ListSizer::resize`].
///
/// # Panics
///
/// Panics if `min_len > max_len`.
pub fn resize<T>(
    items: Vec<T>,
    min_len: usize,
    max_len: usize,
    is_non_empty: impl Fn(&T) -> bool,
    make_empty: impl FnMut() -> T,
) -> Vec<T> {
    ListSizer::new(min_len, max_len).resize(items, is_non_empty, make_empty)
}
