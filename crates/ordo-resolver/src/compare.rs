//! Priority ordering for solver domains.

use std::cmp::Ordering;
use std::fmt;

/// Orders candidates within a group, best first.
pub trait Prioritize<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Sort `items` best first.
    ///
    /// Stable insertion sort: candidates comparing `Equal` keep their input
    /// order, and a comparator that is not a total order yields some
    /// permutation rather than a panic.
    fn sort(&self, items: &mut [T]) {
        for i in 1..items.len() {
            let mut j = i;
            while j > 0 && self.compare(&items[j], &items[j - 1]) == Ordering::Less {
                items.swap(j, j - 1);
                j -= 1;
            }
        }
    }
}

/// Adapts a comparison closure to [`Prioritize`].
pub struct CompareWrapper<F> {
    compare: F,
}

impl<F> CompareWrapper<F> {
    pub fn new(compare: F) -> Self {
        Self { compare }
    }
}

impl<T, F> Prioritize<T> for CompareWrapper<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }
}

impl<F> fmt::Debug for CompareWrapper<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompareWrapper").finish_non_exhaustive()
    }
}
