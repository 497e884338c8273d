//! Pairwise student-overlap matrix between sections.
//!
//! Each cell counts the students enrolled in both sections of an
//! unordered pair. The diagonal holds a sentinel (9999 in exported
//! data) and never counts as a conflict; neither does any cell equal
//! to or above the sentinel. Missing pairs mean zero shared students.

use std::collections::BTreeMap;

/// Sentinel used by exported matrices on the diagonal.
pub const DEFAULT_SENTINEL: u32 = 9999;

/// Symmetric section-pair → shared-student count mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictMatrix {
    /// Cells keyed by the lexicographically ordered pair.
    cells: BTreeMap<(String, String), u32>,
    /// Diagonal sentinel.
    pub sentinel: u32,
}

impl Default for ConflictMatrix {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINEL)
    }
}

fn ordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ConflictMatrix {
    /// Creates an empty matrix with the given diagonal sentinel.
    pub fn new(sentinel: u32) -> Self {
        Self {
            cells: BTreeMap::new(),
            sentinel,
        }
    }

    /// Adds a cell (builder form).
    pub fn with_cell(mut self, a: impl Into<String>, b: impl Into<String>, count: u32) -> Self {
        self.record(&a.into(), &b.into(), count);
        self
    }

    /// Records a cell, keeping the larger value if the pair is already set.
    ///
    /// Returns `false` when an existing, different value was found for the
    /// pair (an asymmetric source table).
    pub fn record(&mut self, a: &str, b: &str, count: u32) -> bool {
        let (lo, hi) = ordered(a, b);
        match self.cells.get_mut(&(lo.to_string(), hi.to_string())) {
            Some(existing) => {
                let agreed = *existing == count;
                *existing = (*existing).max(count);
                agreed
            }
            None => {
                self.cells.insert((lo.to_string(), hi.to_string()), count);
                true
            }
        }
    }

    /// Raw cell value for a pair, in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<u32> {
        let (lo, hi) = ordered(a, b);
        self.cells.get(&(lo.to_string(), hi.to_string())).copied()
    }

    /// Shared-student count if the pair is a genuine conflict.
    ///
    /// `None` for the diagonal, absent pairs, zero cells, and cells at or
    /// above the sentinel.
    pub fn conflict(&self, a: &str, b: &str) -> Option<u32> {
        if a == b {
            return None;
        }
        self.get(a, b)
            .filter(|&count| count > 0 && count < self.sentinel)
    }

    /// Number of stored cells (diagonal included).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the matrix has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independent_lookup() {
        let m = ConflictMatrix::default().with_cell("B", "A", 5);
        assert_eq!(m.get("A", "B"), Some(5));
        assert_eq!(m.get("B", "A"), Some(5));
        assert_eq!(m.conflict("A", "B"), Some(5));
    }

    #[test]
    fn test_sentinel_and_diagonal_excluded() {
        let m = ConflictMatrix::default()
            .with_cell("A", "A", 9999)
            .with_cell("A", "B", 9999)
            .with_cell("A", "C", 0);
        assert_eq!(m.conflict("A", "A"), None);
        assert_eq!(m.conflict("A", "B"), None);
        assert_eq!(m.conflict("A", "C"), None);
        assert_eq!(m.conflict("A", "Z"), None);
    }

    #[test]
    fn test_asymmetric_record_keeps_max() {
        let mut m = ConflictMatrix::default();
        assert!(m.record("A", "B", 3));
        assert!(m.record("B", "A", 3));
        assert!(!m.record("B", "A", 7));
        assert_eq!(m.get("A", "B"), Some(7));
        assert!(!m.record("A", "B", 2));
        assert_eq!(m.get("A", "B"), Some(7));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_custom_sentinel() {
        let m = ConflictMatrix::new(100)
            .with_cell("X", "Y", 4)
            .with_cell("Y", "Z", 100);
        assert_eq!(m.conflict("X", "Y"), Some(4));
        assert_eq!(m.conflict("Y", "Z"), None);
    }
}
