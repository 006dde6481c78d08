/// The position of a column header in a sequential table.
///
/// See the `columns` arena in the [`Solutions`] structure for an example of
/// this construction. Position 0 is reserved for the head of the list of
/// active columns, so the column at position $k$ of a [`Problem`] is found
/// at index $k+1$.
///
/// [`Solutions`]: `crate::Solutions`
/// [`Problem`]: `crate::Problem`
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[repr(transparent)]
pub struct ColumnIndex(usize);

impl ColumnIndex {
    /// Creates a new index.
    #[must_use]
    pub const fn new(ix: usize) -> Self {
        Self(ix)
    }

    /// Returns the index of the header that represents the column at
    /// position `pos` in the sorted column list of a problem.
    #[must_use]
    pub const fn of_position(pos: usize) -> Self {
        Self(pos + 1)
    }

    /// Returns the index value as a primitive type.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns the position of the column in the sorted column list of
    /// the problem.
    ///
    /// The result is meaningful only if `self` is not the list head.
    #[must_use]
    pub const fn position(self) -> usize {
        self.0 - 1
    }

    /// Returns the position of the previous column in the table.
    ///
    /// The result is meaningful only if `self` is positive.
    #[must_use]
    pub fn decrement(self) -> Self {
        Self(self.0 - 1)
    }

    /// Returns the position of the next column in the table.
    #[must_use]
    pub fn increment(self) -> Self {
        Self(self.0 + 1)
    }
}

/// The position of a node in a sequential table.
///
/// The nodes of a row occupy consecutive positions, sorted by column.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[repr(transparent)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Creates a new index.
    #[must_use]
    pub const fn new(ix: usize) -> Self {
        Self(ix)
    }

    /// Returns the index value as a primitive type.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// The position of a row in a sequential table. Rows are stored in
/// increasing order of their identifiers.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[repr(transparent)]
pub struct RowIndex(usize);

impl RowIndex {
    /// Creates a new index.
    #[must_use]
    pub const fn new(ix: usize) -> Self {
        Self(ix)
    }

    /// Returns the index value as a primitive type.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_get() {
        assert_eq!(ColumnIndex::new(0).get(), 0);
        assert_eq!(ColumnIndex::new(123).get(), 123);
        assert_eq!(NodeIndex::new(456789).get(), 456789);
        assert_eq!(RowIndex::new(65).get(), 65);
    }

    #[test]
    fn column_positions_skip_the_head() {
        assert_eq!(ColumnIndex::of_position(0), ColumnIndex::new(1));
        assert_eq!(ColumnIndex::of_position(41).get(), 42);
        assert_eq!(ColumnIndex::new(1).position(), 0);
        assert_eq!(ColumnIndex::of_position(7).position(), 7);
    }

    #[test]
    fn index_decrement() {
        assert_eq!(ColumnIndex::new(1).decrement(), ColumnIndex::new(0));
        assert_eq!(ColumnIndex::new(15).decrement(), ColumnIndex::new(14));
    }

    #[test]
    fn index_increment() {
        assert_eq!(ColumnIndex::new(0).increment(), ColumnIndex::new(1));
        assert_eq!(ColumnIndex::new(133).increment(), ColumnIndex::new(134));
    }
}
