use crate::error::{describe, ProblemError};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::slice;

/// A generalized exact cover problem: a universe of columns, each with
/// a positive _target_, and a collection of rows, each contributing a
/// positive _amount_ to every column it covers.
///
/// A solution is a set of rows whose amounts add up to exactly the target
/// of every column. When every target and every amount is 1, this is the
/// classical exact cover problem.
///
/// Columns are kept in increasing order of their identifiers, and so are
/// rows. Both orders are significant: they determine the order in which
/// [`Solutions`] breaks ties and visits rows, and thus the order in which
/// solutions and [events] appear.
///
/// [`Solutions`]: crate::Solutions
/// [events]: crate::CoverEvents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem<C, R> {
    /// The columns of the universe, sorted and free of duplicates.
    columns: Vec<C>,
    /// The target of the column at the same position in `columns`.
    targets: Vec<u32>,
    /// The columns covered by each row, as `(position, amount)` pairs sorted
    /// by position.
    rows: BTreeMap<R, Vec<(usize, u32)>>,
}

/// The four fields that describe a [`Problem`], in the shape the external
/// table editor produces and the codec shares.
///
/// Conversions through [`Problem::from_parts`] and [`Problem::to_parts`]
/// preserve all four fields.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "codec", derive(serde::Serialize, serde::Deserialize))]
pub struct Parts<C, R> {
    /// The universe of columns.
    pub columns: Vec<C>,
    /// Every row together with the columns it covers. A column listed
    /// `k` times is covered with amount `k` when `amounts` is silent.
    pub rows: Vec<(R, Vec<C>)>,
    /// Column targets; an unlisted column has target 1.
    pub targets: Vec<(C, u32)>,
    /// Per-row amounts. They take precedence over repetitions in `rows`;
    /// an unlisted (row, column) pair has amount 1 per listing.
    pub amounts: Vec<(R, Vec<(C, u32)>)>,
}

impl<C: Ord + Debug, R: Ord + Debug> Problem<C, R> {
    // Setup routines.

    /// Creates a problem on the given universe of columns, all with target 1
    /// and none covered by any row yet.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::DuplicateColumn`] if a column is listed twice.
    pub fn new<I: IntoIterator<Item = C>>(columns: I) -> Result<Self, ProblemError> {
        let mut columns: Vec<C> = columns.into_iter().collect();
        columns.sort_unstable();
        if let Some(pair) = columns.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ProblemError::DuplicateColumn(describe(&pair[0])));
        }
        let targets = vec![1; columns.len()];
        Ok(Self {
            columns,
            targets,
            rows: BTreeMap::new(),
        })
    }

    /// Sets the amount that the selected rows must contribute to a column.
    ///
    /// # Errors
    ///
    /// Fails if the column is not in the universe or if `target` is zero.
    pub fn set_target(&mut self, column: &C, target: u32) -> Result<(), ProblemError> {
        let pos = self
            .position(column)
            .ok_or_else(|| ProblemError::UnknownColumn(describe(column)))?;
        if target == 0 {
            return Err(ProblemError::ZeroTarget(describe(column)));
        }
        self.targets[pos] = target;
        Ok(())
    }

    /// Appends a row that contributes the given amounts to the given columns.
    ///
    /// A column may be listed more than once, in which case the row
    /// contributes the sum of the listed amounts to it. (A row that matches
    /// some column at two different places thus covers it with amount 2.)
    ///
    /// # Errors
    ///
    /// Fails if the identifier is already taken, if the row covers no
    /// columns, if a column is not in the universe, or if an amount is zero
    /// or the sum for a column overflows.
    pub fn add_row<I>(&mut self, id: R, cover: I) -> Result<(), ProblemError>
    where
        I: IntoIterator<Item = (C, u32)>,
    {
        if self.rows.contains_key(&id) {
            return Err(ProblemError::DuplicateRow(describe(&id)));
        }
        let mut entries: Vec<(usize, u32)> = Vec::new();
        for (column, amount) in cover {
            let pos = self
                .position(&column)
                .ok_or_else(|| ProblemError::UnknownColumn(describe(&column)))?;
            if amount == 0 {
                return Err(ProblemError::ZeroAmount {
                    row: describe(&id),
                    column: describe(&column),
                });
            }
            if let Some((_, total)) = entries.iter_mut().find(|(p, _)| *p == pos) {
                *total = total
                    .checked_add(amount)
                    .ok_or_else(|| ProblemError::AmountOverflow {
                        row: describe(&id),
                        column: describe(&column),
                    })?;
            } else {
                entries.push((pos, amount));
            }
        }
        if entries.is_empty() {
            return Err(ProblemError::EmptyRow(describe(&id)));
        }
        entries.sort_unstable_by_key(|&(pos, _)| pos);
        self.rows.insert(id, entries);
        Ok(())
    }

    /// Appends a row that contributes 1 to every listed column.
    ///
    /// # Errors
    ///
    /// See [`Self::add_row`].
    pub fn add_unit_row<I>(&mut self, id: R, columns: I) -> Result<(), ProblemError>
    where
        I: IntoIterator<Item = C>,
    {
        self.add_row(id, columns.into_iter().map(|column| (column, 1)))
    }

    /// Builds a problem from its four fields.
    ///
    /// A column listed `k` times for a row is covered with amount `k`,
    /// unless `amounts` gives the amount for that row and column, in which
    /// case the listed amount is used once however often the column is
    /// repeated. Columns without a target get target 1. Amounts for columns
    /// that a row does not cover are ignored.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`Self::new`], [`Self::set_target`]
    /// and [`Self::add_row`].
    pub fn from_parts(parts: Parts<C, R>) -> Result<Self, ProblemError> {
        let mut problem = Self::new(parts.columns)?;
        for (column, target) in parts.targets {
            problem.set_target(&column, target)?;
        }
        let amounts: BTreeMap<R, BTreeMap<C, u32>> = parts
            .amounts
            .into_iter()
            .map(|(row, cover)| (row, cover.into_iter().collect()))
            .collect();
        for (id, mut columns) in parts.rows {
            columns.sort_unstable();
            let row_amounts = amounts.get(&id);
            let mut cover: Vec<(C, u32)> = Vec::with_capacity(columns.len());
            for column in columns {
                match row_amounts.and_then(|amounts| amounts.get(&column)) {
                    Some(&amount) => {
                        if cover.last().is_some_and(|(last, _)| *last == column) {
                            continue;
                        }
                        cover.push((column, amount));
                    }
                    // Repetitions add up in `add_row`.
                    None => cover.push((column, 1)),
                }
            }
            problem.add_row(id, cover)?;
        }
        Ok(problem)
    }
}

impl<C, R> Problem<C, R> {
    // Accessor methods.

    /// Returns the columns of the universe, in increasing order.
    pub fn columns(&self) -> &[C] {
        &self.columns
    }

    /// Returns the columns of the universe together with their targets.
    pub fn targets(&self) -> impl Iterator<Item = (&C, u32)> {
        self.columns.iter().zip(self.targets.iter().copied())
    }

    /// Returns the rows of the problem in increasing order, each with the
    /// columns it covers and the amounts it contributes to them.
    pub fn rows(&self) -> impl Iterator<Item = (&R, Cover<'_, C>)> {
        self.rows.iter().map(|(id, entries)| {
            let cover = Cover {
                columns: &self.columns,
                entries: entries.iter(),
            };
            (id, cover)
        })
    }

    /// Returns the number of rows in the problem.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the rows of the problem in increasing order, each with its
    /// `(position, amount)` pairs sorted by column position.
    pub(crate) fn incidence(&self) -> impl Iterator<Item = (&R, &[(usize, u32)])> {
        self.rows.iter().map(|(id, entries)| (id, entries.as_slice()))
    }

    /// Returns the target of the column at the given position.
    pub(crate) fn target_at(&self, pos: usize) -> u32 {
        self.targets[pos]
    }
}

impl<C: Ord, R: Ord> Problem<C, R> {
    /// Returns the target of a column, or [`None`] if the column is not in
    /// the universe.
    pub fn target(&self, column: &C) -> Option<u32> {
        self.position(column).map(|pos| self.targets[pos])
    }

    /// Returns the columns covered by a row and the amounts it contributes
    /// to them, or [`None`] if there is no such row.
    pub fn row(&self, id: &R) -> Option<Cover<'_, C>> {
        self.rows.get(id).map(|entries| Cover {
            columns: &self.columns,
            entries: entries.iter(),
        })
    }

    /// Returns the amount a row contributes to a column, or [`None`] if the
    /// row does not cover the column.
    pub fn amount(&self, row: &R, column: &C) -> Option<u32> {
        let pos = self.position(column)?;
        let entries = self.rows.get(row)?;
        entries
            .binary_search_by_key(&pos, |&(p, _)| p)
            .ok()
            .map(|ix| entries[ix].1)
    }

    /// Finds the position of a column in the sorted universe.
    fn position(&self, column: &C) -> Option<usize> {
        self.columns.binary_search(column).ok()
    }
}

impl<C: Ord + Clone, R: Ord + Clone> Problem<C, R> {
    /// Splits the problem into its four fields.
    ///
    /// Every target and every amount is listed explicitly, so that
    /// `Problem::from_parts(problem.to_parts())` equals `problem`.
    pub fn to_parts(&self) -> Parts<C, R> {
        let columns = self.columns.clone();
        let targets = self
            .targets()
            .map(|(column, target)| (column.clone(), target))
            .collect();
        let rows = self
            .rows()
            .map(|(id, cover)| (id.clone(), cover.map(|(c, _)| c.clone()).collect()))
            .collect();
        let amounts = self
            .rows()
            .map(|(id, cover)| {
                let cover = cover.map(|(c, amount)| (c.clone(), amount)).collect();
                (id.clone(), cover)
            })
            .collect();
        Parts {
            columns,
            rows,
            targets,
            amounts,
        }
    }
}

/// An iterator over the columns covered by a row of a [`Problem`] and the
/// amounts the row contributes to them, in increasing column order.
#[derive(Debug, Clone)]
pub struct Cover<'a, C> {
    columns: &'a [C],
    entries: slice::Iter<'a, (usize, u32)>,
}

impl<'a, C> Iterator for Cover<'a, C> {
    type Item = (&'a C, u32);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries
            .next()
            .map(|&(pos, amount)| (&self.columns[pos], amount))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<C> ExactSizeIterator for Cover<'_, C> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_problem_sorts_columns_with_unit_targets() {
        let problem: Problem<u8, char> = Problem::new([3, 1, 2]).unwrap();
        assert_eq!(problem.columns(), &[1, 2, 3]);
        assert!(problem.targets().all(|(_, target)| target == 1));
        assert_eq!(problem.row_count(), 0);
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let err = Problem::<char, u8>::new(['a', 'b', 'a']).unwrap_err();
        assert_eq!(err, ProblemError::DuplicateColumn("'a'".into()));
    }

    #[test]
    fn targets_must_be_positive_and_known() {
        let mut problem: Problem<u8, char> = Problem::new([1, 2]).unwrap();
        problem.set_target(&2, 3).unwrap();
        assert_eq!(problem.target(&2), Some(3));
        assert_eq!(problem.target(&5), None);
        assert_eq!(
            problem.set_target(&1, 0),
            Err(ProblemError::ZeroTarget("1".into()))
        );
        assert_eq!(
            problem.set_target(&7, 2),
            Err(ProblemError::UnknownColumn("7".into()))
        );
    }

    #[test]
    fn repeated_columns_add_their_amounts() {
        let mut problem = Problem::new([1, 2, 3, 4, 5]).unwrap();
        problem.add_row('E', [(3, 1), (3, 1)]).unwrap();
        problem.add_row('A', [(4, 1), (2, 1), (3, 1)]).unwrap();
        assert_eq!(problem.amount(&'E', &3), Some(2));
        assert_eq!(problem.amount(&'E', &2), None);

        // Rows come out sorted by identifier, their columns sorted as well.
        let rows: Vec<(char, Vec<(u8, u32)>)> = problem
            .rows()
            .map(|(id, cover)| (*id, cover.map(|(c, a)| (*c, a)).collect()))
            .collect();
        assert_eq!(
            rows,
            [('A', vec![(2, 1), (3, 1), (4, 1)]), ('E', vec![(3, 2)])]
        );
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let mut problem: Problem<u8, &str> = Problem::new([1, 2]).unwrap();
        problem.add_unit_row("r", [1]).unwrap();
        assert_eq!(
            problem.add_unit_row("r", [2]),
            Err(ProblemError::DuplicateRow("\"r\"".into()))
        );
        assert_eq!(
            problem.add_unit_row("s", []),
            Err(ProblemError::EmptyRow("\"s\"".into()))
        );
        assert_eq!(
            problem.add_unit_row("t", [1, 9]),
            Err(ProblemError::UnknownColumn("9".into()))
        );
        assert_eq!(
            problem.add_row("u", [(2, 0)]),
            Err(ProblemError::ZeroAmount {
                row: "\"u\"".into(),
                column: "2".into(),
            })
        );
        assert_eq!(
            problem.add_row("v", [(2, u32::MAX), (2, 1)]),
            Err(ProblemError::AmountOverflow {
                row: "\"v\"".into(),
                column: "2".into(),
            })
        );
        // Failed insertions leave the problem untouched.
        assert_eq!(problem.row_count(), 1);
    }

    #[test]
    fn parts_default_missing_targets_and_amounts_to_one() {
        let parts = Parts {
            columns: vec!['x', 'y', 'z'],
            rows: vec![(1, vec!['y', 'x']), (2, vec!['z', 'z'])],
            targets: vec![('z', 4)],
            amounts: vec![(2, vec![('z', 4), ('x', 9)])],
        };
        let problem = Problem::from_parts(parts).unwrap();
        assert_eq!(problem.target(&'x'), Some(1));
        assert_eq!(problem.target(&'z'), Some(4));
        assert_eq!(problem.amount(&1, &'x'), Some(1));
        assert_eq!(problem.amount(&1, &'y'), Some(1));
        // An explicit amount wins over the repetition.
        assert_eq!(problem.amount(&2, &'z'), Some(4));
        // Row 2 does not cover 'x', whatever `amounts` says.
        assert_eq!(problem.amount(&2, &'x'), None);
    }

    #[test]
    fn parts_count_repeated_columns() {
        let row = |id, columns: &[u8]| (id, columns.to_vec());
        let parts = Parts {
            columns: vec![1, 2, 3, 4, 5],
            rows: vec![
                row('A', &[2, 3, 4]),
                row('B', &[1, 2, 4, 5]),
                row('C', &[1, 5]),
                row('D', &[1, 2, 3, 4]),
                row('E', &[3, 3]),
            ],
            targets: vec![(3, 2)],
            amounts: vec![],
        };
        let problem = Problem::from_parts(parts).unwrap();
        assert_eq!(problem.amount(&'E', &3), Some(2));
        let solutions: Vec<_> = problem.solve().collect();
        assert_eq!(solutions, [['B', 'E']]);

        // The round trip through parts keeps the amount.
        assert_eq!(Problem::from_parts(problem.to_parts()).unwrap(), problem);
    }

    #[test]
    fn parts_reject_zero_targets() {
        let parts: Parts<u8, u8> = Parts {
            columns: vec![1],
            rows: vec![],
            targets: vec![(1, 0)],
            amounts: vec![],
        };
        assert_eq!(
            Problem::from_parts(parts),
            Err(ProblemError::ZeroTarget("1".into()))
        );
    }

    #[test]
    fn parts_preserve_every_field() {
        let mut problem = Problem::new(["a", "b", "c"]).unwrap();
        problem.set_target(&"b", 2).unwrap();
        problem.add_row(10, [("a", 1), ("b", 2)]).unwrap();
        problem.add_row(20, [("c", 1), ("b", 1)]).unwrap();

        let parts = problem.to_parts();
        assert_eq!(parts.columns, ["a", "b", "c"]);
        assert_eq!(parts.targets, [("a", 1), ("b", 2), ("c", 1)]);
        assert_eq!(parts.rows, [(10, vec!["a", "b"]), (20, vec!["b", "c"])]);
        assert_eq!(
            parts.amounts,
            [(10, vec![("a", 1), ("b", 2)]), (20, vec![("b", 1), ("c", 1)])]
        );
        assert_eq!(Problem::from_parts(parts).unwrap(), problem);
    }
}
