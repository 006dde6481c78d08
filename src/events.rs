//! Search events
//!
//! Declares the `CoverEvents` trait through which [`Solutions`] reports the
//! progress of a search, together with a few ready-made sinks:
//!
//! - [`NoEvents`] ignores everything. It is the default sink.
//! - [`EventLog`] records owned copies of every event, in the chronological
//!   order of the depth-first traversal.
//! - [`TracingEvents`] forwards every event to [`tracing`] at `TRACE` level.
//!
//! A visualizer that keeps its own presentation state can rebuild the
//! coverage index and the partial solution of the solver at any point of
//! the search by feeding an event log to a [`Replay`], forwards with
//! [`Replay::apply`] or backwards with [`Replay::undo`].
//!
//! Events are purely observational. A sink cannot influence the search, so
//! swapping sinks never changes the solutions produced.
//!
//! [`Solutions`]: crate::Solutions

use crate::Problem;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

/// Receives the events of a search, in the order the solver performs them.
///
/// Every method has a no-op default, so a sink implements only what it
/// needs.
///
/// Besides the rows hidden when a column is satisfied, the stream reports
/// two more kinds of removals. A row that is selected leaves the covering
/// sets of all its own columns right after its `on_row_select(row, true)`,
/// and comes back only when its level of the search is left. Rows already
/// tried for the column of a level likewise stay out until that level is
/// left. Their `on_column_restore` calls follow the last
/// `on_row_select(row, false)` of the level, latest row first.
pub trait CoverEvents<C, R> {
    /// Called when `row` is pushed onto (`selecting == true`) or popped from
    /// (`selecting == false`) the partial solution.
    fn on_row_select(&mut self, _row: &R, _selecting: bool) {}

    /// Called when `row` leaves the set of rows that cover `column`.
    fn on_column_remove(&mut self, _column: &C, _row: &R) {}

    /// Called when `row` is put back into the set of rows that cover
    /// `column`.
    fn on_column_restore(&mut self, _column: &C, _row: &R) {}

    /// Called when the partial solution covers every column exactly.
    fn on_solution_found(&mut self, _solution: &[R]) {}
}

impl<C, R, E: CoverEvents<C, R> + ?Sized> CoverEvents<C, R> for &mut E {
    fn on_row_select(&mut self, row: &R, selecting: bool) {
        (**self).on_row_select(row, selecting);
    }

    fn on_column_remove(&mut self, column: &C, row: &R) {
        (**self).on_column_remove(column, row);
    }

    fn on_column_restore(&mut self, column: &C, row: &R) {
        (**self).on_column_restore(column, row);
    }

    fn on_solution_found(&mut self, solution: &[R]) {
        (**self).on_solution_found(solution);
    }
}

/// A sink that ignores every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoEvents;

impl<C, R> CoverEvents<C, R> for NoEvents {}

/// An owned record of one search event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<C, R> {
    /// See [`CoverEvents::on_row_select`].
    RowSelect {
        /// The row pushed or popped.
        row: R,
        /// Whether the row was pushed.
        selecting: bool,
    },
    /// See [`CoverEvents::on_column_remove`].
    ColumnRemove {
        /// The column whose covering set shrank.
        column: C,
        /// The row that left it.
        row: R,
    },
    /// See [`CoverEvents::on_column_restore`].
    ColumnRestore {
        /// The column whose covering set grew.
        column: C,
        /// The row that came back.
        row: R,
    },
    /// See [`CoverEvents::on_solution_found`].
    SolutionFound(Vec<R>),
}

/// A sink that records every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog<C, R> {
    events: Vec<Event<C, R>>,
}

impl<C, R> EventLog<C, R> {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Returns the events recorded so far, oldest first.
    pub fn events(&self) -> &[Event<C, R>] {
        &self.events
    }

    /// Returns the number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consumes the log, returning the recorded events.
    pub fn into_events(self) -> Vec<Event<C, R>> {
        self.events
    }
}

impl<C, R> Default for EventLog<C, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clone, R: Clone> CoverEvents<C, R> for EventLog<C, R> {
    fn on_row_select(&mut self, row: &R, selecting: bool) {
        self.events.push(Event::RowSelect {
            row: row.clone(),
            selecting,
        });
    }

    fn on_column_remove(&mut self, column: &C, row: &R) {
        self.events.push(Event::ColumnRemove {
            column: column.clone(),
            row: row.clone(),
        });
    }

    fn on_column_restore(&mut self, column: &C, row: &R) {
        self.events.push(Event::ColumnRestore {
            column: column.clone(),
            row: row.clone(),
        });
    }

    fn on_solution_found(&mut self, solution: &[R]) {
        self.events.push(Event::SolutionFound(solution.to_vec()));
    }
}

/// A sink that emits every event through [`tracing`] at `TRACE` level,
/// under the `multi_covers::events` target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingEvents;

impl<C: Debug, R: Debug> CoverEvents<C, R> for TracingEvents {
    fn on_row_select(&mut self, row: &R, selecting: bool) {
        tracing::trace!(?row, selecting, "row selection");
    }

    fn on_column_remove(&mut self, column: &C, row: &R) {
        tracing::trace!(?column, ?row, "row removed from column");
    }

    fn on_column_restore(&mut self, column: &C, row: &R) {
        tracing::trace!(?column, ?row, "row restored to column");
    }

    fn on_solution_found(&mut self, solution: &[R]) {
        tracing::trace!(?solution, "solution found");
    }
}

/// Reconstructs the state of a search from its events.
///
/// A replay starts from the coverage of a freshly built problem: every row
/// is in the covering set of every column it covers, every column is
/// active with its full target still to go, and nothing is selected.
/// Applying the events of an [`EventLog`] in order then tracks exactly the
/// covering sets and the active columns maintained by the solver; undoing
/// them in reverse order walks the search backwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay<C, R> {
    /// The `(column, row)` pairs whose row currently covers the column.
    coverage: BTreeSet<(C, R)>,
    /// The amount each column still has to receive from the selection.
    /// A column is active while this is positive.
    remaining: BTreeMap<C, i64>,
    /// The amounts of every row, used to replay selections.
    amounts: BTreeMap<R, Vec<(C, u32)>>,
    /// The rows currently selected, oldest first.
    selection: Vec<R>,
    /// The most recent solution seen, if any.
    last_solution: Option<Vec<R>>,
}

impl<C: Ord + Clone, R: Ord + Clone> Replay<C, R> {
    /// Creates a replay positioned before the first event of a solve of
    /// `problem`.
    pub fn new(problem: &Problem<C, R>) -> Self {
        let coverage = problem
            .rows()
            .flat_map(|(row, cover)| cover.map(move |(column, _)| (column.clone(), row.clone())))
            .collect();
        let remaining = problem
            .targets()
            .map(|(column, target)| (column.clone(), i64::from(target)))
            .collect();
        let amounts = problem
            .rows()
            .map(|(row, cover)| {
                let cover = cover.map(|(column, amount)| (column.clone(), amount)).collect();
                (row.clone(), cover)
            })
            .collect();
        Self {
            coverage,
            remaining,
            amounts,
            selection: Vec::new(),
            last_solution: None,
        }
    }

    /// Advances the replay past one event.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the event is inconsistent with the state
    /// reached so far (for instance, removing a row that is not there).
    pub fn apply(&mut self, event: &Event<C, R>) {
        match event {
            Event::RowSelect { row, selecting } => {
                if *selecting {
                    self.selection.push(row.clone());
                    self.shift_remaining(row, -1);
                } else {
                    let popped = self.selection.pop();
                    debug_assert!(popped.as_ref() == Some(row), "deselected row is not the last one");
                    self.shift_remaining(row, 1);
                }
            }
            Event::ColumnRemove { column, row } => {
                let removed = self.coverage.remove(&(column.clone(), row.clone()));
                debug_assert!(removed, "removed row was not covering the column");
            }
            Event::ColumnRestore { column, row } => {
                let inserted = self.coverage.insert((column.clone(), row.clone()));
                debug_assert!(inserted, "restored row was already covering the column");
            }
            Event::SolutionFound(solution) => {
                debug_assert!(*solution == self.selection, "solution differs from the selection");
                self.last_solution = Some(solution.clone());
            }
        }
    }

    /// Moves the replay back before one event, which must be the last event
    /// applied.
    ///
    /// Undoing a [`Event::SolutionFound`] only forgets the remembered
    /// solution.
    pub fn undo(&mut self, event: &Event<C, R>) {
        match event {
            Event::RowSelect { row, selecting } => {
                if *selecting {
                    let popped = self.selection.pop();
                    debug_assert!(popped.as_ref() == Some(row), "undone selection is not the last one");
                    self.shift_remaining(row, 1);
                } else {
                    self.selection.push(row.clone());
                    self.shift_remaining(row, -1);
                }
            }
            Event::ColumnRemove { column, row } => {
                self.coverage.insert((column.clone(), row.clone()));
            }
            Event::ColumnRestore { column, row } => {
                self.coverage.remove(&(column.clone(), row.clone()));
            }
            Event::SolutionFound(_) => self.last_solution = None,
        }
    }

    /// Returns `true` if `row` is in the covering set of `column`.
    pub fn covers(&self, column: &C, row: &R) -> bool {
        self.coverage.contains(&(column.clone(), row.clone()))
    }

    /// Returns the rows in the covering set of `column`, in increasing order.
    pub fn rows_covering<'a>(&'a self, column: &'a C) -> impl Iterator<Item = &'a R> + 'a {
        self.coverage
            .iter()
            .filter(move |(c, _)| c == column)
            .map(|(_, row)| row)
    }

    /// Returns every `(column, row)` pair whose row is in the covering set
    /// of the column, in increasing order.
    pub fn pairs(&self) -> impl Iterator<Item = (&C, &R)> {
        self.coverage.iter().map(|(column, row)| (column, row))
    }

    /// Returns the columns whose target the selection has not reached yet,
    /// in increasing order. These are the active columns of the solver.
    pub fn active_columns(&self) -> impl Iterator<Item = &C> {
        self.remaining
            .iter()
            .filter(|&(_, &remaining)| remaining > 0)
            .map(|(column, _)| column)
    }

    /// Returns the amount a column still has to receive from the selection,
    /// or [`None`] if the column is not in the universe. The result is
    /// negative if the selection went past the target.
    pub fn remaining(&self, column: &C) -> Option<i64> {
        self.remaining.get(column).copied()
    }

    /// Adds the amounts of `row`, multiplied by `sign`, to the remaining
    /// targets of its columns.
    fn shift_remaining(&mut self, row: &R, sign: i64) {
        let Some(cover) = self.amounts.get(row) else {
            return;
        };
        for (column, amount) in cover {
            if let Some(remaining) = self.remaining.get_mut(column) {
                *remaining += sign * i64::from(*amount);
            }
        }
    }

    /// Returns the rows currently selected, oldest first.
    pub fn selection(&self) -> &[R] {
        &self.selection
    }

    /// Returns the most recent solution replayed, if any.
    pub fn last_solution(&self) -> Option<&[R]> {
        self.last_solution.as_deref()
    }
}
