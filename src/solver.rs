use crate::events::{CoverEvents, NoEvents};
use crate::indices::{ColumnIndex, NodeIndex, RowIndex};
use crate::stats::SearchStatistics;
use crate::Problem;
use std::iter::FusedIterator;
use std::ops::Range;

/// A column header in the dancing links structure of [`Solutions`].
#[derive(Debug, Copy, Clone)]
struct Column {
    /// Possibly the previous column in the (horizontal) list of active
    /// columns, in cyclic order. The contents of this variable are preserved
    /// when the column is removed from the list. This property makes it
    /// possible to apply the dancing links technique on the list of active
    /// columns.
    ///
    /// This field corresponds to the `LLINK` pointer in Knuth's data structure.
    left: ColumnIndex,
    /// Possibly the next column in the (horizontal) list of active columns,
    /// in cyclic order. (See `self.left` for details.)
    ///
    /// This field corresponds to the `RLINK` pointer in Knuth's data structure.
    right: ColumnIndex,
    /// The node of the first row that still covers this column, if any.
    /// In other words, the first node in the vertical list for this column.
    ///
    /// # Invariant
    ///
    /// `first_row` is [`None`] if and only if `last_row` is [`None`].
    first_row: Option<NodeIndex>,
    /// The node of the last row that still covers this column, if any.
    last_row: Option<NodeIndex>,
    /// The number of elements in the vertical list for this column.
    ///
    /// # Invariants
    ///
    /// - `len == 0` if and only if `first_row` and `last_row` are [`None`].
    /// - `len == 1` if and only if `first_row == last_row` and both are
    ///   [`Some`].
    len: usize,
    /// The amount that the rows selected so far still have to contribute
    /// to this column.
    ///
    /// # Invariant
    ///
    /// The column is in the list of active columns if and only if
    /// `remaining > 0`.
    remaining: i64,
}

impl Column {
    /// Creates the head of the list of active columns.
    fn header(left: ColumnIndex, right: ColumnIndex) -> Self {
        Self {
            left,
            right,
            first_row: None,
            last_row: None,
            len: 0,
            remaining: 0,
        }
    }

    /// Creates a column that points to its predecessor and successor in the
    /// horizontal list, and whose vertical list is empty.
    fn new(target: u32, left: ColumnIndex, right: ColumnIndex) -> Self {
        Self {
            left,
            right,
            first_row: None,
            last_row: None,
            len: 0,
            remaining: i64::from(target),
        }
    }
}

/// The position of the special node in the `columns` table of [`Solutions`]
/// that serves as the head of the list of active columns.
const ROOT: ColumnIndex = ColumnIndex::new(0);

/// The instance of a column in some row.
#[derive(Debug, Copy, Clone)]
struct Node {
    /// The column covered.
    ///
    /// This field corresponds to the `TOP` pointer in Knuth's data structure.
    column: ColumnIndex,
    /// The row this node belongs to.
    row: RowIndex,
    /// The previous node in the vertical list for `column`, if any.
    ///
    /// This field corresponds to the `ULINK` pointer in Knuth's data structure,
    /// except that it equals [`None`] instead of `column` when a node belongs
    /// to the first row that covers `column`.
    above: Option<NodeIndex>,
    /// The next node in the vertical list for `column`, if any.
    ///
    /// This field corresponds to the `DLINK` pointer in Knuth's data structure,
    /// except that it equals [`None`] instead of `column` when a node belongs
    /// to the last row that covers `column`.
    below: Option<NodeIndex>,
    /// The amount the row contributes to `column`.
    amount: u32,
}

/// A row of the problem. Its nodes are stored contiguously, sorted by column.
#[derive(Debug)]
struct Row<'p, R> {
    label: &'p R,
    first: usize,
    len: usize,
}

/// A level of the search tree.
#[derive(Debug, Copy, Clone)]
struct Frame {
    /// The active column chosen for branching at this level.
    column: ColumnIndex,
    /// The node of the row currently selected to cover `column`, or [`None`]
    /// if no row has been tried yet.
    current: Option<NodeIndex>,
    /// The length of the stack of tried rows when this level was entered.
    tried: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    /// Choose a column for branching, or emit a solution if none is left.
    Choose,
    /// Undo the row selected at the deepest level and try the next one,
    /// leaving the level when its rows run out.
    Advance,
    /// The whole search tree has been explored.
    Exhausted,
}

/// An iterator over the solutions to a generalized exact cover [`Problem`].
///
/// More precisely, this structure embodies a variant of Knuth's Algorithm X
/// in which column $j$ must receive a total amount $t_j>0$ from the selected
/// rows, and row $r$ contributes an amount $a_{rj}>0$ to each column it covers.
/// A column leaves the list of active columns as soon as the rows selected so
/// far have exhausted its target. If a row drives a column past its target,
/// the branch is abandoned at once.
///
/// The search is depth-first and resumable: every call to [`Iterator::next`]
/// continues the traversal until the next solution is found, so dropping the
/// iterator cancels the search and [`Iterator::take`] bounds it. Each
/// solution lists the selected rows in the order they were chosen.
///
/// Every subset of rows that solves the problem is produced exactly once.
/// Distinct rows that cover the same columns with the same amounts are not
/// merged, so they lead to distinct solutions.
///
/// The progress of the search is reported to an event sink `E`; see
/// [`CoverEvents`] for details.
pub struct Solutions<'p, C, R, E = NoEvents> {
    /// The problem being solved.
    problem: &'p Problem<C, R>,
    /// The list head followed by one header per column, some of which are
    /// unsatisfied and consequently appear in the active list.
    columns: Vec<Column>,
    /// The nodes within the vertical lists, grouped by row.
    nodes: Vec<Node>,
    /// The rows, in increasing order of their identifiers.
    rows: Vec<Row<'p, R>>,
    /// A stack with one entry per level of the search tree.
    frames: Vec<Frame>,
    /// The rows currently selected, in selection order.
    partial: Vec<RowIndex>,
    /// Rows already tried for the column of some level. They stay out of
    /// every vertical list until that level is left, so that no set of rows
    /// is visited twice.
    tried: Vec<RowIndex>,
    state: State,
    statistics: SearchStatistics,
    events: E,
}

impl<'p, C: Ord, R: Ord, E: CoverEvents<C, R>> Solutions<'p, C, R, E> {
    // Setup routines.

    /// Builds the dancing links structure for a problem, with every column
    /// active and every row available.
    pub(crate) fn new(problem: &'p Problem<C, R>, events: E) -> Self {
        // Construct the horizontal list.
        let n = problem.columns().len();
        let last_ix = ColumnIndex::new(n);
        let first_ix = if n == 0 {
            ROOT
        } else {
            ColumnIndex::of_position(0)
        };
        let mut columns = Vec::with_capacity(n + 1);
        columns.push(Column::header(last_ix, first_ix));
        columns.extend((0..n).map(|pos| {
            let cur_ix = ColumnIndex::of_position(pos);
            let right_ix = if cur_ix == last_ix {
                ROOT
            } else {
                cur_ix.increment()
            };
            Column::new(problem.target_at(pos), cur_ix.decrement(), right_ix)
        }));
        let mut solutions = Self {
            problem,
            columns,
            nodes: Vec::new(),
            rows: Vec::with_capacity(problem.row_count()),
            frames: Vec::new(),
            partial: Vec::new(),
            tried: Vec::new(),
            state: State::Choose,
            statistics: SearchStatistics::default(),
            events,
        };
        // Construct the vertical lists, row by row.
        for (row_ix, (label, cover)) in problem.incidence().enumerate() {
            let row_ix = RowIndex::new(row_ix);
            let first = solutions.nodes.len();
            for &(pos, amount) in cover {
                solutions.append_node(ColumnIndex::of_position(pos), row_ix, amount);
            }
            solutions.rows.push(Row {
                label,
                first,
                len: cover.len(),
            });
        }
        tracing::debug!(
            columns = n,
            rows = solutions.rows.len(),
            nodes = solutions.nodes.len(),
            "starting cover search"
        );
        solutions
    }

    /// Appends a new node to the vertical list of the specified column.
    fn append_node(&mut self, column_ix: ColumnIndex, row: RowIndex, amount: u32) {
        let ix = NodeIndex::new(self.nodes.len());
        let column = &mut self.columns[column_ix.get()];
        column.len += 1;
        let above = if let Some(prev_last_ix) = column.last_row.replace(ix) {
            // Update the `below` link of the new node's predecessor
            // in the vertical list of `column`.
            self.nodes[prev_last_ix.get()].below = Some(ix);
            Some(prev_last_ix)
        } else {
            // This is the first row that covers `column`.
            column.first_row = Some(ix);
            None
        };
        self.nodes.push(Node {
            column: column_ix,
            row,
            above,
            below: None,
            amount,
        });
    }

    // Dancing links routines.

    /// Deletes a node from the vertical list of its column, leaving the links
    /// of the node itself intact so that [`Self::restore_node`] can put it
    /// back.
    fn remove_node(&mut self, ix: NodeIndex) {
        let Node {
            column,
            row,
            above,
            below,
            ..
        } = self.nodes[ix.get()];
        if let Some(above) = above {
            self.nodes[above.get()].below = below;
        } else {
            self.columns[column.get()].first_row = below;
        }
        if let Some(below) = below {
            self.nodes[below.get()].above = above;
        } else {
            self.columns[column.get()].last_row = above;
        }
        self.columns[column.get()].len -= 1;
        let (column, row) = (self.column_label(column), self.row_label(row));
        self.events.on_column_remove(column, row);
    }

    /// Undoes the updates made by the last [removal](`Self::remove_node`) of
    /// a node.
    fn restore_node(&mut self, ix: NodeIndex) {
        let Node {
            column,
            row,
            above,
            below,
            ..
        } = self.nodes[ix.get()];
        if let Some(above) = above {
            self.nodes[above.get()].below = Some(ix);
        } else {
            self.columns[column.get()].first_row = Some(ix);
        }
        if let Some(below) = below {
            self.nodes[below.get()].above = Some(ix);
        } else {
            self.columns[column.get()].last_row = Some(ix);
        }
        self.columns[column.get()].len += 1;
        let (column, row) = (self.column_label(column), self.row_label(row));
        self.events.on_column_restore(column, row);
    }

    /// Hides the row containing the node at index `ix` from the vertical
    /// lists of all its columns other than the column of `ix`, in increasing
    /// column order.
    fn hide(&mut self, ix: NodeIndex) {
        let row = self.nodes[ix.get()].row;
        for cur_ix in self.row_nodes(row) {
            if cur_ix != ix.get() {
                self.remove_node(NodeIndex::new(cur_ix));
            }
        }
    }

    /// Undoes the updates made by the last [hiding](`Self::hide`) operation,
    /// in decreasing column order.
    fn unhide(&mut self, ix: NodeIndex) {
        let row = self.nodes[ix.get()].row;
        for cur_ix in self.row_nodes(row).rev() {
            if cur_ix != ix.get() {
                self.restore_node(NodeIndex::new(cur_ix));
            }
        }
    }

    /// Takes a row out of the vertical lists of all its columns.
    fn withdraw(&mut self, row: RowIndex) {
        for cur_ix in self.row_nodes(row) {
            self.remove_node(NodeIndex::new(cur_ix));
        }
    }

    /// Undoes the updates made by the last [withdrawal](`Self::withdraw`)
    /// of a row.
    fn reinstate(&mut self, row: RowIndex) {
        for cur_ix in self.row_nodes(row).rev() {
            self.restore_node(NodeIndex::new(cur_ix));
        }
    }

    /// Marks a column as satisfied by deleting it from the list of active
    /// columns, and by hiding every row that still covers it from the
    /// vertical lists of its other columns.
    ///
    /// The vertical list of the column itself is left untouched; it records
    /// exactly which rows [`Self::uncover`] has to put back.
    fn cover(&mut self, ix: ColumnIndex) {
        let Column { left, right, .. } = self.columns[ix.get()];

        // Delete the column from the horizontal list.
        self.columns[left.get()].right = right;
        self.columns[right.get()].left = left;

        // Hide all rows covering the column, from top to bottom.
        let mut node_ix = self.columns[ix.get()].first_row;
        while let Some(cur_ix) = node_ix {
            self.hide(cur_ix);
            node_ix = self.nodes[cur_ix.get()].below;
        }
    }

    /// Undoes the updates made by the last [covering](`Self::cover`)
    /// operation, in exactly the opposite order.
    fn uncover(&mut self, ix: ColumnIndex) {
        // Unhide all rows covering the column, from bottom to top.
        let mut node_ix = self.columns[ix.get()].last_row;
        while let Some(cur_ix) = node_ix {
            self.unhide(cur_ix);
            node_ix = self.nodes[cur_ix.get()].above;
        }

        // Put back the column into the horizontal list.
        let Column { left, right, .. } = self.columns[ix.get()];
        self.columns[left.get()].right = ix;
        self.columns[right.get()].left = ix;
    }

    // Algorithm X routines.

    /// Finds an active column $j$ for which $h(j)$ is minimum, where $h$ is
    /// usually a heuristic function intended to reduce the amount of
    /// branching performed by the search. In case of equality, ties are
    /// broken by using the position of $j$ within the horizontal list of
    /// active columns, which is the increasing order of identifiers.
    ///
    /// Returns `None` if every column has been satisfied.
    fn choose_column<H>(&self, heuristic: H) -> Option<ColumnIndex>
    where
        H: Fn(&Column) -> usize,
    {
        let mut min_h = usize::MAX;
        let mut min_ix = None;
        let mut cur_ix = self.columns[ROOT.get()].right;
        while cur_ix != ROOT {
            let column = &self.columns[cur_ix.get()];
            let h = heuristic(column);
            if h < min_h {
                // If $h(j)=0$, then $j$ is surely the result.
                if h == 0 {
                    return Some(cur_ix);
                }
                min_h = h;
                min_ix = Some(cur_ix);
            }
            cur_ix = column.right;
        }
        min_ix
    }

    /// Pushes the row of the given node onto the partial solution and
    /// subtracts its amounts from the remaining targets of its columns,
    /// in increasing column order. Every column whose target is exhausted
    /// is [covered](`Self::cover`).
    ///
    /// Returns `false` if some column went past its target; the selection
    /// must then be undone without going deeper.
    fn select(&mut self, ix: NodeIndex) -> bool {
        let row = self.nodes[ix.get()].row;
        self.partial.push(row);
        self.statistics.selections += 1;
        self.statistics.max_depth = self.statistics.max_depth.max(self.partial.len());
        let label = self.row_label(row);
        self.events.on_row_select(label, true);

        // A selected row cannot be chosen again below this level.
        self.withdraw(row);
        let mut valid = true;
        for cur_ix in self.row_nodes(row) {
            let Node { column, amount, .. } = self.nodes[cur_ix];
            let header = &mut self.columns[column.get()];
            header.remaining -= i64::from(amount);
            let remaining = header.remaining;
            if remaining <= 0 {
                valid &= remaining == 0;
                self.cover(column);
            }
        }
        valid
    }

    /// Undoes the updates made by the last [selection](`Self::select`),
    /// in decreasing column order. The row itself stays withdrawn.
    fn deselect(&mut self, ix: NodeIndex) {
        let row = self.nodes[ix.get()].row;
        for cur_ix in self.row_nodes(row).rev() {
            let Node { column, amount, .. } = self.nodes[cur_ix];
            // The column was covered by `select` if and only if its
            // target is still exhausted.
            if self.columns[column.get()].remaining <= 0 {
                self.uncover(column);
            }
            self.columns[column.get()].remaining += i64::from(amount);
        }
        let popped = self.partial.pop();
        debug_assert_eq!(popped, Some(row), "deselected row is not the last one");
        let label = self.row_label(row);
        self.events.on_row_select(label, false);
    }

    /// Performs one backtracking step at the deepest level of the search
    /// tree: the row selected there (if any) is deselected and the next row
    /// in the vertical list of the level's column is selected instead. If no
    /// rows are left, the level is abandoned and the rows tried at it are
    /// reinstated.
    ///
    /// Returns `false` if the search tree has been fully explored.
    fn advance(&mut self) -> bool {
        let Some(frame) = self.frames.last().copied() else {
            return false;
        };
        let next_ix = if let Some(cur_ix) = frame.current {
            self.deselect(cur_ix);
            self.tried.push(self.nodes[cur_ix.get()].row);
            // The node was withdrawn with its links intact, so it still
            // points at the next row that was below it.
            self.nodes[cur_ix.get()].below
        } else {
            self.columns[frame.column.get()].first_row
        };
        if let Some(next_ix) = next_ix {
            if let Some(top) = self.frames.last_mut() {
                top.current = Some(next_ix);
            }
            if self.select(next_ix) {
                self.state = State::Choose;
            } else {
                self.statistics.overshoots += 1;
                tracing::trace!(depth = self.partial.len(), "row overshoots a column target");
            }
        } else {
            // We have tried all rows for this column; backtrack.
            self.frames.pop();
            let tried = self.tried.split_off(frame.tried);
            for &row in tried.iter().rev() {
                self.reinstate(row);
            }
        }
        true
    }

    /// Returns the active columns and the rows that still cover them, both
    /// in increasing order.
    ///
    /// Between two calls to [`Iterator::next`] this is the coverage index
    /// of the search; it is the state an [event](`CoverEvents`) replay
    /// reconstructs.
    pub fn coverage(&self) -> Vec<(&'p C, Vec<&'p R>)> {
        let mut coverage = Vec::new();
        let mut cur_ix = self.columns[ROOT.get()].right;
        while cur_ix != ROOT {
            let column = &self.columns[cur_ix.get()];
            let mut rows = Vec::with_capacity(column.len);
            let mut node_ix = column.first_row;
            while let Some(ix) = node_ix {
                let node = &self.nodes[ix.get()];
                rows.push(self.row_label(node.row));
                node_ix = node.below;
            }
            coverage.push((self.column_label(cur_ix), rows));
            cur_ix = column.right;
        }
        coverage
    }
}

impl<'p, C, R, E> Solutions<'p, C, R, E> {
    /// Returns the counters of the search so far.
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Returns a reference to the event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Consumes the iterator, returning the event sink.
    pub fn into_events(self) -> E {
        self.events
    }

    /// Returns the number of rows in the partial solution.
    pub fn depth(&self) -> usize {
        self.partial.len()
    }

    /// Returns `true` once the whole search tree has been explored.
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    // Accessor methods.

    /// Returns the identifier of the column with the given header.
    fn column_label(&self, ix: ColumnIndex) -> &'p C {
        let problem: &'p Problem<C, R> = self.problem;
        &problem.columns()[ix.position()]
    }

    /// Returns the identifier of the given row.
    fn row_label(&self, ix: RowIndex) -> &'p R {
        self.rows[ix.get()].label
    }

    /// Returns the positions of the nodes of a row in the `nodes` table.
    fn row_nodes(&self, ix: RowIndex) -> Range<usize> {
        let row = &self.rows[ix.get()];
        row.first..row.first + row.len
    }
}

impl<'p, C, R, E> Iterator for Solutions<'p, C, R, E>
where
    C: Ord,
    R: Ord + Clone,
    E: CoverEvents<C, R>,
{
    type Item = Vec<R>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Choose => {
                    self.statistics.nodes += 1;
                    // The heuristic function used to choose an active column
                    // for branching. Selecting a column whose vertical list is
                    // of minimum length is the "minimum remaining values"
                    // (MRV) heuristic.
                    if let Some(column) = self.choose_column(|c| c.len) {
                        self.frames.push(Frame {
                            column,
                            current: None,
                            tried: self.tried.len(),
                        });
                    } else {
                        // Every column has been satisfied. Visit the solution
                        // given by the rows in `self.partial`, and leave the
                        // current level when asked for the next one.
                        self.state = State::Advance;
                        let solution: Vec<R> = self
                            .partial
                            .iter()
                            .map(|&row| self.row_label(row).clone())
                            .collect();
                        self.statistics.solutions += 1;
                        tracing::trace!(rows = solution.len(), "solution found");
                        self.events.on_solution_found(&solution);
                        return Some(solution);
                    }
                    self.state = State::Advance;
                }
                State::Advance => {
                    if !self.advance() {
                        self.state = State::Exhausted;
                        tracing::debug!(statistics = %self.statistics, "cover search exhausted");
                    }
                }
                State::Exhausted => return None,
            }
        }
    }
}

impl<C, R, E> FusedIterator for Solutions<'_, C, R, E>
where
    C: Ord,
    R: Ord + Clone,
    E: CoverEvents<C, R>,
{
}

impl<C: Ord, R: Ord> Problem<C, R> {
    /// Returns an iterator over the solutions to this problem.
    ///
    /// See [`Solutions`] for details.
    pub fn solve(&self) -> Solutions<'_, C, R> {
        Solutions::new(self, NoEvents)
    }

    /// Returns an iterator over the solutions to this problem that reports
    /// the progress of the search to the given event sink.
    ///
    /// Pass `&mut sink` to keep ownership of the sink, or recover it
    /// afterwards with [`Solutions::into_events`].
    pub fn solve_with<E: CoverEvents<C, R>>(&self, events: E) -> Solutions<'_, C, R, E> {
        Solutions::new(self, events)
    }
}
