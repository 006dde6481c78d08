//! This crate provides a dancing links solver for the _generalized exact
//! cover_ problem, in which columns may ask to be covered more than once.
//!
//! Suppose we're given a finite set $C$ of _columns_, each with a positive
//! _target_ $t_j$, and a collection $\mathcal{R}$ of _rows_, where row $r$
//! contributes a positive _amount_ $a_{rj}$ to every column $j$ it covers.
//! The task is to find every subcollection $\mathcal{R}^\star\subseteq\mathcal{R}$
//! of rows such that
//! \\[
//! \sum_{r\in\mathcal{R}^\star,\\;j\in r} a_{rj}=t_j\qquad\text{for all $j\in C$}.
//! \\]
//! When every target and every amount equals 1, this is the classical exact
//! cover problem that D. E. Knuth solved with the dancing links technique in
//! the paper "Dancing Links", [arXiv:cs/0011047][dl] [cs.DS] (2000). His
//! _Algorithm X_ repeatedly chooses the column that the fewest rows still
//! cover, tries each of those rows in turn, and removes the columns it covers
//! together with every conflicting row, undoing the changes on the way back.
//! [For further information, see Section 7.2.2.1 of
//! [_The Art of Computer Programming_ **4B** (2022)][taocp4b], Part 2, 65–70.]
//!
//! The variant implemented here keeps a _remaining target_ per column. Selecting
//! a row subtracts its amounts; a column leaves the list of active columns only
//! when its remaining target drops to zero, and a row that would push a column
//! below zero abandons the branch at once. The search is exposed as a lazy
//! [`Iterator`] over the solutions, each of which lists the selected rows.
//!
//! The following structures are the most important pieces of the crate:
//! - [`Problem`] holds the columns, targets, rows and amounts of an instance,
//!   validating them as they are added.
//! - [`Solutions`] walks the search tree one solution at a time.
//! - [`CoverEvents`] receives every elementary step of the search, which is
//!   what a visualizer needs to animate it. [`EventLog`] records the steps and
//!   [`Replay`] plays them back.
//! - [`Table`] builds a problem out of a grid of text cells, and the `codec`
//!   module (behind the default `codec` feature) turns a problem into a
//!   URL-safe string and back.
//!
//! # Examples
//!
//! Column 3 below must be covered twice. Row `'E'` matches it twice on its
//! own, and together with row `'B'` it meets every target exactly:
//!
//! ```
//! use multi_covers::Problem;
//!
//! let mut problem = Problem::new(1..=5)?;
//! problem.set_target(&3, 2)?;
//! problem.add_unit_row('A', [2, 3, 4])?;
//! problem.add_unit_row('B', [1, 2, 4, 5])?;
//! problem.add_unit_row('C', [1, 5])?;
//! problem.add_unit_row('D', [1, 2, 3, 4])?;
//! problem.add_unit_row('E', [3, 3])?;
//!
//! let solutions: Vec<_> = multi_covers::solve(&problem).collect();
//! assert_eq!(solutions, [['B', 'E']]);
//! # Ok::<(), multi_covers::ProblemError>(())
//! ```
//!
//! Also, the `demos` directory contains a few programs that use the solver:
//! - `langford_pairs.rs` counts the [Langford pairings] of $2n$ numbers.
//! - `domino_chessboard.rs` counts the ways to pack dominoes into a board,
//!   and then asks for each cell to be covered twice.
//! - `trace_search.rs` logs every step of a small search through `tracing`.
//!
//! [dl]: https://arxiv.org/pdf/cs/0011047.pdf
//! [taocp4b]: https://www-cs-faculty.stanford.edu/~knuth/taocp.html#vol4
//! [Langford pairings]: https://en.wikipedia.org/wiki/Langford_pairing

#[cfg(feature = "codec")]
pub mod codec;
mod error;
pub mod events;
mod indices;
mod problem;
mod solver;
mod stats;
mod table;

#[cfg(feature = "codec")]
pub use error::CodecError;
pub use error::ProblemError;
pub use events::{CoverEvents, Event, EventLog, NoEvents, Replay, TracingEvents};
pub use problem::{Cover, Parts, Problem};
pub use solver::Solutions;
pub use stats::SearchStatistics;
pub use table::Table;

/// Returns an iterator over the solutions to a problem, without reporting
/// any search events.
///
/// This is a shorthand for [`Problem::solve`]. To observe the search, use
/// [`Problem::solve_with`] instead.
pub fn solve<C: Ord, R: Ord>(problem: &Problem<C, R>) -> Solutions<'_, C, R> {
    problem.solve()
}
