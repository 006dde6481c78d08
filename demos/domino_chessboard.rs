//! This program determines in how many ways can 32 dominoes fill an $8\times8$
//! chessboard. We set up an exact cover problem with one column for each of
//! the $8\times8=64$ cells, and one row for each of the $2\times8\times7=112$
//! placements of a domino.
//!
//! P. W. Kasteleyn obtained a closed formula for the number of domino coverings
//! of an $m\times n$ rectangle \[_Physica_ **27** (1961), pp. 1209–1225].
//!
//! Then the program raises the target of every cell of a smaller board to 2,
//! and counts the sets of distinct placements that cover each cell twice.
use multi_covers::{Problem, ProblemError};

type Cell = (u8, u8);

/// Builds the problem of packing dominoes into an $m\times n$ board so that
/// every cell is covered `target` times.
///
/// With `symmetric == false`, the domino occupying the upper left cell must
/// lie horizontally.
fn board(
    rows: u8,
    columns: u8,
    target: u32,
    symmetric: bool,
) -> Result<Problem<Cell, (Cell, Cell)>, ProblemError> {
    let cells = (0..rows).flat_map(|x| (0..columns).map(move |y| (x, y)));
    let mut problem = Problem::new(cells)?;
    for x in 0..rows {
        for y in 0..columns {
            problem.set_target(&(x, y), target)?;
        }
    }
    // There's a row for each pair of adjacent cells. We start with the
    // $m(n-1)$ horizontal placements,
    for x0 in 0..rows {
        for y0 in 0..columns - 1 {
            let placement = ((x0, y0), (x0, y0 + 1));
            problem.add_unit_row(placement, [placement.0, placement.1])?;
        }
    }
    // and continue with the $n(m-1)$ vertical ones.
    for y0 in 0..columns {
        for x0 in (y0 == 0 && !symmetric) as u8..rows - 1 {
            let placement = ((x0, y0), (x0 + 1, y0));
            problem.add_unit_row(placement, [placement.0, placement.1])?;
        }
    }
    Ok(problem)
}

fn main() -> Result<(), ProblemError> {
    // Count the number of solutions, taking symmetry into account.
    let problem = board(8, 8, 1, false)?;
    let mut solutions = problem.solve();
    let count = 2 * solutions.by_ref().count();
    println!("{count} domino tilings of the chessboard");
    println!("{}", solutions.statistics());
    assert_eq!(count, 12_988_816);

    let problem = board(4, 4, 2, true)?;
    let mut solutions = problem.solve();
    let count = solutions.by_ref().count();
    println!("{count} double coverings of a 4x4 board");
    println!("{}", solutions.statistics());
    Ok(())
}
