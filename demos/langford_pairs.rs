//! The following program finds all ways to put $2n$ numbers $\\{1,1,2,2,\dots,n,n\\}$
//! into $2n$ slots $s_1,\dots,s_{2n}$ so that there are exactly $i$ numbers
//! between the two appearances of $i$, for all $1\leq i\leq n$. This task is
//! known as _Langford's problem_, since it was first described by C. D. Langford
//! [[_The Mathematical Gazette_ 42 (October 1958), 228][mathgaz]].
//!
//! The $n$ values of $i$ and the $2n$ slots are the columns to be covered, all
//! with target 1, and row $(i,j)$ places both copies of $i$ into slots $s_j$
//! and $s_k$, where $k=i+j+1$.
//!
//! [mathgaz]: https://www.cambridge.org/core/journals/mathematical-gazette/article/abs/problem/557F7BBB739F5B3E0D152C270642B102
use multi_covers::{Problem, ProblemError};

/// A Langford pairing exists only when $n$ is congruent to 0 or 3 modulo 4.
const N: usize = 7;

#[derive(Debug, Eq, PartialEq, Copy, Clone, Ord, PartialOrd)]
enum Column {
    Number(usize),
    Slot(usize),
}

fn main() -> Result<(), ProblemError> {
    let numbers = (1..=N).map(Column::Number);
    let slots = (1..=2 * N).map(Column::Slot);
    let mut problem = Problem::new(numbers.chain(slots))?;
    for i in 1..=N {
        // Half of the pairings are the reverses of the others. Keep one of
        // each by placing the first 1 into slot $s_j$ with $j<n$.
        let last_slot = if i == 1 { N - 1 } else { 2 * N - i - 1 };
        for j in 1..=last_slot {
            let k = i + j + 1;
            problem.add_unit_row((i, j), [Column::Number(i), Column::Slot(j), Column::Slot(k)])?;
        }
    }

    let mut count = 0;
    for solution in problem.solve() {
        assert_eq!(solution.len(), N);
        let mut placement = [0usize; 2 * N];
        for (i, j) in solution {
            placement[j - 1] = i;
            placement[j + i] = i;
        }
        // Print the Langford sequence found, and its reverse.
        println!("{placement:?}");
        placement.reverse();
        println!("{placement:?}");
        count += 2;
    }
    assert_eq!(count, 52);
    Ok(())
}
