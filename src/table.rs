use crate::{Problem, ProblemError};

/// A problem as typed into a spreadsheet-like editor: one header per column,
/// an optional target cell under each header, and one line of optional cells
/// per row.
///
/// Cells hold free text, and [`Self::to_problem`] reads them leniently:
///
/// - A target cell that is missing, empty, not a number or zero means
///   target 1.
/// - A row cell that is missing means that the row does not cover the
///   column. A cell that is present but empty or not a positive number
///   means amount 1; otherwise the number is the amount.
/// - Rows without any present cells are skipped.
///
/// # Examples
///
/// ```
/// use multi_covers::Table;
///
/// let mut table = Table::new(["x", "y"]);
/// table.set_target("x", "2")?;
/// table.push_row("p", [Some("2"), None]);
/// table.push_row("q", [None, Some("")]);
/// table.push_row("blank", [None::<&str>, None]);
///
/// let problem = table.to_problem()?;
/// assert_eq!(problem.target(&"x".to_string()), Some(2));
/// assert_eq!(problem.row_count(), 2);
/// let solutions: Vec<_> = problem.solve().collect();
/// assert_eq!(solutions, [["p", "q"]]);
/// # Ok::<(), multi_covers::ProblemError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// The column headers, in editor order.
    columns: Vec<String>,
    /// The target cell under the header at the same position.
    targets: Vec<Option<String>>,
    /// The rows, in editor order, with one cell per column.
    rows: Vec<(String, Vec<Option<String>>)>,
}

impl Table {
    /// Creates a table with the given column headers, no targets and no rows.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        Self {
            targets: vec![None; columns.len()],
            columns,
            rows: Vec::new(),
        }
    }

    /// Fills the target cell of a column.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::UnknownColumn`] if no header is `column`.
    pub fn set_target(&mut self, column: &str, cell: impl Into<String>) -> Result<(), ProblemError> {
        let pos = self
            .columns
            .iter()
            .position(|header| header == column)
            .ok_or_else(|| ProblemError::UnknownColumn(format!("{column:?}")))?;
        self.targets[pos] = Some(cell.into());
        Ok(())
    }

    /// Appends a row. The `k`th cell belongs to the `k`th column; cells past
    /// the last column are dropped, and missing trailing cells are absent.
    pub fn push_row<I, S>(&mut self, name: impl Into<String>, cells: I)
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut cells: Vec<Option<String>> = cells
            .into_iter()
            .take(self.columns.len())
            .map(|cell| cell.map(Into::into))
            .collect();
        cells.resize(self.columns.len(), None);
        self.rows.push((name.into(), cells));
    }

    /// Returns the number of rows typed so far, including blank ones.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Builds the problem described by the table.
    ///
    /// # Errors
    ///
    /// Fails if two columns share a header or two non-blank rows share
    /// a name.
    pub fn to_problem(&self) -> Result<Problem<String, String>, ProblemError> {
        let mut problem = Problem::new(self.columns.iter().cloned())?;
        for (column, cell) in self.columns.iter().zip(&self.targets) {
            if let Some(cell) = cell {
                problem.set_target(column, count(cell))?;
            }
        }
        for (name, cells) in &self.rows {
            let cover: Vec<(String, u32)> = self
                .columns
                .iter()
                .zip(cells)
                .filter_map(|(column, cell)| Some((column.clone(), count(cell.as_deref()?))))
                .collect();
            if cover.is_empty() {
                tracing::debug!(row = %name, "skipping row without cells");
                continue;
            }
            problem.add_row(name.clone(), cover)?;
        }
        Ok(problem)
    }
}

/// Reads a target or an amount from a cell, defaulting to 1.
fn count(cell: &str) -> u32 {
    match cell.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => 1,
    }
}
