//! Raw key/value rows as they appear in the source export.
//!
//! A [`RawTable`] is the immutable starting point of every transform. Each
//! [`RawRow`] carries its 1-based `row_num`, assigned once at construction.
//! That number is the only link from an output row back to the evidence
//! file, so nothing downstream ever renumbers rows.
//!
//! # Example
//!
//! ```
//! use convforensic::record::RawTable;
//!
//! let table = RawTable::from_pairs([
//!     (Some("APD1"), None),
//!     (Some("a@b.com"), Some("hello")),
//! ]);
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.get(2).unwrap().col2(), Some("hello"));
//! ```

use serde::{Deserialize, Serialize};

/// One row of the raw two-column export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    row_num: usize,
    col1: Option<String>,
    col2: Option<String>,
}

impl RawRow {
    /// 1-based position in the source file.
    pub fn row_num(&self) -> usize {
        self.row_num
    }

    /// First column, `None` when the cell was absent or empty.
    pub fn col1(&self) -> Option<&str> {
        self.col1.as_deref()
    }

    /// Second column, `None` when the cell was absent or empty.
    pub fn col2(&self) -> Option<&str> {
        self.col2.as_deref()
    }
}

/// Ordered, read-only sequence of raw rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<RawRow>,
}

impl RawTable {
    /// Builds a table from `(col1, col2)` pairs in file order.
    ///
    /// Empty strings are stored as `None`: a CSV cell that is present but
    /// empty carries no more information than a missing one.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Option<A>, Option<B>)>,
        A: Into<String>,
        B: Into<String>,
    {
        let rows = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (col1, col2))| RawRow {
                row_num: idx + 1,
                col1: non_empty(col1.map(Into::into)),
                col2: non_empty(col2.map(Into::into)),
            })
            .collect();
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in `row_num` order.
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Looks a row up by its 1-based `row_num`.
    pub fn get(&self, row_num: usize) -> Option<&RawRow> {
        row_num.checked_sub(1).and_then(|idx| self.rows.get(idx))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
