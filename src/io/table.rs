//! Whitespace-delimited table loading.
//!
//! Both TEPCat tables are plain text: one header line followed by data lines
//! whose fields are separated by runs of whitespace. A table is described by a
//! fixed [`ColumnSpec`] schema (field name, token index, kind) and loaded into
//! one typed column per declared field.
//!
//! Design goals:
//! - **Strict**: a short line or an unparseable number aborts the whole load
//! - **Column-oriented** output so row masks can be applied in lockstep
//! - **No side effects** beyond reading the file

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CatalogueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

/// One declared field of a table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// Zero-based token index within a data line.
    pub index: usize,
    pub kind: ColumnKind,
}

const fn text(name: &'static str, index: usize) -> ColumnSpec {
    ColumnSpec {
        name,
        index,
        kind: ColumnKind::Text,
    }
}

const fn number(name: &'static str, index: usize) -> ColumnSpec {
    ColumnSpec {
        name,
        index,
        kind: ColumnKind::Number,
    }
}

/// Observables table ("TEPCat for planning observations").
pub const OBSERVABLES_SCHEMA: &[ColumnSpec] = &[
    text("name", 0),
    number("vmag", 8),
    number("kmag", 9),
    number("tdur", 10),
    number("tdepth", 11),
    number("period", 14),
];

/// Physical-properties table ("TEPCat well-studied transiting planets").
pub const PHYSICAL_SCHEMA: &[ColumnSpec] = &[
    text("name", 0),
    number("tstar", 1),
    number("metalstar", 2),
    number("mstar", 7),
    number("rstar", 10),
    number("loggstar", 11),
    number("a", 23),
    number("mplanet", 26),
    number("rplanet", 29),
    number("littleg", 32),
    number("rhoplanet", 35),
    number("tplanet", 38),
];

/// A typed column of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Column {
    Text(Vec<String>),
    Number(Vec<f64>),
}

impl Column {
    fn empty(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Text => Column::Text(Vec::new()),
            ColumnKind::Number => Column::Number(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Number(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep the entries whose mask value is `true`.
    pub fn select(&self, mask: &[bool]) -> Column {
        fn pick<T: Clone>(values: &[T], mask: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(v, _)| v.clone())
                .collect()
        }
        match self {
            Column::Text(v) => Column::Text(pick(v, mask)),
            Column::Number(v) => Column::Number(pick(v, mask)),
        }
    }
}

/// A loaded table: one column per schema field, all of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub source: PathBuf,
    columns: Vec<(&'static str, Column)>,
    rows: usize,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| c)
    }

    pub fn text(&self, name: &str) -> Result<&[String], CatalogueError> {
        match self.column(name) {
            Some(Column::Text(v)) => Ok(v),
            _ => Err(self.missing(name)),
        }
    }

    pub fn numbers(&self, name: &str) -> Result<&[f64], CatalogueError> {
        match self.column(name) {
            Some(Column::Number(v)) => Ok(v),
            _ => Err(self.missing(name)),
        }
    }

    /// Apply a row mask to every column in lockstep.
    ///
    /// The mask must have one entry per row.
    pub fn retain(&self, mask: &[bool]) -> Table {
        debug_assert_eq!(mask.len(), self.rows);
        let columns = self
            .columns
            .iter()
            .map(|(name, col)| (*name, col.select(mask)))
            .collect();
        Table {
            source: self.source.clone(),
            columns,
            rows: mask.iter().filter(|k| **k).count(),
        }
    }

    fn missing(&self, name: &str) -> CatalogueError {
        CatalogueError::Parse {
            path: self.source.clone(),
            line: 1,
            message: format!("table has no {name:?} column of the expected kind"),
        }
    }
}

/// Read and parse a table file.
pub fn load_table(path: &Path, schema: &[ColumnSpec]) -> Result<Table, CatalogueError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CatalogueError::MissingCatalogue(path.to_path_buf())
        } else {
            CatalogueError::io(path, e)
        }
    })?;
    parse_table(path, &contents, schema)
}

/// Parse table text. `source` is only used for diagnostics.
///
/// The first line is a header and is always skipped. Whitespace-only lines are
/// ignored.
pub fn parse_table(source: &Path, contents: &str, schema: &[ColumnSpec]) -> Result<Table, CatalogueError> {
    let required = schema.iter().map(|c| c.index + 1).max().unwrap_or(0);
    let mut columns: Vec<(&'static str, Column)> = schema
        .iter()
        .map(|spec| (spec.name, Column::empty(spec.kind)))
        .collect();
    let mut rows = 0usize;

    for (idx, line) in contents.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() < required {
            return Err(CatalogueError::Parse {
                path: source.to_path_buf(),
                line: line_no,
                message: format!("expected at least {required} fields, found {}", tokens.len()),
            });
        }

        for (spec, (_, column)) in schema.iter().zip(columns.iter_mut()) {
            let token = tokens[spec.index];
            match column {
                Column::Text(values) => values.push(token.to_string()),
                Column::Number(values) => {
                    let value = token.parse::<f64>().map_err(|_| CatalogueError::Parse {
                        path: source.to_path_buf(),
                        line: line_no,
                        message: format!(
                            "field {} ({}) is not a number: {token:?}",
                            spec.index, spec.name
                        ),
                    })?;
                    values.push(value);
                }
            }
        }
        rows += 1;
    }

    Ok(Table {
        source: source.to_path_buf(),
        columns,
        rows,
    })
}
