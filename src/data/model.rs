use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Column types and values
// ---------------------------------------------------------------------------

/// Semantic type of a dataset column. Every column is one or the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Categorical,
    Number,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Categorical => write!(f, "categorical"),
            DataType::Number => write!(f, "number"),
        }
    }
}

/// A single cell value. Its runtime kind is expected to match the schema
/// entry whose index it occupies; filter evaluation fails closed when it
/// does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

// ---------------------------------------------------------------------------
// Schema – ordered description of the dataset's columns
// ---------------------------------------------------------------------------

/// One column of the dataset: stable key, semantic type, and position
/// within a row. Keys and indices are unique per schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub key: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub index: usize,
}

impl Schema {
    pub fn new(key: &str, data_type: DataType, index: usize) -> Self {
        Schema {
            key: key.to_string(),
            data_type,
            index,
        }
    }
}

/// One record of the dataset, laid out per the schema indices.
pub type Row = Vec<Value>;

/// An ordered sequence of rows. Row order is meaningful; filtering never
/// mutates a matrix in place, it produces a new one.
pub type Matrix = Vec<Row>;

// ---------------------------------------------------------------------------
// Dataset – schema + rows, validated on construction
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("duplicate column key `{0}`")]
    DuplicateKey(String),
    #[error("duplicate column index {0}")]
    DuplicateIndex(usize),
    #[error("column `{key}` has index {index} but rows are {width} wide")]
    IndexOutOfBounds {
        key: String,
        index: usize,
        width: usize,
    },
    #[error("row {row} has {got} values, schema expects {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
}

/// The full dataset handed to the filter engine.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub schema: Vec<Schema>,
    pub rows: Matrix,
}

impl Dataset {
    /// Build a dataset, enforcing the schema invariants: unique keys,
    /// unique in-bounds indices, and uniform row width.
    pub fn new(schema: Vec<Schema>, rows: Matrix) -> Result<Self, SchemaError> {
        let width = schema.len();
        for (i, entry) in schema.iter().enumerate() {
            if schema[..i].iter().any(|s| s.key == entry.key) {
                return Err(SchemaError::DuplicateKey(entry.key.clone()));
            }
            if schema[..i].iter().any(|s| s.index == entry.index) {
                return Err(SchemaError::DuplicateIndex(entry.index));
            }
            if entry.index >= width {
                return Err(SchemaError::IndexOutOfBounds {
                    key: entry.key.clone(),
                    index: entry.index,
                    width,
                });
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(SchemaError::RaggedRow {
                    row: i,
                    got: row.len(),
                    expected: width,
                });
            }
        }
        Ok(Dataset { schema, rows })
    }

    /// Look up a schema entry by its column key.
    pub fn column(&self, key: &str) -> Option<&Schema> {
        self.schema.iter().find(|s| s.key == key)
    }

    /// Schema entries sorted by their row position, for display.
    pub fn columns_by_index(&self) -> Vec<&Schema> {
        let mut cols: Vec<&Schema> = self.schema.iter().collect();
        cols.sort_by_key(|s| s.index);
        cols
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Correlation triples and the upstream seam
// ---------------------------------------------------------------------------

/// One pairwise correlation: labels from the correlated column universe and
/// a Pearson-style coefficient in [-1, 1], or `None` when unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationTriple {
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub coef: Option<f64>,
}

impl CorrelationTriple {
    pub fn new(x: &str, y: &str, coef: Option<f64>) -> Self {
        CorrelationTriple {
            x: x.to_string(),
            y: y.to_string(),
            coef,
        }
    }
}

/// Supplier of correlation triples for a (possibly filtered) matrix.
/// The coefficient computation itself lives behind this seam, outside the
/// crate; the application re-queries it after every filter change.
pub trait CorrelationSource {
    fn correlate(&self, matrix: &Matrix, schema: &[Schema]) -> Vec<CorrelationTriple>;
}
