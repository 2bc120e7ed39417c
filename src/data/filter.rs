use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{DataType, Matrix, Schema, Value};
use super::transform::transpose;

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// The closed set of comparison operators. Categorical columns accept the
/// first four, numeric columns the equality pair plus the four orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not contains")]
    NotContains,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Contains => "contains",
            Operator::NotContains => "not contains",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
        };
        write!(f, "{s}")
    }
}

pub const CATEGORICAL_OPERATORS: [Operator; 4] = [
    Operator::Equal,
    Operator::NotEqual,
    Operator::Contains,
    Operator::NotContains,
];

pub const NUMBER_OPERATORS: [Operator; 6] = [
    Operator::Equal,
    Operator::NotEqual,
    Operator::GreaterThan,
    Operator::GreaterThanOrEqual,
    Operator::LessThan,
    Operator::LessThanOrEqual,
];

/// The operators a column of the given type accepts.
pub fn operators_for(data_type: DataType) -> &'static [Operator] {
    match data_type {
        DataType::Categorical => &CATEGORICAL_OPERATORS,
        DataType::Number => &NUMBER_OPERATORS,
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// A predicate over one column, tagged by the value type it carries.
/// Dispatch happens on the schema's recorded type for `schema_key`, not on
/// this tag; a filter whose payload cannot serve the schema's type
/// evaluates false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filter {
    Categorical {
        #[serde(rename = "schemaKey")]
        schema_key: String,
        operator: Operator,
        value: String,
    },
    Number {
        #[serde(rename = "schemaKey")]
        schema_key: String,
        operator: Operator,
        value: f64,
    },
}

impl Filter {
    pub fn schema_key(&self) -> &str {
        match self {
            Filter::Categorical { schema_key, .. } | Filter::Number { schema_key, .. } => {
                schema_key
            }
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            Filter::Categorical { operator, .. } | Filter::Number { operator, .. } => *operator,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Categorical {
                schema_key,
                operator,
                value,
            } => write!(f, "{schema_key} {operator} \"{value}\""),
            Filter::Number {
                schema_key,
                operator,
                value,
            } => write!(f, "{schema_key} {operator} {value}"),
        }
    }
}

fn categorical_pass(cell: &str, operator: Operator, needle: &str) -> bool {
    match operator {
        Operator::Equal => cell == needle,
        Operator::NotEqual => cell != needle,
        Operator::Contains => cell.contains(needle),
        Operator::NotContains => !cell.contains(needle),
        _ => false,
    }
}

fn number_pass(cell: f64, operator: Operator, rhs: f64) -> bool {
    match operator {
        // Exact comparison; callers pre-round if they want tolerance.
        Operator::Equal => cell == rhs,
        Operator::NotEqual => cell != rhs,
        Operator::GreaterThan => cell > rhs,
        Operator::GreaterThanOrEqual => cell >= rhs,
        Operator::LessThan => cell < rhs,
        Operator::LessThanOrEqual => cell <= rhs,
        _ => false,
    }
}

/// Evaluate one filter against one cell, dispatching on the schema type.
fn filter_pass(filter: &Filter, entry: &Schema, cell: &Value) -> bool {
    match entry.data_type {
        DataType::Categorical => match (cell, filter) {
            (Value::Text(cell), Filter::Categorical { operator, value, .. }) => {
                categorical_pass(cell, *operator, value)
            }
            _ => false,
        },
        DataType::Number => match (cell, filter) {
            (Value::Number(cell), Filter::Number { operator, value, .. }) => {
                number_pass(*cell, *operator, *value)
            }
            _ => false,
        },
    }
}

// ---------------------------------------------------------------------------
// The filter engine
// ---------------------------------------------------------------------------

/// Result of a filtering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub matrix: Matrix,
    /// True when the filters eliminated every row and the engine reverted
    /// to the unfiltered input. Callers surface a notice when set.
    pub fallback: bool,
}

/// Reduce `matrix` to the rows satisfying every filter.
///
/// An empty filter list returns the matrix unchanged. A filter whose
/// `schema_key` resolves to no schema entry evaluates false for every row.
/// If the AND-combination eliminates all rows, the original matrix is
/// returned with the `fallback` flag set.
pub fn filter_matrix(matrix: &Matrix, filters: &[Filter], schema: &[Schema]) -> FilterOutcome {
    if filters.is_empty() {
        return FilterOutcome {
            matrix: matrix.clone(),
            fallback: false,
        };
    }

    let columns = transpose(matrix);
    let survivors: Vec<usize> = (0..matrix.len())
        .filter(|&row| {
            filters.iter().all(|filter| {
                let Some(entry) = schema.iter().find(|s| s.key == filter.schema_key()) else {
                    return false;
                };
                let Some(cell) = columns.get(entry.index).and_then(|col| col.get(row)) else {
                    return false;
                };
                filter_pass(filter, entry, cell)
            })
        })
        .collect();

    if survivors.is_empty() {
        log::warn!("filters eliminated every row, reverting to unfiltered matrix");
        return FilterOutcome {
            matrix: matrix.clone(),
            fallback: true,
        };
    }

    FilterOutcome {
        matrix: survivors.iter().map(|&row| matrix[row].clone()).collect(),
        fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Schema;

    fn schema() -> Vec<Schema> {
        vec![
            Schema::new("age", DataType::Number, 0),
            Schema::new("city", DataType::Categorical, 1),
        ]
    }

    fn matrix() -> Matrix {
        vec![
            vec![25.0.into(), "NYC".into()],
            vec![40.0.into(), "LA".into()],
            vec![31.0.into(), "NYC".into()],
        ]
    }

    fn number(key: &str, operator: Operator, value: f64) -> Filter {
        Filter::Number {
            schema_key: key.to_string(),
            operator,
            value,
        }
    }

    fn categorical(key: &str, operator: Operator, value: &str) -> Filter {
        Filter::Categorical {
            schema_key: key.to_string(),
            operator,
            value: value.to_string(),
        }
    }

    #[test]
    fn empty_filter_list_is_identity() {
        let m = matrix();
        let out = filter_matrix(&m, &[], &schema());
        assert_eq!(out.matrix, m);
        assert!(!out.fallback);
    }

    #[test]
    fn numeric_threshold_keeps_matching_rows() {
        let out = filter_matrix(
            &matrix(),
            &[number("age", Operator::GreaterThanOrEqual, 30.0)],
            &schema(),
        );
        assert_eq!(
            out.matrix,
            vec![
                vec![40.0.into(), "LA".into()],
                vec![31.0.into(), "NYC".into()],
            ]
        );
        assert!(!out.fallback);
    }

    #[test]
    fn all_rows_eliminated_reverts_and_signals() {
        let m = matrix();
        let out = filter_matrix(&m, &[number("age", Operator::GreaterThan, 1000.0)], &schema());
        assert_eq!(out.matrix, m);
        assert!(out.fallback);
    }

    #[test]
    fn unknown_schema_key_fails_closed() {
        let m = matrix();
        let out = filter_matrix(
            &m,
            &[
                number("age", Operator::GreaterThanOrEqual, 0.0),
                number("bogus", Operator::Equal, 1.0),
            ],
            &schema(),
        );
        // The unknown key excludes every row, so the guard reverts.
        assert_eq!(out.matrix, m);
        assert!(out.fallback);
    }

    #[test]
    fn filters_and_combine() {
        let out = filter_matrix(
            &matrix(),
            &[
                number("age", Operator::GreaterThanOrEqual, 30.0),
                categorical("city", Operator::Equal, "NYC"),
            ],
            &schema(),
        );
        assert_eq!(out.matrix, vec![vec![Value::from(31.0), Value::from("NYC")]]);
    }

    #[test]
    fn adding_a_filter_never_grows_the_result() {
        let base = vec![number("age", Operator::GreaterThanOrEqual, 26.0)];
        let narrowed = vec![
            number("age", Operator::GreaterThanOrEqual, 26.0),
            categorical("city", Operator::Equal, "LA"),
        ];
        let broad = filter_matrix(&matrix(), &base, &schema());
        let narrow = filter_matrix(&matrix(), &narrowed, &schema());
        assert!(!broad.fallback && !narrow.fallback);
        assert!(narrow.matrix.len() <= broad.matrix.len());
    }

    #[test]
    fn categorical_substring_operators() {
        let contains = filter_matrix(
            &matrix(),
            &[categorical("city", Operator::Contains, "Y")],
            &schema(),
        );
        assert_eq!(contains.matrix.len(), 2);

        let not_contains = filter_matrix(
            &matrix(),
            &[categorical("city", Operator::NotContains, "Y")],
            &schema(),
        );
        assert_eq!(not_contains.matrix, vec![vec![Value::from(40.0), Value::from("LA")]]);
    }

    #[test]
    fn numeric_equality_is_exact() {
        let out = filter_matrix(&matrix(), &[number("age", Operator::Equal, 31.0)], &schema());
        assert_eq!(out.matrix.len(), 1);
        let out = filter_matrix(
            &matrix(),
            &[number("age", Operator::Equal, 31.0000001)],
            &schema(),
        );
        assert!(out.fallback);
    }

    #[test]
    fn operator_outside_the_column_type_fails_closed() {
        // `contains` is not a numeric operator; the filter never passes.
        let m = matrix();
        let out = filter_matrix(&m, &[number("age", Operator::Contains, 3.0)], &schema());
        assert_eq!(out.matrix, m);
        assert!(out.fallback);
    }

    #[test]
    fn schema_type_wins_over_filter_tag() {
        // A categorical filter aimed at the numeric column cannot serve the
        // schema's type and evaluates false for every row.
        let m = matrix();
        let out = filter_matrix(&m, &[categorical("age", Operator::Equal, "25")], &schema());
        assert_eq!(out.matrix, m);
        assert!(out.fallback);
    }

    #[test]
    fn zero_row_matrix_stays_empty() {
        let out = filter_matrix(
            &Matrix::new(),
            &[number("age", Operator::GreaterThan, 0.0)],
            &schema(),
        );
        assert!(out.matrix.is_empty());
        assert!(out.fallback);
    }

    #[test]
    fn input_matrix_is_not_mutated() {
        let m = matrix();
        let snapshot = m.clone();
        let _ = filter_matrix(&m, &[number("age", Operator::LessThan, 30.0)], &schema());
        assert_eq!(m, snapshot);
    }

    #[test]
    fn filter_wire_shape_round_trips() {
        let json = r#"{"type":"number","schemaKey":"age","operator":">=","value":30.0}"#;
        let filter: Filter = serde_json::from_str(json).unwrap();
        assert_eq!(filter, number("age", Operator::GreaterThanOrEqual, 30.0));
        let back = serde_json::to_string(&filter).unwrap();
        assert_eq!(serde_json::from_str::<Filter>(&back).unwrap(), filter);

        let json = r#"{"type":"categorical","schemaKey":"city","operator":"not contains","value":"NY"}"#;
        let filter: Filter = serde_json::from_str(json).unwrap();
        assert_eq!(filter, categorical("city", Operator::NotContains, "NY"));
    }

    #[test]
    fn operator_sets_match_the_column_types() {
        assert_eq!(operators_for(DataType::Categorical), &CATEGORICAL_OPERATORS);
        assert_eq!(operators_for(DataType::Number), &NUMBER_OPERATORS);
        assert!(!NUMBER_OPERATORS.contains(&Operator::Contains));
        assert!(!CATEGORICAL_OPERATORS.contains(&Operator::GreaterThan));
    }
}
