use anyhow::{Context, Result};

use crate::data::model::{
    CorrelationSource, CorrelationTriple, DataType, Dataset, Matrix, Schema, Value,
};

// ---------------------------------------------------------------------------
// Bundled demo data
// ---------------------------------------------------------------------------

/// Correlations for the sample's numeric columns, in the upstream wire
/// shape: the full Cartesian grid, both symmetric halves plus the
/// diagonal. One pair is left without a coefficient.
const SAMPLE_TRIPLES: &str = r#"[
  {"x": "age",    "y": "age",    "coef": 1.0},
  {"x": "age",    "y": "income", "coef": 0.62},
  {"x": "age",    "y": "score",  "coef": -0.18},
  {"x": "age",    "y": "tenure", "coef": 0.87},
  {"x": "income", "y": "age",    "coef": 0.62},
  {"x": "income", "y": "income", "coef": 1.0},
  {"x": "income", "y": "score",  "coef": 0.33},
  {"x": "income", "y": "tenure", "coef": 0.54},
  {"x": "score",  "y": "age",    "coef": -0.18},
  {"x": "score",  "y": "income", "coef": 0.33},
  {"x": "score",  "y": "score",  "coef": 1.0},
  {"x": "score",  "y": "tenure", "coef": null},
  {"x": "tenure", "y": "age",    "coef": 0.87},
  {"x": "tenure", "y": "income", "coef": 0.54},
  {"x": "tenure", "y": "score",  "coef": null},
  {"x": "tenure", "y": "tenure", "coef": 1.0}
]"#;

/// The in-memory sample dataset the demo binary starts with.
pub fn dataset() -> Result<Dataset> {
    let schema = vec![
        Schema::new("age", DataType::Number, 0),
        Schema::new("income", DataType::Number, 1),
        Schema::new("score", DataType::Number, 2),
        Schema::new("tenure", DataType::Number, 3),
        Schema::new("city", DataType::Categorical, 4),
        Schema::new("segment", DataType::Categorical, 5),
    ];
    let rows: Matrix = vec![
        row(25.0, 48_000.0, 71.0, 1.5, "NYC", "retail"),
        row(31.0, 67_000.0, 64.0, 4.0, "NYC", "retail"),
        row(40.0, 92_000.0, 58.0, 9.5, "LA", "enterprise"),
        row(28.0, 55_000.0, 69.0, 2.0, "Chicago", "retail"),
        row(52.0, 120_000.0, 44.0, 18.0, "LA", "enterprise"),
        row(36.0, 78_000.0, 61.0, 6.5, "Houston", "smb"),
        row(23.0, 39_000.0, 77.0, 0.5, "Chicago", "smb"),
        row(47.0, 104_000.0, 49.0, 14.0, "NYC", "enterprise"),
        row(33.0, 71_000.0, 66.0, 5.0, "Houston", "retail"),
        row(58.0, 131_000.0, 41.0, 22.0, "LA", "enterprise"),
        row(29.0, 59_000.0, 70.0, 3.0, "NYC", "smb"),
        row(44.0, 97_000.0, 53.0, 11.0, "Chicago", "enterprise"),
    ];
    Dataset::new(schema, rows).context("building the bundled sample dataset")
}

fn row(age: f64, income: f64, score: f64, tenure: f64, city: &str, segment: &str) -> Vec<Value> {
    vec![
        age.into(),
        income.into(),
        score.into(),
        tenure.into(),
        city.into(),
        segment.into(),
    ]
}

/// The precomputed correlation grid for the sample dataset.
pub fn triples() -> Result<Vec<CorrelationTriple>> {
    serde_json::from_str(SAMPLE_TRIPLES).context("parsing the bundled correlation table")
}

// ---------------------------------------------------------------------------
// Static upstream source
// ---------------------------------------------------------------------------

/// A `CorrelationSource` that always answers with the same precomputed
/// table. The demo uses it so the coefficient math stays upstream; a real
/// embedder would recompute from the filtered matrix here.
pub struct StaticSource {
    triples: Vec<CorrelationTriple>,
}

impl StaticSource {
    pub fn new(triples: Vec<CorrelationTriple>) -> Self {
        StaticSource { triples }
    }
}

impl CorrelationSource for StaticSource {
    fn correlate(&self, _matrix: &Matrix, _schema: &[Schema]) -> Vec<CorrelationTriple> {
        self.triples.clone()
    }
}
