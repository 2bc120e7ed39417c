/// Data layer: core types, transposition, and filtering.
///
/// Architecture:
/// ```text
///   schema + matrix
///        │
///        ▼
///   ┌───────────┐
///   │ transform  │  row-major ⇄ column-major
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │  filter    │  typed predicates → surviving rows
///   └───────────┘
///        │
///        ▼
///   reduced matrix → CorrelationSource → (x, y, coef) triples
/// ```
pub mod filter;
pub mod model;
pub mod transform;
