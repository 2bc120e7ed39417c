/// Correlation layout engine: band scales, triangular masking, cell
/// coloring, and the hover interaction channel.
///
/// `(x, y, coef)` triples go in; a renderable scene graph of cell
/// rectangles and axis labels comes out, memoized per (data, size).
pub mod band;
pub mod heatmap;
pub mod hover;
