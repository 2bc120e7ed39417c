/// UI layer: panels around the heatmap and the heatmap renderer itself.
pub mod heatmap;
pub mod panels;
