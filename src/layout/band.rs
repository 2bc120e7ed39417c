// ---------------------------------------------------------------------------
// Band scale – discrete labels → padded pixel intervals
// ---------------------------------------------------------------------------

/// Maps an ordered set of labels to uniform, padded slots along one axis.
///
/// Slot geometry follows the usual band-scale construction: the range is
/// divided into `n` steps with the padding fraction reserved between
/// neighbouring bands and at both ends, and the remaining band is centered
/// within its step.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    start: f32,
    step: f32,
    bandwidth: f32,
}

impl BandScale {
    /// Build a scale for `domain` spanning `range`, with `padding` as a
    /// fraction of the step (both between bands and at the outer edges).
    pub fn new(domain: Vec<String>, range: (f32, f32), padding: f32) -> Self {
        let n = domain.len() as f32;
        let span = range.1 - range.0;
        let step = span / (n - padding + padding * 2.0).max(1.0);
        let start = range.0 + (span - step * (n - padding)) * 0.5;
        let bandwidth = step * (1.0 - padding);
        BandScale {
            domain,
            start,
            step,
            bandwidth,
        }
    }

    /// Leading edge of the band for `label`, or `None` if the label is not
    /// in the domain.
    pub fn position(&self, label: &str) -> Option<f32> {
        let i = self.index_of(label)?;
        Some(self.start + self.step * i as f32)
    }

    /// Position of `label` within the domain ordering.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.domain.iter().position(|l| l == label)
    }

    /// Width of every band.
    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    /// Distance between the leading edges of neighbouring bands.
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}
