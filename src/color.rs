use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Diverging coefficient scale
// ---------------------------------------------------------------------------

/// Strong negative correlation (firebrick).
pub const NEGATIVE_STOP: Color32 = Color32::from_rgb(0xB2, 0x22, 0x22);
/// Zero correlation (white).
pub const ZERO_STOP: Color32 = Color32::WHITE;
/// Strong positive correlation (navy).
pub const POSITIVE_STOP: Color32 = Color32::from_rgb(0x00, 0x00, 0x80);
/// Fill for cells whose coefficient is unavailable.
pub const NO_DATA: Color32 = Color32::GRAY;

/// Continuous three-stop color scale over the domain [-1, 0, 1].
///
/// Interpolation is piecewise-linear in linear RGB, not a bucket lookup:
/// each half of the domain blends between its two stops.
#[derive(Debug, Clone)]
pub struct DivergingScale {
    negative: LinSrgb,
    zero: LinSrgb,
    positive: LinSrgb,
}

impl Default for DivergingScale {
    fn default() -> Self {
        DivergingScale::new(NEGATIVE_STOP, ZERO_STOP, POSITIVE_STOP)
    }
}

impl DivergingScale {
    pub fn new(negative: Color32, zero: Color32, positive: Color32) -> Self {
        DivergingScale {
            negative: to_linear(negative),
            zero: to_linear(zero),
            positive: to_linear(positive),
        }
    }

    /// Map a coefficient to its color. Inputs outside [-1, 1] clamp to the
    /// end stops.
    pub fn color_at(&self, coef: f64) -> Color32 {
        let t = coef.clamp(-1.0, 1.0) as f32;
        let mixed = if t < 0.0 {
            self.negative.mix(self.zero, t + 1.0)
        } else {
            self.zero.mix(self.positive, t)
        };
        from_linear(mixed)
    }
}

fn to_linear(color: Color32) -> LinSrgb {
    Srgb::new(color.r(), color.g(), color.b())
        .into_format::<f32>()
        .into_linear()
}

fn from_linear(color: LinSrgb) -> Color32 {
    let srgb: Srgb<u8> = Srgb::from_linear(color);
    Color32::from_rgb(srgb.red, srgb.green, srgb.blue)
}
