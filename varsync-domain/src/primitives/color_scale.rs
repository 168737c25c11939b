//! 39-step colour scales derived from one base colour.

use varsync_core::Color;

/// The step that holds the base colour.
pub const BASE_STEP: u16 = 500;

/// Steps 25, 50, ..., 975.
pub const SCALE_STEPS: [u16; 39] = {
    let mut steps = [0u16; 39];
    let mut i = 0;
    while i < steps.len() {
        steps[i] = (i as u16 + 1) * 25;
        i += 1;
    }
    steps
};

/// Swatch for one step of the scale around `base`.
///
/// Below 500 the base is mixed over white with weight `step / 500`, above it
/// over black with weight `(1000 - step) / 500`. Step 500 is `base` itself.
pub fn swatch(base: Color, step: u16) -> Color {
    match step.cmp(&BASE_STEP) {
        std::cmp::Ordering::Less => base.mix_over(&Color::WHITE, f32::from(step) / 500.0),
        std::cmp::Ordering::Equal => base,
        std::cmp::Ordering::Greater => {
            let weight = f32::from(1000u16.saturating_sub(step)) / 500.0;
            base.mix_over(&Color::BLACK, weight)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    base: Color,
    swatches: Vec<(u16, Color)>,
}

impl ColorScale {
    pub fn generate(base: Color) -> Self {
        let swatches = SCALE_STEPS.iter().map(|&step| (step, swatch(base, step))).collect();
        Self { base, swatches }
    }

    pub fn base(&self) -> Color {
        self.base
    }

    pub fn get(&self, step: u16) -> Option<Color> {
        self.swatches.iter().find(|(s, _)| *s == step).map(|(_, c)| *c)
    }

    /// Swatches in ascending step order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, Color)> + '_ {
        self.swatches.iter().copied()
    }
}
