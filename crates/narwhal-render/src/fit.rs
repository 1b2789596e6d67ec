use narwhal_core::geom::Size;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FitOptions {
    pub min_size: f64,
    pub max_size: f64,
    /// Bisection steps; there is no tolerance-based early exit.
    pub iterations: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_size: 4.0,
            max_size: 500.0,
            iterations: 10,
        }
    }
}

/// Result of a fit: `height` is the chosen font size, `width` the text width measured at it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedText {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TextFitter {
    pub options: FitOptions,
}

impl TextFitter {
    pub fn new(options: FitOptions) -> Self {
        Self { options }
    }

    pub fn fit<F>(&self, measure_width: F, box_size: Size, text: &str) -> FittedText
    where
        F: FnMut(f64, &str) -> f64,
    {
        fit_text(
            measure_width,
            box_size,
            self.options.min_size,
            self.options.max_size,
            self.options.iterations,
            text,
        )
    }
}

/// Largest font size in `[min_size, max_size]` whose measured width fits `box_size.width` and
/// which itself does not exceed `box_size.height`.
///
/// Runs exactly `iterations` bisection steps, each probing the midpoint once, then measures the
/// settled lower bound once more: `measure_width` is called `iterations + 1` times. When nothing
/// fits the result is clamped to `min_size`.
pub fn fit_text<F>(
    mut measure_width: F,
    box_size: Size,
    min_size: f64,
    max_size: f64,
    iterations: usize,
    text: &str,
) -> FittedText
where
    F: FnMut(f64, &str) -> f64,
{
    let mut lower = min_size;
    let mut upper = max_size;
    for _ in 0..iterations {
        let pivot = upper / 2.0 + lower / 2.0;
        let width = measure_width(pivot, text);
        if pivot > box_size.height || width > box_size.width {
            upper = pivot;
        } else {
            lower = pivot;
        }
    }

    FittedText {
        width: measure_width(lower, text),
        height: lower,
    }
}
