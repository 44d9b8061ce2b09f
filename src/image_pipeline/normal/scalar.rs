//! Per-pixel height policies.

use std::fmt;

use tracing::debug;

use crate::image_pipeline::source::types::Rgb;

/// How a pixel's three channels collapse into one height value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarOp {
    /// ITU BT.601 weighted luminance.
    #[default]
    Luminance,
    /// `R + G + B / 3`. Not a channel average; kept for output compatibility.
    Grayscale,
    /// `R + G + B`.
    Sum,
    Red,
    Green,
    Blue,
}

impl ScalarOp {
    pub const ALL: [ScalarOp; 6] = [
        ScalarOp::Luminance,
        ScalarOp::Grayscale,
        ScalarOp::Sum,
        ScalarOp::Red,
        ScalarOp::Green,
        ScalarOp::Blue,
    ];

    /// Resolves a policy name or alias, ignoring case and surrounding
    /// whitespace. Anything unrecognised falls back to [`ScalarOp::Luminance`].
    pub fn from_key(key: &str) -> Self {
        let key = key.trim().to_ascii_lowercase();
        match key.as_str() {
            "luminance" | "lum" | "l" => ScalarOp::Luminance,
            "grayscale" | "gray" | "gs" | "avg" | "grey" | "greyscale" => ScalarOp::Grayscale,
            "sum" | "s" | "total" => ScalarOp::Sum,
            "red" | "r" | "x" => ScalarOp::Red,
            "green" | "g" | "y" => ScalarOp::Green,
            "blue" | "b" | "z" => ScalarOp::Blue,
            _ => {
                debug!(key = %key, "Unknown pixel op, using luminance");
                ScalarOp::Luminance
            }
        }
    }

    pub fn apply(self, pixel: Rgb) -> f64 {
        (self.as_fn())(pixel)
    }

    /// The policy as a plain function, so the per-pixel loop never matches
    /// on the variant.
    pub fn as_fn(self) -> fn(Rgb) -> f64 {
        match self {
            ScalarOp::Luminance => luminance,
            ScalarOp::Grayscale => grayscale,
            ScalarOp::Sum => sum,
            ScalarOp::Red => red,
            ScalarOp::Green => green,
            ScalarOp::Blue => blue,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarOp::Luminance => "luminance",
            ScalarOp::Grayscale => "grayscale",
            ScalarOp::Sum => "sum",
            ScalarOp::Red => "red",
            ScalarOp::Green => "green",
            ScalarOp::Blue => "blue",
        }
    }
}

impl fmt::Display for ScalarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn luminance([r, g, b]: Rgb) -> f64 {
    0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
}

fn grayscale([r, g, b]: Rgb) -> f64 {
    f64::from(r) + f64::from(g) + f64::from(b) / 3.0
}

fn sum([r, g, b]: Rgb) -> f64 {
    f64::from(r) + f64::from(g) + f64::from(b)
}

fn red([r, _, _]: Rgb) -> f64 {
    f64::from(r)
}

fn green([_, g, _]: Rgb) -> f64 {
    f64::from(g)
}

fn blue([_, _, b]: Rgb) -> f64 {
    f64::from(b)
}
