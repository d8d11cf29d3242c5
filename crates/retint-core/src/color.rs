//! 8-bit RGB color value and the alpha transparency gate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Alpha values below this are treated as transparent and never recolored.
pub const TRANSPARENCY_TOLERANCE: u8 = 10;

/// An 8-bit sRGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Self = Self([0, 0, 0]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub const fn r(self) -> u8 {
        self.0[0]
    }

    pub const fn g(self) -> u8 {
        self.0[1]
    }

    pub const fn b(self) -> u8 {
        self.0[2]
    }

    /// RGB part of an RGBA pixel.
    pub const fn from_rgba(px: [u8; 4]) -> Self {
        Self([px[0], px[1], px[2]])
    }

    /// Recombine with an alpha value.
    pub const fn with_alpha(self, alpha: u8) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], alpha]
    }

    /// Squared Euclidean distance over the three channels.
    pub fn distance_squared(self, other: Self) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| {
                let d = f64::from(a) - f64::from(b);
                d * d
            })
            .sum()
    }

    pub fn is_gray(self) -> bool {
        self.0[0] == self.0[1] && self.0[1] == self.0[2]
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Self(rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

/// True when the pixel's alpha is below `tolerance`.
pub const fn is_transparent(px: [u8; 4], tolerance: u8) -> bool {
    px[3] < tolerance
}
