// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translations and their CSS-style representation.
//!
//! Hosts report a surface's resolved transform as a string in the form a
//! browser's computed style uses: `none`, `matrix(a, b, c, d, e, f)` or
//! `matrix3d(m11, …, m44)`. [`parse_translation`] extracts the translation
//! pair from either form. [`Transform3d`] is the column-major matrix the
//! in-memory [`SurfaceStore`](crate::surface::SurfaceStore) keeps per surface
//! and serializes back to the same resolved form.

use alloc::format;
use alloc::string::String;

use kurbo::Vec2;

/// How a committed translation is expressed on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// `translate(xpx, ypx)`.
    #[default]
    TwoD,
    /// `translate3d(xpx, ypx, 0)`, which hosts typically promote to a
    /// compositor layer.
    ThreeD,
}

impl RenderMode {
    /// Formats `translation` as a CSS transform value in this mode.
    #[must_use]
    pub fn css(self, translation: Vec2) -> String {
        match self {
            Self::TwoD => format!("translate({}px, {}px)", translation.x, translation.y),
            Self::ThreeD => format!("translate3d({}px, {}px, 0px)", translation.x, translation.y),
        }
    }
}

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// The x/y translation carried in the last column.
    #[inline]
    #[must_use]
    pub const fn translation_2d(self) -> Vec2 {
        Vec2::new(self.cols[3][0], self.cols[3][1])
    }

    /// Whether the transform is expressible as a 2D affine `matrix(…)`.
    #[must_use]
    pub fn is_2d(&self) -> bool {
        let c = &self.cols;
        c[0][2] == 0.0
            && c[0][3] == 0.0
            && c[1][2] == 0.0
            && c[1][3] == 0.0
            && c[2] == [0.0, 0.0, 1.0, 0.0]
            && c[3][2] == 0.0
            && c[3][3] == 1.0
    }

    /// Serializes the transform the way a resolved style reports it.
    ///
    /// The identity serializes as `none`; 2D-expressible transforms use
    /// `matrix(…)`, everything else `matrix3d(…)`.
    #[must_use]
    pub fn to_css(&self) -> String {
        if *self == Self::IDENTITY {
            return String::from("none");
        }
        let c = &self.cols;
        if self.is_2d() {
            return format!(
                "matrix({}, {}, {}, {}, {}, {})",
                c[0][0], c[0][1], c[1][0], c[1][1], c[3][0], c[3][1]
            );
        }
        format!(
            "matrix3d({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {})",
            c[0][0],
            c[0][1],
            c[0][2],
            c[0][3],
            c[1][0],
            c[1][1],
            c[1][2],
            c[1][3],
            c[2][0],
            c[2][1],
            c[2][2],
            c[2][3],
            c[3][0],
            c[3][1],
            c[3][2],
            c[3][3],
        )
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Component counts of the two resolved matrix forms.
const MATRIX_2D_LEN: usize = 6;
const MATRIX_3D_LEN: usize = 16;

/// Extracts the x/y translation from a resolved transform string.
///
/// `matrix(…)` carries the translation in components 4 and 5, `matrix3d(…)`
/// in components 12 and 13. Anything else (including `none`, the empty
/// string, unknown functions, or a wrong component count) reads as zero.
/// A component that is not a number reads as zero on its own.
#[must_use]
pub fn parse_translation(css: &str) -> Vec2 {
    let Some((name, args)) = split_function(css.trim()) else {
        return Vec2::ZERO;
    };
    let (expected, ix, iy) = match name {
        "matrix" => (MATRIX_2D_LEN, 4, 5),
        "matrix3d" => (MATRIX_3D_LEN, 12, 13),
        _ => return Vec2::ZERO,
    };
    if args.split(',').count() != expected {
        return Vec2::ZERO;
    }
    let mut x = 0.0;
    let mut y = 0.0;
    for (i, part) in args.split(',').enumerate() {
        if i == ix {
            x = parse_component(part);
        } else if i == iy {
            y = parse_component(part);
        }
    }
    Vec2::new(x, y)
}

/// Splits `name(args)` into its name and argument list.
fn split_function(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let inner = s.strip_suffix(')')?;
    let name = s[..open].trim();
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some((name, &inner[open + 1..]))
}

fn parse_component(part: &str) -> f64 {
    let trimmed = part.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    match number.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
