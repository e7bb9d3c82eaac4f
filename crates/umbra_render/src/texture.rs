//! Textures: spatially varying colors looked up by materials.

use std::sync::Arc;

use umbra_math::Vec3;

use crate::Color;

/// A color lookup `value(u, v, p)`.
///
/// Materials only see this interface, not which variant produced the color.
#[derive(Debug, Clone)]
pub enum Texture {
    /// The same color everywhere.
    Solid(Color),
    /// 3-D checkerboard alternating between two textures.
    ///
    /// The parity is the sign of `sin(f x) sin(f y) sin(f z)`, so the pattern
    /// is solid and independent of the surface parameterization.
    Checker {
        even: Arc<Texture>,
        odd: Arc<Texture>,
        frequency: f32,
    },
}

impl Texture {
    pub fn solid(color: Color) -> Self {
        Texture::Solid(color)
    }

    /// Checker pattern between two colors with the default frequency of 10.
    pub fn checker(even: Color, odd: Color) -> Self {
        Texture::Checker {
            even: Arc::new(Texture::Solid(even)),
            odd: Arc::new(Texture::Solid(odd)),
            frequency: 10.0,
        }
    }

    /// Checker pattern between two arbitrary textures.
    pub fn checker_of(even: Arc<Texture>, odd: Arc<Texture>, frequency: f32) -> Self {
        Texture::Checker {
            even,
            odd,
            frequency,
        }
    }

    /// Color at surface coordinates `(u, v)` and point `p`.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker {
                even,
                odd,
                frequency,
            } => {
                let sines = (frequency * p.x).sin()
                    * (frequency * p.y).sin()
                    * (frequency * p.z).sin();
                if sines < 0.0 {
                    odd.value(u, v, p)
                } else {
                    even.value(u, v, p)
                }
            }
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}
