//! Length helpers bridging typographic points and `genpdf`'s millimetres.

use genpdf::Mm;

const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;

/// A length in typographic points (1/72 inch).
///
/// The report model is authored in points, the unit font sizes are expressed in; conversion to
/// [`Mm`] happens once, at the rendering boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Pt(pub f64);

impl Pt {
    /// Creates a length from a number of inches.
    pub fn inch(inches: f64) -> Self {
        Self(inches * POINTS_PER_INCH)
    }

    /// Returns the raw number of points.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the length in millimetres as a plain float.
    pub fn as_mm_f64(self) -> f64 {
        self.0 * MM_PER_INCH / POINTS_PER_INCH
    }

    /// Converts the length into a `genpdf` millimetre value.
    pub fn to_mm(self) -> Mm {
        mm_from_f64(self.as_mm_f64())
    }
}

impl std::ops::Add for Pt {
    type Output = Pt;

    fn add(self, rhs: Pt) -> Pt {
        Pt(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Pt {
    type Output = Pt;

    fn sub(self, rhs: Pt) -> Pt {
        Pt(self.0 - rhs.0)
    }
}

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts millimetres (as reported by `genpdf`) back to points.
pub(crate) fn pt_from_mm(value: Mm) -> Pt {
    Pt(mm_to_f64(value) * POINTS_PER_INCH / MM_PER_INCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_inch_is_72_points() {
        assert_eq!(Pt::inch(1.0), Pt(72.0));
        assert!((Pt(72.0).as_mm_f64() - 25.4).abs() < 1e-9);
    }

    #[test]
    fn mm_round_trip_preserves_points() {
        let back = pt_from_mm(Pt(54.0).to_mm());
        assert!((back.value() - 54.0).abs() < 1e-9);
    }
}
