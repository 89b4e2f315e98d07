//! Unit conversion and the path coordinate scale.
//!
//! Stored values carry their own [`Unit`]; output values are always in the
//! active [`UnitSystem`]. Toolpath coordinates live in a fixed internal space:
//! SVG user units at [`PX_PER_INCH`], multiplied by [`CLIPPER_SCALE`].

use crate::types::{Measurement, Unit, UnitSystem};

/// SVG user units per inch.
pub const PX_PER_INCH: f64 = 90.0;

/// Integer snapping factor applied to SVG coordinates by the path engine.
pub const CLIPPER_SCALE: f64 = 100.0;

pub const MM_PER_INCH: f64 = 25.4;

/// Converts stored values into one active output unit system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitConverter {
    units: UnitSystem,
}

impl UnitConverter {
    pub fn new(units: UnitSystem) -> Self {
        Self { units }
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    /// Convert `value`, expressed in `from`, into `to`.
    ///
    /// Values already in the target unit are returned unchanged.
    pub fn convert(value: f64, from: Unit, to: UnitSystem) -> f64 {
        match (from, to) {
            (Unit::Mm, UnitSystem::Metric) | (Unit::Inch, UnitSystem::Imperial) => value,
            _ => {
                let inches = match from {
                    Unit::Px => value / PX_PER_INCH,
                    Unit::Mm => value / MM_PER_INCH,
                    Unit::Inch => value,
                };
                match to {
                    UnitSystem::Imperial => inches,
                    UnitSystem::Metric => inches * MM_PER_INCH,
                }
            }
        }
    }

    /// Convert a measurement into the active unit system.
    pub fn resolve(&self, measurement: Measurement) -> f64 {
        Self::convert(measurement.value, measurement.unit, self.units)
    }
}

/// Multiplier from internal path coordinates to output length units.
pub fn scale_factor(units: UnitSystem) -> f64 {
    let per_inch = PX_PER_INCH * CLIPPER_SCALE;
    match units {
        UnitSystem::Imperial => 1.0 / per_inch,
        UnitSystem::Metric => MM_PER_INCH / per_inch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_unit_is_identity() {
        assert_eq!(UnitConverter::convert(5.0, Unit::Mm, UnitSystem::Metric), 5.0);
        assert_eq!(
            UnitConverter::convert(0.125, Unit::Inch, UnitSystem::Imperial),
            0.125
        );
    }

    #[test]
    fn test_cross_unit_conversion() {
        assert_eq!(
            UnitConverter::convert(2.0, Unit::Inch, UnitSystem::Metric),
            50.8
        );
        assert_eq!(
            UnitConverter::convert(25.4, Unit::Mm, UnitSystem::Imperial),
            1.0
        );
        assert_eq!(
            UnitConverter::convert(90.0, Unit::Px, UnitSystem::Imperial),
            1.0
        );
        assert_eq!(
            UnitConverter::convert(45.0, Unit::Px, UnitSystem::Metric),
            12.7
        );
    }

    #[test]
    fn test_conversion_preserves_sign() {
        let converted = UnitConverter::convert(-3.0, Unit::Mm, UnitSystem::Imperial);
        assert!(converted < 0.0);
        assert_eq!(UnitConverter::convert(0.0, Unit::Px, UnitSystem::Metric), 0.0);
    }

    #[test]
    fn test_resolve_uses_active_units() {
        let converter = UnitConverter::new(UnitSystem::Imperial);
        assert_eq!(converter.units(), UnitSystem::Imperial);
        assert_eq!(converter.resolve(Measurement::mm(50.8)), 2.0);
        assert_eq!(converter.resolve(Measurement::inch(0.1)), 0.1);
    }

    #[test]
    fn test_scale_factor() {
        let p = PX_PER_INCH;
        let s = CLIPPER_SCALE;
        assert_eq!(scale_factor(UnitSystem::Imperial), 1.0 / (p * s));
        assert_eq!(scale_factor(UnitSystem::Metric), 25.4 / (p * s));
    }

    #[test]
    fn test_scale_maps_one_inch_of_path() {
        let one_inch = PX_PER_INCH * CLIPPER_SCALE;
        assert!((one_inch * scale_factor(UnitSystem::Imperial) - 1.0).abs() < 1e-12);
        assert!((one_inch * scale_factor(UnitSystem::Metric) - 25.4).abs() < 1e-12);
    }
}
