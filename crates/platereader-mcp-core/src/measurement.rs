//! Measurement configuration types.
//!
//! Two measurement families exist on this device line: absorbance (single or
//! multi wavelength, picked by what the connected device reports) and
//! luminescence (integration mode plus a per-well selection mask).

use std::str::FromStr;

use crate::error::Error;

/// Number of wells on the plates this device family reads.
pub const WELL_COUNT: usize = 96;

/// Luminescence integration mode: the sensitivity/speed trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationMode {
    /// Long integration, highest sensitivity.
    Sensitive,
    /// Short integration, fastest read.
    Fast,
}

impl FromStr for IntegrationMode {
    type Err = Error;

    /// Parses a mode name case-insensitively. Only the two recognized names
    /// are accepted; anything else is an input-validation error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("sensitive") {
            Ok(IntegrationMode::Sensitive)
        } else if s.eq_ignore_ascii_case("fast") {
            Ok(IntegrationMode::Fast)
        } else {
            Err(Error::InvalidMode(s.to_string()))
        }
    }
}

/// Configuration for one luminescence measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuminescenceConfig {
    /// Integration mode.
    pub mode: IntegrationMode,
    /// Exactly [`WELL_COUNT`] selection flags, one per plate well.
    pub selected_wells: Vec<bool>,
}

impl LuminescenceConfig {
    /// Builds a config, validating the well selection length.
    ///
    /// `None` selects every well. A supplied list must contain exactly
    /// [`WELL_COUNT`] entries; any other length is rejected before any
    /// hardware call is made.
    pub fn new(mode: IntegrationMode, selected_wells: Option<Vec<bool>>) -> Result<Self, Error> {
        let selected_wells = match selected_wells {
            Some(wells) => {
                if wells.len() != WELL_COUNT {
                    return Err(Error::WellCount {
                        expected: WELL_COUNT,
                        actual: wells.len(),
                    });
                }
                wells
            }
            None => vec![true; WELL_COUNT],
        };
        Ok(Self {
            mode,
            selected_wells,
        })
    }
}

/// Configuration for one absorbance measurement.
///
/// The variant is not a caller choice: devices reporting a single available
/// wavelength take the single-measurement path, devices reporting several
/// take the multi-measurement path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsorbanceConfig {
    /// One target wavelength.
    Single {
        /// Sample wavelength in nanometers.
        wavelength_nm: u16,
    },
    /// An ordered set of target wavelengths.
    Multiple {
        /// Sample wavelengths in nanometers, in device order.
        wavelengths_nm: Vec<u16>,
    },
}

impl AbsorbanceConfig {
    /// Selects the config variant from the device's available wavelengths.
    ///
    /// Returns `None` when the device reports no wavelengths at all, which
    /// the caller must treat as a device fault.
    pub fn from_available(wavelengths: &[u16]) -> Option<Self> {
        match wavelengths {
            [] => None,
            [single] => Some(AbsorbanceConfig::Single {
                wavelength_nm: *single,
            }),
            many => Some(AbsorbanceConfig::Multiple {
                wavelengths_nm: many.to_vec(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_is_case_insensitive() {
        assert_eq!(
            "sensitive".parse::<IntegrationMode>().unwrap(),
            IntegrationMode::Sensitive
        );
        assert_eq!(
            "Sensitive".parse::<IntegrationMode>().unwrap(),
            IntegrationMode::Sensitive
        );
        assert_eq!(
            "FAST".parse::<IntegrationMode>().unwrap(),
            IntegrationMode::Fast
        );
    }

    #[test]
    fn test_mode_parse_rejects_unknown_names() {
        let err = "fast-mode".parse::<IntegrationMode>().unwrap_err();
        assert!(matches!(err, Error::InvalidMode(s) if s == "fast-mode"));
    }

    #[test]
    fn test_default_well_selection_selects_all() {
        let config = LuminescenceConfig::new(IntegrationMode::Sensitive, None).unwrap();
        assert_eq!(config.selected_wells.len(), WELL_COUNT);
        assert!(config.selected_wells.iter().all(|&w| w));
    }

    #[test]
    fn test_well_selection_must_be_exactly_96() {
        for bad_len in [0, 95, 97] {
            let err =
                LuminescenceConfig::new(IntegrationMode::Fast, Some(vec![true; bad_len]))
                    .unwrap_err();
            assert!(
                matches!(err, Error::WellCount { expected: 96, actual } if actual == bad_len),
                "length {bad_len} should be rejected"
            );
        }
        assert!(
            LuminescenceConfig::new(IntegrationMode::Fast, Some(vec![false; 96])).is_ok()
        );
    }

    #[test]
    fn test_absorbance_variant_follows_wavelength_count() {
        assert_eq!(AbsorbanceConfig::from_available(&[]), None);
        assert_eq!(
            AbsorbanceConfig::from_available(&[450]),
            Some(AbsorbanceConfig::Single { wavelength_nm: 450 })
        );
        assert_eq!(
            AbsorbanceConfig::from_available(&[450, 560, 605]),
            Some(AbsorbanceConfig::Multiple {
                wavelengths_nm: vec![450, 560, 605]
            })
        );
    }
}
