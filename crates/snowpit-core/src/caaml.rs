#![forbid(unsafe_code)]

//! CAAML code tables for per-layer observations.
//!
//! Grain shape classes and subclasses follow the International
//! Classification for Seasonal Snow on the Ground. Liquid water content uses
//! the five-step CAAML scale. These tables are fixed for a session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A subclass entry in a grain shape table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subshape {
    pub code: &'static str,
    pub label: &'static str,
}

const fn sub(code: &'static str, label: &'static str) -> Subshape {
    Subshape { code, label }
}

const PP_SUBSHAPES: &[Subshape] = &[
    sub("PPco", "Columns"),
    sub("PPnd", "Needles"),
    sub("PPpl", "Plates"),
    sub("PPsd", "Stellars, Dendrites"),
    sub("PPir", "Irregular crystals"),
    sub("PPgp", "Graupel"),
    sub("PPhl", "Hail"),
    sub("PPip", "Ice pellets"),
    sub("PPrm", "Rime"),
];

const MM_SUBSHAPES: &[Subshape] = &[
    sub("MMrp", "Round polycrystalline particles"),
    sub("MMci", "Crushed ice particles"),
];

const DF_SUBSHAPES: &[Subshape] = &[
    sub("DFdc", "Partly decomposed precipitation particles"),
    sub("DFbk", "Wind-broken precipitation particles"),
];

const RG_SUBSHAPES: &[Subshape] = &[
    sub("RGsr", "Small rounded particles"),
    sub("RGlr", "Large rounded particles"),
    sub("RGwp", "Wind packed"),
    sub("RGxf", "Faceted rounded particles"),
];

const FC_SUBSHAPES: &[Subshape] = &[
    sub("FCso", "Solid faceted particles"),
    sub("FCsf", "Near surface faceted particles"),
    sub("FCxr", "Rounding faceted particles"),
];

const DH_SUBSHAPES: &[Subshape] = &[
    sub("DHcp", "Hollow cups"),
    sub("DHpr", "Hollow prisms"),
    sub("DHch", "Chains of depth hoar"),
    sub("DHla", "Large striated crystals"),
    sub("DHxr", "Rounding depth hoar"),
];

const SH_SUBSHAPES: &[Subshape] = &[
    sub("SHsu", "Surface hoar crystals"),
    sub("SHcv", "Cavity or crevasse hoar"),
    sub("SHxr", "Rounding surface hoar"),
];

const MF_SUBSHAPES: &[Subshape] = &[
    sub("MFcl", "Clustered rounded grains"),
    sub("MFpc", "Rounded polycrystals"),
    sub("MFsl", "Slush"),
    sub("MFcr", "Melt-freeze crust"),
];

const IF_SUBSHAPES: &[Subshape] = &[
    sub("IFil", "Ice layer"),
    sub("IFic", "Ice column"),
    sub("IFbi", "Basal ice"),
    sub("IFrc", "Rain crust"),
    sub("IFsc", "Sun crust"),
];

/// Main grain shape class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GrainShape {
    Pp,
    Mm,
    Df,
    Rg,
    Fc,
    Dh,
    Sh,
    Mf,
    If,
}

impl GrainShape {
    pub const ALL: [Self; 9] = [
        Self::Pp,
        Self::Mm,
        Self::Df,
        Self::Rg,
        Self::Fc,
        Self::Dh,
        Self::Sh,
        Self::Mf,
        Self::If,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pp => "PP",
            Self::Mm => "MM",
            Self::Df => "DF",
            Self::Rg => "RG",
            Self::Fc => "FC",
            Self::Dh => "DH",
            Self::Sh => "SH",
            Self::Mf => "MF",
            Self::If => "IF",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pp => "Precipitation particles",
            Self::Mm => "Machine made snow",
            Self::Df => "Decomposing and fragmented particles",
            Self::Rg => "Rounded grains",
            Self::Fc => "Faceted crystals",
            Self::Dh => "Depth hoar",
            Self::Sh => "Surface hoar",
            Self::Mf => "Melt forms",
            Self::If => "Ice formations",
        }
    }

    /// Subclasses valid for this class.
    #[must_use]
    pub const fn subshapes(self) -> &'static [Subshape] {
        match self {
            Self::Pp => PP_SUBSHAPES,
            Self::Mm => MM_SUBSHAPES,
            Self::Df => DF_SUBSHAPES,
            Self::Rg => RG_SUBSHAPES,
            Self::Fc => FC_SUBSHAPES,
            Self::Dh => DH_SUBSHAPES,
            Self::Sh => SH_SUBSHAPES,
            Self::Mf => MF_SUBSHAPES,
            Self::If => IF_SUBSHAPES,
        }
    }

    /// Look up a subclass by code.
    #[must_use]
    pub fn subshape(self, code: &str) -> Option<&'static Subshape> {
        self.subshapes().iter().find(|entry| entry.code == code)
    }
}

impl fmt::Display for GrainShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing a code that is not in its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCode {
    pub table: &'static str,
    pub code: String,
}

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} code {:?}", self.table, self.code)
    }
}

impl std::error::Error for UnknownCode {}

impl FromStr for GrainShape {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.code() == s)
            .ok_or_else(|| UnknownCode {
                table: "grain shape",
                code: s.to_owned(),
            })
    }
}

/// Liquid water content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterContent {
    #[serde(rename = "D")]
    Dry,
    #[serde(rename = "M")]
    Moist,
    #[serde(rename = "W")]
    Wet,
    #[serde(rename = "V")]
    VeryWet,
    #[serde(rename = "S")]
    Soaked,
}

impl WaterContent {
    pub const ALL: [Self; 5] = [Self::Dry, Self::Moist, Self::Wet, Self::VeryWet, Self::Soaked];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Dry => "D",
            Self::Moist => "M",
            Self::Wet => "W",
            Self::VeryWet => "V",
            Self::Soaked => "S",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dry => "Dry",
            Self::Moist => "Moist",
            Self::Wet => "Wet",
            Self::VeryWet => "Very wet",
            Self::Soaked => "Soaked",
        }
    }
}

impl fmt::Display for WaterContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WaterContent {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lwc| lwc.code() == s)
            .ok_or_else(|| UnknownCode {
                table: "liquid water content",
                code: s.to_owned(),
            })
    }
}

/// Grain sizes offered by the form, in mm.
pub const GRAIN_SIZES_MM: [f64; 12] = [0.1, 0.2, 0.3, 0.5, 0.7, 1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subshape_codes_are_prefixed_by_class() {
        for shape in GrainShape::ALL {
            assert!(!shape.subshapes().is_empty());
            for entry in shape.subshapes() {
                assert!(
                    entry.code.starts_with(shape.code()),
                    "{} not under {}",
                    entry.code,
                    shape.code()
                );
            }
        }
    }

    #[test]
    fn lookup_subshape() {
        assert_eq!(
            GrainShape::Fc.subshape("FCxr").map(|s| s.label),
            Some("Rounding faceted particles")
        );
        assert!(GrainShape::Fc.subshape("DHcp").is_none());
    }

    #[test]
    fn parse_codes() {
        assert_eq!("DH".parse::<GrainShape>(), Ok(GrainShape::Dh));
        assert_eq!("V".parse::<WaterContent>(), Ok(WaterContent::VeryWet));
        let err = "XX".parse::<GrainShape>().expect_err("unknown");
        assert_eq!(err.to_string(), r#"unknown grain shape code "XX""#);
    }

    #[test]
    fn grain_sizes_are_sorted() {
        assert!(GRAIN_SIZES_MM.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
