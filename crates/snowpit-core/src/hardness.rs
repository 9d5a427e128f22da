#![forbid(unsafe_code)]

//! CAAML hand hardness codes and the X-axis hardness scale.
//!
//! The scale divides the graph width into one equal band per code, ordered
//! softest (`F-`) to hardest (`I`). Each band is half-open
//! `[x_min, next.x_min)`; the last band is open-ended so every X at or past
//! its start resolves to the hardest code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::GraphGeometry;

/// Hand hardness classification, softest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandHardness {
    #[serde(rename = "F-")]
    FistMinus,
    #[serde(rename = "F")]
    Fist,
    #[serde(rename = "F+")]
    FistPlus,
    #[serde(rename = "4F-")]
    FourFingerMinus,
    #[serde(rename = "4F")]
    FourFinger,
    #[serde(rename = "4F+")]
    FourFingerPlus,
    #[serde(rename = "1F-")]
    OneFingerMinus,
    #[serde(rename = "1F")]
    OneFinger,
    #[serde(rename = "1F+")]
    OneFingerPlus,
    #[serde(rename = "P-")]
    PencilMinus,
    #[serde(rename = "P")]
    Pencil,
    #[serde(rename = "P+")]
    PencilPlus,
    #[serde(rename = "K-")]
    KnifeMinus,
    #[serde(rename = "K")]
    Knife,
    #[serde(rename = "K+")]
    KnifePlus,
    #[serde(rename = "I-")]
    IceMinus,
    #[serde(rename = "I")]
    Ice,
}

impl HandHardness {
    /// Every code in scale order.
    pub const ALL: [Self; 17] = [
        Self::FistMinus,
        Self::Fist,
        Self::FistPlus,
        Self::FourFingerMinus,
        Self::FourFinger,
        Self::FourFingerPlus,
        Self::OneFingerMinus,
        Self::OneFinger,
        Self::OneFingerPlus,
        Self::PencilMinus,
        Self::Pencil,
        Self::PencilPlus,
        Self::KnifeMinus,
        Self::Knife,
        Self::KnifePlus,
        Self::IceMinus,
        Self::Ice,
    ];

    /// Softest code.
    pub const SOFTEST: Self = Self::FistMinus;

    /// Hardest code.
    pub const HARDEST: Self = Self::Ice;

    /// CAAML code string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::FistMinus => "F-",
            Self::Fist => "F",
            Self::FistPlus => "F+",
            Self::FourFingerMinus => "4F-",
            Self::FourFinger => "4F",
            Self::FourFingerPlus => "4F+",
            Self::OneFingerMinus => "1F-",
            Self::OneFinger => "1F",
            Self::OneFingerPlus => "1F+",
            Self::PencilMinus => "P-",
            Self::Pencil => "P",
            Self::PencilPlus => "P+",
            Self::KnifeMinus => "K-",
            Self::Knife => "K",
            Self::KnifePlus => "K+",
            Self::IceMinus => "I-",
            Self::Ice => "I",
        }
    }

    /// Position in scale order (0 = softest).
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Whether the code gets a labelled major tick (no `+`/`-` qualifier).
    #[must_use]
    pub const fn is_major(self) -> bool {
        matches!(
            self,
            Self::Fist | Self::FourFinger | Self::OneFinger | Self::Pencil | Self::Knife | Self::Ice
        )
    }
}

impl fmt::Display for HandHardness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown hardness code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownHardnessCode(pub String);

impl fmt::Display for UnknownHardnessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hand hardness code {:?}", self.0)
    }
}

impl std::error::Error for UnknownHardnessCode {}

impl FromStr for HandHardness {
    type Err = UnknownHardnessCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|hardness| hardness.code() == s)
            .ok_or_else(|| UnknownHardnessCode(s.to_owned()))
    }
}

/// A layer's hardness: a code, or the sentinel for "never set by the user".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum Hardness {
    #[default]
    Untouched,
    Code(HandHardness),
}

impl Hardness {
    /// The code, if one has been set.
    #[must_use]
    pub const fn code(self) -> Option<HandHardness> {
        match self {
            Self::Untouched => None,
            Self::Code(code) => Some(code),
        }
    }
}

impl From<HandHardness> for Hardness {
    fn from(code: HandHardness) -> Self {
        Self::Code(code)
    }
}

/// One band of the hardness scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardnessBand {
    pub code: HandHardness,
    pub is_major_tick: bool,
    /// Left edge of the band in pixels.
    pub x_min: f64,
}

/// Immutable lookup table from hardness codes to X-axis bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardnessScale {
    bands: Vec<HardnessBand>,
    band_width: f64,
    x_max: f64,
}

impl HardnessScale {
    /// Build the scale spanning the graph width.
    #[must_use]
    pub fn new(graph: &GraphGeometry) -> Self {
        let band_width = graph.width / HandHardness::ALL.len() as f64;
        let bands = HandHardness::ALL
            .iter()
            .enumerate()
            .map(|(i, &code)| HardnessBand {
                code,
                is_major_tick: code.is_major(),
                x_min: graph.x_origin + i as f64 * band_width,
            })
            .collect();
        Self {
            bands,
            band_width,
            x_max: graph.max_x(),
        }
    }

    /// All bands in increasing X.
    #[must_use]
    pub fn bands(&self) -> &[HardnessBand] {
        &self.bands
    }

    /// Width of one band in pixels.
    #[must_use]
    pub const fn band_width(&self) -> f64 {
        self.band_width
    }

    /// Right edge of the scale in pixels.
    #[must_use]
    pub const fn x_max(&self) -> f64 {
        self.x_max
    }

    /// The band for `code`.
    #[must_use]
    pub fn band(&self, code: HandHardness) -> &HardnessBand {
        &self.bands[code.ordinal()]
    }

    /// Center X of the band for `code`.
    #[must_use]
    pub fn center_x(&self, code: HandHardness) -> f64 {
        self.band(code).x_min + self.band_width / 2.0
    }

    /// Code of the band containing `x`.
    ///
    /// Anything left of the first band resolves to the softest code; anything
    /// at or past the start of the last band resolves to the hardest.
    #[must_use]
    pub fn code_at(&self, x: f64) -> HandHardness {
        let mut resolved = HandHardness::SOFTEST;
        for band in &self.bands {
            if x >= band.x_min {
                resolved = band.code;
            } else {
                break;
            }
        }
        resolved
    }

    /// Bands carrying a labelled tick.
    pub fn major_ticks(&self) -> impl Iterator<Item = &HardnessBand> + '_ {
        self.bands.iter().filter(|band| band.is_major_tick)
    }
}
