use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The travel mode whose access is being mapped. Its name doubles as the
/// OSM tag key that states access explicitly (`foot=yes`, `horse=no`, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Foot,
    Wheelchair,
    Bicycle,
    Horse,
    Atv,
    Canoe,
    Snowmobile,
    /// Sentinel: no tag key, every segment is unspecified.
    Unknown,
}

impl TravelMode {
    /// Modes offered by the style selector, in display order.
    pub const SELECTABLE: [TravelMode; 7] = [
        TravelMode::Foot,
        TravelMode::Wheelchair,
        TravelMode::Bicycle,
        TravelMode::Horse,
        TravelMode::Atv,
        TravelMode::Canoe,
        TravelMode::Snowmobile,
    ];

    /// The OSM access key for this mode.
    pub fn key(self) -> Option<&'static str> {
        match self {
            TravelMode::Unknown => None,
            mode => Some(mode.name()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TravelMode::Foot => "foot",
            TravelMode::Wheelchair => "wheelchair",
            TravelMode::Bicycle => "bicycle",
            TravelMode::Horse => "horse",
            TravelMode::Atv => "atv",
            TravelMode::Canoe => "canoe",
            TravelMode::Snowmobile => "snowmobile",
            TravelMode::Unknown => "unknown",
        }
    }

    /// Cycles through the selectable modes (wraps around). A mode outside
    /// the cycle continues at the default.
    pub fn next(self) -> TravelMode {
        match Self::SELECTABLE.iter().position(|m| *m == self) {
            Some(idx) => Self::SELECTABLE[(idx + 1) % Self::SELECTABLE.len()],
            None => TravelMode::default(),
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown travel mode: {}", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for TravelMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foot" => Ok(TravelMode::Foot),
            "wheelchair" => Ok(TravelMode::Wheelchair),
            "bicycle" => Ok(TravelMode::Bicycle),
            "horse" => Ok(TravelMode::Horse),
            "atv" => Ok(TravelMode::Atv),
            "canoe" => Ok(TravelMode::Canoe),
            "snowmobile" => Ok(TravelMode::Snowmobile),
            "unknown" => Ok(TravelMode::Unknown),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}
