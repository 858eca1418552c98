use std::fmt::Display;

/// Generator-truth or detector-level quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Gen,
    Rec,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gen => f.write_str("gen"),
            Self::Rec => f.write_str("rec"),
        }
    }
}

/// Azimuthal region relative to an event axis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Toward,
    Transverse,
    Away,
}

/// One value per region, indexed by `Region::index`.
pub type PerRegion<T> = [T; Region::COUNT];

impl Region {
    pub const COUNT: usize = 3;
    pub const ALL: PerRegion<Self> = [Self::Toward, Self::Transverse, Self::Away];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Toward => f.write_str("toward"),
            Self::Transverse => f.write_str("transverse"),
            Self::Away => f.write_str("away"),
        }
    }
}

/// Offsets placing each region's bins after those of the preceding regions
/// in one flat axis, and the total number of bins.
pub fn region_offsets(bins: PerRegion<usize>) -> (PerRegion<usize>, usize) {
    let mut offsets = [0; Region::COUNT];
    let mut total = 0;
    for region in Region::ALL {
        offsets[region.index()] = total;
        total += bins[region.index()];
    }
    (offsets, total)
}
