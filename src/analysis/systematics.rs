/// One systematic variation.
///
/// The position of an entry in [`SYSTS`] is the variation index used for
/// the per-variation event fields and for the y axis of the per-systematic
/// histograms. `weight_index` selects the alternate event weight and
/// `alt_index` the alternate reconstruction branch; `0` means nominal for
/// both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Systematic {
    pub name: &'static str,
    pub weight_index: usize,
    pub alt_index: usize,
    pub tracking_efficiency: bool,
}

const fn weight(name: &'static str, weight_index: usize) -> Systematic {
    Systematic {
        name,
        weight_index,
        alt_index: 0,
        tracking_efficiency: false,
    }
}

const fn branch(name: &'static str, alt_index: usize) -> Systematic {
    Systematic {
        name,
        weight_index: 0,
        alt_index,
        tracking_efficiency: false,
    }
}

pub const SYSTS: [Systematic; 23] = [
    weight("", 0),
    weight("puup", 1),
    weight("pudn", 2),
    weight("effup", 3),
    weight("effdn", 4),
    weight("toppt", 5),
    weight("murup", 9),
    weight("murdn", 12),
    weight("mufup", 7),
    weight("mufdn", 8),
    weight("qup", 10),
    weight("qdn", 14),
    branch("btagup", 1),
    branch("btagdn", 2),
    branch("jesup", 3),
    branch("jesdn", 4),
    branch("jerup", 5),
    branch("jerdn", 6),
    branch("eesup", 7),
    branch("eesdn", 8),
    branch("mesup", 9),
    branch("mesdn", 10),
    Systematic {
        name: "tkeff",
        weight_index: 0,
        alt_index: 0,
        tracking_efficiency: true,
    },
];

/// Variation index of a systematic by name; the nominal entry is `""`.
pub fn variation_index(name: &str) -> Option<usize> {
    SYSTS.iter().position(|syst| syst.name == name)
}

impl Systematic {
    pub fn is_nominal(&self) -> bool {
        self.weight_index == 0 && self.alt_index == 0 && !self.tracking_efficiency
    }
}
