use std::fmt::Display;

use super::regions::{Level, Region};
use super::variables::Var;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AxisKey {
    /// Axis of a variable measured over the whole event.
    Inclusive { var: Var, level: Level },
    /// Axis of an observable measured in one region around an event axis.
    Regional {
        obs: Var,
        axis: Var,
        region: Region,
        level: Level,
    },
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InclusiveKind {
    Marginal(Level),
    /// Reconstructed events without generated particles.
    Fakes,
    /// Reconstructed bin versus variation index.
    Syst,
    /// Generated versus reconstructed bin for one variation index.
    Migration(usize),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
pub struct InclusiveKey {
    pub obs: Var,
    pub slice: Option<Var>,
    pub kind: InclusiveKind,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DifferentialKind {
    Marginal(Level),
    /// Generated versus reconstructed flat regional bin.
    Response,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
pub struct DifferentialKey {
    pub obs: Var,
    pub axis: Var,
    pub slice: Option<Var>,
    pub kind: DifferentialKind,
}

impl InclusiveKey {
    pub fn new(obs: Var, slice: Option<Var>, kind: InclusiveKind) -> Self {
        Self { obs, slice, kind }
    }
}

impl DifferentialKey {
    pub fn new(obs: Var, axis: Var, slice: Option<Var>, kind: DifferentialKind) -> Self {
        Self {
            obs,
            axis,
            slice,
            kind,
        }
    }
}

impl Display for AxisKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inclusive { var, level } => write!(f, "{var}_{level}"),
            Self::Regional {
                obs,
                axis,
                region,
                level,
            } => write!(f, "{obs}_{axis}_{region}_{level}"),
        }
    }
}

impl Display for InclusiveKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.obs)?;
        if let Some(slice) = self.slice {
            write!(f, "_{slice}")?;
        }
        match self.kind {
            InclusiveKind::Marginal(level) => write!(f, "_inc_{level}"),
            InclusiveKind::Fakes => write!(f, "_inc_fakes_rec"),
            InclusiveKind::Syst => write!(f, "_inc_syst_rec"),
            InclusiveKind::Migration(ivar) => write!(f, "_inc_{ivar}_mig"),
        }
    }
}

impl Display for DifferentialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.obs, self.axis)?;
        if let DifferentialKind::Marginal(level) = self.kind {
            write!(f, "_{level}")?;
        }
        if let Some(slice) = self.slice {
            write!(f, "_{slice}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let key = InclusiveKey::new(Var::ChMult, Some(Var::PtLL), InclusiveKind::Marginal(Level::Gen));
        assert_eq!(key.to_string(), "chmult_ptll_inc_gen");
        let key = InclusiveKey::new(Var::C, None, InclusiveKind::Migration(3));
        assert_eq!(key.to_string(), "C_inc_3_mig");
        let key = DifferentialKey::new(
            Var::ChFlux,
            Var::PhiLL,
            None,
            DifferentialKind::Marginal(Level::Rec),
        );
        assert_eq!(key.to_string(), "chflux_phill_rec");
        let key = DifferentialKey::new(
            Var::ChFlux,
            Var::PhiLL,
            Some(Var::NJets),
            DifferentialKind::Response,
        );
        assert_eq!(key.to_string(), "chflux_phill_nj");
        let key = AxisKey::Regional {
            obs: Var::ChMult,
            axis: Var::PhiTTbar,
            region: Region::Away,
            level: Level::Gen,
        };
        assert_eq!(key.to_string(), "chmult_phittbar_away_gen");
    }

    #[test]
    fn test_keys_with_same_fields_differ_by_mode() {
        let inc = InclusiveKey::new(Var::ChMult, None, InclusiveKind::Marginal(Level::Rec));
        let diff = DifferentialKey::new(
            Var::ChMult,
            Var::PhiTTbar,
            None,
            DifferentialKind::Marginal(Level::Rec),
        );
        assert_ne!(inc.to_string(), diff.to_string());
    }
}
