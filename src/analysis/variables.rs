use std::fmt::Display;
use std::str::FromStr;

//Analysis variables, each serialized under its `VARS` name as used in the event records
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Var {
    PtTTbar,
    PhiTTbar,
    PtPos,
    PhiPos,
    PtLL,
    PhiLL,
    NJets,
    ChMult,
    ChFlux,
    ChAvgPt,
    ChFluxZ,
    ChAvgPz,
    Sphericity,
    Aplanarity,
    C,
    D,
}

/// Declarative metadata for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInfo {
    pub var: Var,
    pub name: &'static str,
    pub title: &'static str,
    /// Usable to slice the phase space of another observable.
    pub slice: bool,
    /// Measured as an underlying-event observable.
    pub observable: bool,
    /// Usable as the reference direction of the regional split.
    pub event_axis: bool,
    pub angle: bool,
}

pub const VARS: [VarInfo; 16] = [
    VarInfo {
        var: Var::PtTTbar,
        name: "ptttbar",
        title: "p_{T}(t#bar{t})",
        slice: true,
        observable: false,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::PhiTTbar,
        name: "phittbar",
        title: "#phi(t#bar{t})",
        slice: true,
        observable: false,
        event_axis: true,
        angle: true,
    },
    VarInfo {
        var: Var::PtPos,
        name: "ptpos",
        title: "p_{T}(l^{+})",
        slice: true,
        observable: false,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::PhiPos,
        name: "phipos",
        title: "#phi(l^{+})",
        slice: true,
        observable: false,
        event_axis: true,
        angle: true,
    },
    VarInfo {
        var: Var::PtLL,
        name: "ptll",
        title: "p_{T}(l,l)",
        slice: true,
        observable: false,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::PhiLL,
        name: "phill",
        title: "#phi(ll)",
        slice: true,
        observable: false,
        event_axis: true,
        angle: true,
    },
    VarInfo {
        var: Var::NJets,
        name: "nj",
        title: "N(jets)",
        slice: true,
        observable: false,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::ChMult,
        name: "chmult",
        title: "N(ch)",
        slice: true,
        observable: true,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::ChFlux,
        name: "chflux",
        title: "#Sigma p_{T}(ch)",
        slice: false,
        observable: true,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::ChAvgPt,
        name: "chavgpt",
        title: "#bar{p}_{T}(ch)",
        slice: false,
        observable: true,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::ChFluxZ,
        name: "chfluxz",
        title: "#Sigma p_{z}(ch)",
        slice: false,
        observable: true,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::ChAvgPz,
        name: "chavgpz",
        title: "#bar{p}_{z}(ch)",
        slice: false,
        observable: true,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::Sphericity,
        name: "sphericity",
        title: "Spericity",
        slice: false,
        observable: true,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::Aplanarity,
        name: "aplanarity",
        title: "Aplanarity",
        slice: false,
        observable: true,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::C,
        name: "C",
        title: "C",
        slice: false,
        observable: true,
        event_axis: false,
        angle: false,
    },
    VarInfo {
        var: Var::D,
        name: "D",
        title: "D",
        slice: false,
        observable: true,
        event_axis: false,
        angle: false,
    },
];

impl Var {
    pub fn info(self) -> &'static VarInfo {
        &VARS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn title(self) -> &'static str {
        self.info().title
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Var {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VARS.iter()
            .find(|info| info.name == s)
            .map(|info| info.var)
            .ok_or_else(|| format!("unknown variable '{s}'"))
    }
}

impl From<Var> for &'static str {
    fn from(var: Var) -> Self {
        var.name()
    }
}

impl TryFrom<String> for Var {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

pub fn obs_vars() -> impl Iterator<Item = Var> {
    VARS.iter().filter(|info| info.observable).map(|info| info.var)
}

pub fn event_axes() -> impl Iterator<Item = Var> {
    VARS.iter().filter(|info| info.event_axis).map(|info| info.var)
}

pub fn slice_vars() -> impl Iterator<Item = Var> {
    VARS.iter().filter(|info| info.slice).map(|info| info.var)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_variant() {
        for (index, info) in VARS.iter().enumerate() {
            assert_eq!(info.var as usize, index);
            assert_eq!(info.var.name(), info.name);
        }
    }

    #[test]
    fn test_role_filters() {
        let axes: Vec<Var> = event_axes().collect();
        assert_eq!(axes, vec![Var::PhiTTbar, Var::PhiPos, Var::PhiLL]);
        assert!(axes.iter().all(|v| v.info().angle));

        assert_eq!(obs_vars().count(), 9);
        assert_eq!(slice_vars().count(), 8);
        assert!(slice_vars().any(|v| v == Var::ChMult));
        assert!(obs_vars().all(|v| v != Var::PtLL));
    }

    #[test]
    fn test_names_match_serde() {
        for info in &VARS {
            let json = serde_json::to_string(&info.var).unwrap();
            assert_eq!(json, format!("\"{}\"", info.name));
            assert_eq!(info.name.parse::<Var>().unwrap(), info.var);
        }
        assert!("nope".parse::<Var>().is_err());
        let err = serde_json::from_str::<Var>("\"nope\"").unwrap_err();
        assert!(err.to_string().contains("unknown variable 'nope'"));
    }
}
