use fnv::FnvHashMap;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::UEError;
use crate::histoer::axis::Axis;
use crate::histoer::entries;
use crate::histoer::histo1d::histogram1d::Histogram;
use crate::histoer::histo2d::histogram2d::Histogram2D;

use super::keys::{AxisKey, DifferentialKey, InclusiveKey};

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AxisRegistry {
    #[serde(with = "entries")]
    axes: FnvHashMap<AxisKey, Axis>,
}

impl AxisRegistry {
    pub fn insert(&mut self, key: AxisKey, axis: Axis) -> Result<(), UEError> {
        axis.validate()
            .map_err(|err| UEError::InvalidAxis(format!("{key}: {err}")))?;
        self.axes.insert(key, axis);
        Ok(())
    }

    pub fn get(&self, key: &AxisKey) -> Result<&Axis, UEError> {
        self.axes
            .get(key)
            .ok_or_else(|| UEError::MissingAxis(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn validate(&self) -> Result<(), UEError> {
        for (key, axis) in &self.axes {
            axis.validate()
                .map_err(|err| UEError::InvalidAxis(format!("{key}: {err}")))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Histo {
    H1(Histogram),
    H2(Histogram2D),
}

impl Histo {
    pub fn name(&self) -> &str {
        match self {
            Self::H1(hist) => &hist.name,
            Self::H2(hist) => &hist.name,
        }
    }

    pub fn as_1d(&self) -> Option<&Histogram> {
        match self {
            Self::H1(hist) => Some(hist),
            Self::H2(_) => None,
        }
    }

    pub fn as_2d(&self) -> Option<&Histogram2D> {
        match self {
            Self::H2(hist) => Some(hist),
            Self::H1(_) => None,
        }
    }

    pub fn validate(&self) -> Result<(), UEError> {
        match self {
            Self::H1(hist) => hist.validate(),
            Self::H2(hist) => hist.validate(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::H1(hist) => hist.reset(),
            Self::H2(hist) => hist.reset(),
        }
    }

    pub fn merge(&mut self, other: &Self) -> Result<(), UEError> {
        match (self, other) {
            (Self::H1(a), Self::H1(b)) => a.merge(b),
            (Self::H2(a), Self::H2(b)) => a.merge(b),
            (a, _) => Err(UEError::Incompatible(format!(
                "{} has a different dimension",
                a.name()
            ))),
        }
    }
}

/// Histograms of both filling modes, each mode under its own key type.
///
/// The key set is fixed once booked; filling only changes contents.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HistogramRegistry {
    #[serde(with = "entries")]
    inclusive: FnvHashMap<InclusiveKey, Histo>,
    #[serde(with = "entries")]
    differential: FnvHashMap<DifferentialKey, Histo>,
}

impl HistogramRegistry {
    pub fn insert_inclusive(&mut self, key: InclusiveKey, histo: Histo) {
        self.inclusive.insert(key, histo);
    }

    pub fn insert_differential(&mut self, key: DifferentialKey, histo: Histo) {
        self.differential.insert(key, histo);
    }

    pub fn inclusive(&self, key: &InclusiveKey) -> Option<&Histo> {
        self.inclusive.get(key)
    }

    pub fn differential(&self, key: &DifferentialKey) -> Option<&Histo> {
        self.differential.get(key)
    }

    pub fn inclusive_1d_mut(&mut self, key: &InclusiveKey) -> Result<&mut Histogram, UEError> {
        hist_1d_mut(&mut self.inclusive, key)
    }

    pub fn inclusive_2d_mut(&mut self, key: &InclusiveKey) -> Result<&mut Histogram2D, UEError> {
        hist_2d_mut(&mut self.inclusive, key)
    }

    pub fn differential_1d_mut(
        &mut self,
        key: &DifferentialKey,
    ) -> Result<&mut Histogram, UEError> {
        hist_1d_mut(&mut self.differential, key)
    }

    pub fn differential_2d_mut(
        &mut self,
        key: &DifferentialKey,
    ) -> Result<&mut Histogram2D, UEError> {
        hist_2d_mut(&mut self.differential, key)
    }

    pub fn inclusive_keys(&self) -> impl Iterator<Item = &InclusiveKey> {
        self.inclusive.keys()
    }

    pub fn differential_keys(&self) -> impl Iterator<Item = &DifferentialKey> {
        self.differential.keys()
    }

    pub fn len(&self) -> usize {
        self.inclusive.len() + self.differential.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check every histogram's contents against its axes.
    pub fn validate(&self) -> Result<(), UEError> {
        self.inclusive
            .values()
            .chain(self.differential.values())
            .try_for_each(Histo::validate)
    }

    pub fn reset(&mut self) {
        self.inclusive.values_mut().for_each(Histo::reset);
        self.differential.values_mut().for_each(Histo::reset);
    }

    /// Copy of the registry with every histogram emptied.
    pub fn zeroed(&self) -> Self {
        let mut copy = self.clone();
        copy.reset();
        copy
    }

    /// Add the contents of a registry booked with the same keys.
    pub fn merge(&mut self, other: &Self) -> Result<(), UEError> {
        merge_maps(&mut self.inclusive, &other.inclusive)?;
        merge_maps(&mut self.differential, &other.differential)
    }
}

fn hist_1d_mut<'a, K>(
    map: &'a mut FnvHashMap<K, Histo>,
    key: &K,
) -> Result<&'a mut Histogram, UEError>
where
    K: Eq + Hash + Display,
{
    match map.get_mut(key) {
        Some(Histo::H1(hist)) => Ok(hist),
        Some(Histo::H2(_)) => Err(UEError::HistogramKind {
            key: key.to_string(),
            expected: "1D",
        }),
        None => Err(UEError::MissingHistogram(key.to_string())),
    }
}

fn hist_2d_mut<'a, K>(
    map: &'a mut FnvHashMap<K, Histo>,
    key: &K,
) -> Result<&'a mut Histogram2D, UEError>
where
    K: Eq + Hash + Display,
{
    match map.get_mut(key) {
        Some(Histo::H2(hist)) => Ok(hist),
        Some(Histo::H1(_)) => Err(UEError::HistogramKind {
            key: key.to_string(),
            expected: "2D",
        }),
        None => Err(UEError::MissingHistogram(key.to_string())),
    }
}

fn merge_maps<K>(into: &mut FnvHashMap<K, Histo>, from: &FnvHashMap<K, Histo>) -> Result<(), UEError>
where
    K: Eq + Hash + Display,
{
    for (key, histo) in from {
        into.get_mut(key)
            .ok_or_else(|| UEError::Incompatible(format!("{key} is not booked in both registries")))?
            .merge(histo)?;
    }
    Ok(())
}
