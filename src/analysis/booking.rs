use std::collections::BTreeMap;
use std::path::Path;

use crate::error::UEError;
use crate::histoer::axis::Axis;
use crate::histoer::histo1d::histogram1d::Histogram;
use crate::histoer::histo2d::histogram2d::Histogram2D;

use super::event::UEEvent;
use super::handler::{SliceSpec, UEAnalysisHandler};
use super::keys::{AxisKey, DifferentialKey, DifferentialKind, InclusiveKey, InclusiveKind};
use super::regions::{Level, PerRegion, Region, region_offsets};
use super::registry::{AxisRegistry, Histo, HistogramRegistry};
use super::systematics::{SYSTS, variation_index};
use super::variables::Var;

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RegionalBinning {
    #[serde(rename = "gen")]
    pub generated: PerRegion<Axis>,
    pub rec: PerRegion<Axis>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct VarBinning {
    #[serde(rename = "gen")]
    pub generated: Axis,
    pub rec: Axis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<RegionalBinning>,
}

impl VarBinning {
    fn axis(&self, level: Level) -> &Axis {
        match level {
            Level::Gen => &self.generated,
            Level::Rec => &self.rec,
        }
    }
}

impl RegionalBinning {
    fn axes(&self, level: Level) -> &PerRegion<Axis> {
        match level {
            Level::Gen => &self.generated,
            Level::Rec => &self.rec,
        }
    }
}

/// What to book and fill: observables, slicing variables, event axes for
/// the regional split, the variations to run and the binning of every
/// variable involved.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct BookingConfig {
    pub observables: Vec<Var>,
    #[serde(default)]
    pub slice_vars: Vec<Var>,
    #[serde(default)]
    pub event_axes: Vec<Var>,
    /// Systematic names to run; empty runs every entry of `SYSTS`.
    #[serde(default)]
    pub systematics: Vec<String>,
    pub binning: BTreeMap<Var, VarBinning>,
}

impl BookingConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self, UEError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(file)?;
        config.validate()?;
        log::info!(
            "Read booking for {} observables from {}",
            config.observables.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), UEError> {
        if self.observables.is_empty() {
            return Err(UEError::Config("no observables requested".to_owned()));
        }
        for obs in &self.observables {
            if !obs.info().observable {
                return Err(UEError::Config(format!("{obs} is not an observable")));
            }
        }
        for var in &self.slice_vars {
            if !var.info().slice {
                return Err(UEError::Config(format!("{var} cannot slice the phase space")));
            }
        }
        for axis in &self.event_axes {
            if !axis.info().event_axis {
                return Err(UEError::Config(format!("{axis} is not an event axis")));
            }
        }
        for var in self.observables.iter().chain(&self.slice_vars) {
            let binning = self
                .binning
                .get(var)
                .ok_or_else(|| UEError::Config(format!("no binning given for {var}")))?;
            binning.generated.validate()?;
            binning.rec.validate()?;
            if let Some(regions) = &binning.regions {
                for axis in regions.generated.iter().chain(&regions.rec) {
                    axis.validate()?;
                }
            }
        }
        self.variation_indices()?;
        Ok(())
    }

    /// Variation indices to fill, always starting with the nominal one.
    pub fn variation_indices(&self) -> Result<Vec<usize>, UEError> {
        if self.systematics.is_empty() {
            return Ok((0..SYSTS.len()).collect());
        }
        let mut indices = vec![0];
        for name in &self.systematics {
            let index = variation_index(name)
                .ok_or_else(|| UEError::Config(format!("unknown systematic '{name}'")))?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        Ok(indices)
    }

    fn binning(&self, var: Var) -> Result<&VarBinning, UEError> {
        self.binning
            .get(&var)
            .ok_or_else(|| UEError::Config(format!("no binning given for {var}")))
    }

    fn slicings(&self, obs: Var) -> impl Iterator<Item = Option<Var>> + '_ {
        std::iter::once(None).chain(
            self.slice_vars
                .iter()
                .filter(move |&&var| var != obs)
                .map(|&var| Some(var)),
        )
    }

    fn slice_blocks(&self, slice: Option<Var>, level: Level) -> Result<usize, UEError> {
        match slice {
            Some(var) => Ok(self.binning(var)?.axis(level).bins),
            None => Ok(1),
        }
    }

    /// Book every axis and histogram the fill methods will look up.
    pub fn book(&self) -> Result<UEAnalysisHandler, UEError> {
        self.validate()?;
        let variations = self.variation_indices()?;
        let mut axes = AxisRegistry::default();
        let mut histos = HistogramRegistry::default();

        for &var in self.observables.iter().chain(&self.slice_vars) {
            let binning = self.binning(var)?;
            for level in [Level::Gen, Level::Rec] {
                axes.insert(AxisKey::Inclusive { var, level }, binning.axis(level).clone())?;
            }
        }

        for &obs in &self.observables {
            let binning = self.binning(obs)?;
            log::debug!("Booking {obs} ({})", obs.title());

            for slice in self.slicings(obs) {
                let gen_bins = binning.generated.bins * self.slice_blocks(slice, Level::Gen)?;
                let rec_bins = binning.rec.bins * self.slice_blocks(slice, Level::Rec)?;
                let mut book_1d = |kind| {
                    let key = InclusiveKey::new(obs, slice, kind);
                    let bins = if kind == InclusiveKind::Marginal(Level::Gen) {
                        gen_bins
                    } else {
                        rec_bins
                    };
                    let hist = Histogram::new(&key.to_string(), Axis::index_axis(bins));
                    histos.insert_inclusive(key, Histo::H1(hist));
                };
                book_1d(InclusiveKind::Marginal(Level::Gen));
                book_1d(InclusiveKind::Marginal(Level::Rec));
                book_1d(InclusiveKind::Fakes);

                let key = InclusiveKey::new(obs, slice, InclusiveKind::Syst);
                let hist = Histogram2D::new(
                    &key.to_string(),
                    Axis::index_axis(rec_bins),
                    Axis::index_axis(SYSTS.len()),
                );
                histos.insert_inclusive(key, Histo::H2(hist));

                for &ivar in &variations {
                    let key = InclusiveKey::new(obs, slice, InclusiveKind::Migration(ivar));
                    let hist = Histogram2D::new(
                        &key.to_string(),
                        Axis::index_axis(gen_bins),
                        Axis::index_axis(rec_bins),
                    );
                    histos.insert_inclusive(key, Histo::H2(hist));
                }
            }

            let Some(regions) = &binning.regions else {
                if !self.event_axes.is_empty() {
                    log::warn!("{obs} has no regional binning, skipping differential histograms");
                }
                continue;
            };

            for &axis in &self.event_axes {
                for level in [Level::Gen, Level::Rec] {
                    for region in Region::ALL {
                        let key = AxisKey::Regional {
                            obs,
                            axis,
                            region,
                            level,
                        };
                        axes.insert(key, regions.axes(level)[region.index()].clone())?;
                    }
                }

                let (_, gen_total) = region_offsets(regions.generated.each_ref().map(|a| a.bins));
                let (_, rec_total) = region_offsets(regions.rec.each_ref().map(|a| a.bins));

                for slice in self.slicings(obs) {
                    let gen_bins = gen_total * self.slice_blocks(slice, Level::Gen)?;
                    let rec_bins = rec_total * self.slice_blocks(slice, Level::Rec)?;

                    for (level, bins) in [(Level::Gen, gen_bins), (Level::Rec, rec_bins)] {
                        let key =
                            DifferentialKey::new(obs, axis, slice, DifferentialKind::Marginal(level));
                        let hist = Histogram::new(&key.to_string(), Axis::index_axis(bins));
                        histos.insert_differential(key, Histo::H1(hist));
                    }

                    let key = DifferentialKey::new(obs, axis, slice, DifferentialKind::Response);
                    let hist = Histogram2D::new(
                        &key.to_string(),
                        Axis::index_axis(gen_bins),
                        Axis::index_axis(rec_bins),
                    );
                    histos.insert_differential(key, Histo::H2(hist));
                }
            }
        }

        log::info!("Booked {} axes and {} histograms", axes.len(), histos.len());
        Ok(UEAnalysisHandler::new(axes, histos))
    }

    /// Run every fill this booking declares for one event.
    pub fn fill_event(
        &self,
        handler: &mut UEAnalysisHandler,
        ue: &impl UEEvent,
    ) -> Result<(), UEError> {
        let variations = self.variation_indices()?;

        for &obs in &self.observables {
            for &ivar in &variations {
                for slice in self.slicings(obs) {
                    let slice_spec = match slice {
                        Some(var) => Some(SliceSpec {
                            var,
                            gen_value: ue.gen_value(var)?,
                            rec_value: ue.rec_value(var, ivar)?,
                        }),
                        None => None,
                    };
                    handler.fill_inclusive(obs, ue, slice_spec, ivar)?;
                }
            }

            if self.binning(obs)?.regions.is_none() {
                continue;
            }
            let weight = ue.weight(0)?;
            let gen_pass_sel = ue.gen_pass_sel();
            let rec_pass_sel = ue.rec_pass_sel(0)?;
            for &axis in &self.event_axes {
                for slice in self.slicings(obs) {
                    let slice_spec = match slice {
                        Some(var) => Some(SliceSpec {
                            var,
                            gen_value: ue.gen_value(var)?,
                            rec_value: ue.rec_value(var, 0)?,
                        }),
                        None => None,
                    };
                    handler.fill_differential(
                        obs,
                        axis,
                        ue,
                        weight,
                        gen_pass_sel,
                        rec_pass_sel,
                        slice_spec,
                    )?;
                }
            }
        }
        Ok(())
    }
}
