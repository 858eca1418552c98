//! Inclusive and differential histogram filling.
//!
//! Every fill maps an observable onto a flat integer bin of a histogram
//! whose axis counts bins `[0, n)`. Slicing variables and the regional split
//! extend that flat axis by concatenation: the slice bin selects a block of
//! `n` bins, and each region's bins follow those of the regions before it.
//! A bin of `-1` lands in underflow, which is how failed selections are kept
//! out of the distributions while still counting as lost acceptance.

use std::io::BufReader;
use std::path::Path;

use crate::error::UEError;

use super::event::UEEvent;
use super::keys::{AxisKey, DifferentialKey, DifferentialKind, InclusiveKey, InclusiveKind};
use super::regions::{Level, PerRegion, Region, region_offsets};
use super::registry::{AxisRegistry, HistogramRegistry};
use super::variables::Var;

/// Secondary variable slicing the phase space of an observable, with its
/// generated and reconstructed values for the current event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceSpec {
    pub var: Var,
    pub gen_value: f64,
    pub rec_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UEAnalysisHandler {
    pub axes: AxisRegistry,
    pub histos: HistogramRegistry,
}

impl UEAnalysisHandler {
    pub fn new(axes: AxisRegistry, histos: HistogramRegistry) -> Self {
        Self { axes, histos }
    }

    /// Load a persisted analysis: the axis registry followed by the
    /// histogram registry, as two consecutive JSON documents.
    pub fn open(path: &Path) -> Result<Self, UEError> {
        let file = std::fs::File::open(path)?;
        let mut documents =
            serde_json::Deserializer::from_reader(BufReader::new(file)).into_iter::<serde_json::Value>();

        let axes: AxisRegistry = serde_json::from_value(documents.next().ok_or(UEError::Truncated)??)?;
        let histos: HistogramRegistry =
            serde_json::from_value(documents.next().ok_or(UEError::Truncated)??)?;
        axes.validate()?;
        histos.validate()?;

        log::info!(
            "Loaded analysis {} with {} axes and {} histograms",
            path.display(),
            axes.len(),
            histos.len()
        );

        Ok(Self::new(axes, histos))
    }

    /// Write the two registries in the order `open` reads them.
    pub fn save(&self, path: &Path) -> Result<(), UEError> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.axes)?;
        std::io::Write::write_all(&mut writer, b"\n")?;
        serde_json::to_writer(&mut writer, &self.histos)?;
        std::io::Write::flush(&mut writer)?;
        log::info!("Saved analysis to {}", path.display());
        Ok(())
    }

    /// 1-based bin of `value` on the axis `key`; see `Axis::resolve_bin`.
    pub fn get_bin_for_variable(&self, value: f64, key: &AxisKey) -> Result<i64, UEError> {
        Ok(self.axes.get(key)?.resolve_bin(value) as i64)
    }

    fn inclusive_bins(&self, var: Var, level: Level) -> Result<i64, UEError> {
        Ok(self.axes.get(&AxisKey::Inclusive { var, level })?.bins as i64)
    }

    /// Zero-based slice bin at each level, or `(0, 0)` without slicing.
    fn slice_shifts(&self, slice: Option<SliceSpec>) -> Result<(i64, i64), UEError> {
        let Some(slice) = slice else {
            return Ok((0, 0));
        };
        let gen_shift = self.get_bin_for_variable(
            slice.gen_value,
            &AxisKey::Inclusive {
                var: slice.var,
                level: Level::Gen,
            },
        )? - 1;
        let rec_shift = self.get_bin_for_variable(
            slice.rec_value,
            &AxisKey::Inclusive {
                var: slice.var,
                level: Level::Rec,
            },
        )? - 1;
        Ok((gen_shift, rec_shift))
    }

    pub fn fill_inclusive(
        &mut self,
        obs: Var,
        ue: &impl UEEvent,
        slice: Option<SliceSpec>,
        ivar: usize,
    ) -> Result<(), UEError> {
        let slice_var = slice.map(|s| s.var);
        if slice_var == Some(obs) {
            return Ok(());
        }
        let (gen_shift, rec_shift) = self.slice_shifts(slice)?;

        let weight = ue.weight(ivar)?;
        let key = |kind| InclusiveKey::new(obs, slice_var, kind);

        // generator level
        let gen_cts = ue.gen_chmult();
        let gen_axis = AxisKey::Inclusive {
            var: obs,
            level: Level::Gen,
        };
        let mut gen_bin = self.get_bin_for_variable(ue.gen_value(obs)?, &gen_axis)? - 1;
        gen_bin += gen_shift * self.inclusive_bins(obs, Level::Gen)?;
        if !ue.gen_pass_sel() {
            gen_bin = -1;
        }
        if ivar == 0 && gen_cts > 0 {
            self.histos
                .inclusive_1d_mut(&key(InclusiveKind::Marginal(Level::Gen)))?
                .fill(gen_bin as f64, weight);
        }

        // reconstruction level
        let rec_cts = ue.rec_chmult(ivar)?;
        let rec_pass_sel = ue.rec_pass_sel(ivar)?;
        let rec_axis = AxisKey::Inclusive {
            var: obs,
            level: Level::Rec,
        };
        let mut rec_bin = self.get_bin_for_variable(ue.rec_value(obs, ivar)?, &rec_axis)? - 1;
        rec_bin += rec_shift * self.inclusive_bins(obs, Level::Rec)?;
        if !rec_pass_sel {
            rec_bin = -1;
        }
        if rec_pass_sel && rec_cts > 0 {
            if ivar == 0 {
                self.histos
                    .inclusive_1d_mut(&key(InclusiveKind::Marginal(Level::Rec)))?
                    .fill(rec_bin as f64, weight);
                if gen_cts == 0 {
                    self.histos
                        .inclusive_1d_mut(&key(InclusiveKind::Fakes))?
                        .fill(rec_bin as f64, weight);
                }
            }
            self.histos
                .inclusive_2d_mut(&key(InclusiveKind::Syst))?
                .fill(rec_bin as f64, ivar as f64, weight);
        }

        if gen_cts > 0 {
            self.histos
                .inclusive_2d_mut(&key(InclusiveKind::Migration(ivar)))?
                .fill(gen_bin as f64, rec_bin as f64, weight);
        }

        log::trace!("{obs} ivar={ivar}: gen bin {gen_bin}, rec bin {rec_bin}, weight {weight}");
        Ok(())
    }

    fn region_bins(&self, obs: Var, axis: Var, level: Level) -> Result<PerRegion<usize>, UEError> {
        let mut bins = [0; Region::COUNT];
        for region in Region::ALL {
            let key = AxisKey::Regional {
                obs,
                axis,
                region,
                level,
            };
            bins[region.index()] = self.axes.get(&key)?.bins;
        }
        Ok(bins)
    }

    fn region_bin(
        &self,
        obs: Var,
        axis: Var,
        region: Region,
        level: Level,
        value: f64,
    ) -> Result<i64, UEError> {
        let key = AxisKey::Regional {
            obs,
            axis,
            region,
            level,
        };
        Ok(self.get_bin_for_variable(value, &key)? - 1)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn fill_differential(
        &mut self,
        obs: Var,
        axis: Var,
        ue: &impl UEEvent,
        weight: f64,
        gen_pass_sel: bool,
        rec_pass_sel: bool,
        slice: Option<SliceSpec>,
    ) -> Result<(), UEError> {
        let slice_var = slice.map(|s| s.var);
        if slice_var == Some(obs) || (!rec_pass_sel && !gen_pass_sel) {
            return Ok(());
        }

        let (gen_shift, rec_shift) = self.slice_shifts(slice)?;
        let view = ue.regional(obs, axis)?;

        let (rec_offsets, rec_total) = region_offsets(self.region_bins(obs, axis, Level::Rec)?);
        let (gen_offsets, gen_total) = region_offsets(self.region_bins(obs, axis, Level::Gen)?);

        let rec_flat_bin = |handler: &Self, region: Region| -> Result<i64, UEError> {
            let local = handler.region_bin(
                obs,
                axis,
                region,
                Level::Rec,
                view.rec_values[region.index()],
            )?;
            let bin = rec_offsets[region.index()] as i64 + local + rec_shift * rec_total as i64;
            Ok(if rec_pass_sel { bin } else { -1 })
        };

        // reconstruction level
        let rec_key = DifferentialKey::new(obs, axis, slice_var, DifferentialKind::Marginal(Level::Rec));
        for region in Region::ALL {
            if view.rec_count(region) == 0 {
                continue;
            }
            let rec_bin = rec_flat_bin(self, region)?;
            self.histos
                .differential_1d_mut(&rec_key)?
                .fill(rec_bin as f64, weight);
        }

        // generator level and the response between regions
        let gen_key = DifferentialKey::new(obs, axis, slice_var, DifferentialKind::Marginal(Level::Gen));
        let response_key = DifferentialKey::new(obs, axis, slice_var, DifferentialKind::Response);
        for gen_region in Region::ALL {
            let gen_counted = view.gen_count(gen_region) > 0;
            let mut gen_bin = -1;
            if gen_counted {
                let local = self.region_bin(
                    obs,
                    axis,
                    gen_region,
                    Level::Gen,
                    view.gen_values[gen_region.index()],
                )?;
                gen_bin = gen_offsets[gen_region.index()] as i64 + local + gen_shift * gen_total as i64;
                if !gen_pass_sel {
                    gen_bin = -1;
                }
                self.histos
                    .differential_1d_mut(&gen_key)?
                    .fill(gen_bin as f64, weight);
            }

            for rec_region in Region::ALL {
                let matched = view.matrix_count(gen_region, rec_region) > 0;
                let rec_bin = if matched {
                    rec_flat_bin(self, rec_region)?
                } else {
                    -1
                };
                if gen_counted || matched {
                    self.histos
                        .differential_2d_mut(&response_key)?
                        .fill(gen_bin as f64, rec_bin as f64, weight);
                }
            }
        }

        Ok(())
    }

    /// Add the histogram contents of a handler booked with the same keys.
    pub fn merge(&mut self, other: &Self) -> Result<(), UEError> {
        self.histos.merge(&other.histos)
    }

    /// Same axes and keys with every histogram emptied, for per-worker filling.
    pub fn zeroed(&self) -> Self {
        Self::new(self.axes.clone(), self.histos.zeroed())
    }
}
