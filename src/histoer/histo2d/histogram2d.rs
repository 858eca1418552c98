use fnv::FnvHashMap;

use crate::error::UEError;
use crate::histoer::axis::Axis;
use crate::histoer::entries;

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct BinSum {
    pub sumw: f64,
    pub sumw2: f64,
}

/// Weighted 2D histogram.
///
/// Cells are keyed by `(x_bin, y_bin)` in ROOT numbering, so under- and
/// overflow rows and columns are kept per cell rather than summed away.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Histogram2D {
    pub name: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    #[serde(with = "entries")]
    pub counts: FnvHashMap<(usize, usize), BinSum>, // uses a hash map to store the histogram data (zero overhead for empty bins)
    pub entries: u64,
}

impl Histogram2D {
    pub fn new(name: &str, x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            name: name.to_owned(),
            x_axis,
            y_axis,
            counts: FnvHashMap::default(),
            entries: 0,
        }
    }

    pub fn reset(&mut self) {
        self.counts.clear();
        self.entries = 0;
    }

    pub fn fill(&mut self, x_value: f64, y_value: f64, weight: f64) {
        let cell = (self.x_axis.find_bin(x_value), self.y_axis.find_bin(y_value));
        let bin = self.counts.entry(cell).or_default();
        bin.sumw += weight;
        bin.sumw2 += weight * weight;
        self.entries += 1;
    }

    pub fn bin_content(&self, x_bin: usize, y_bin: usize) -> f64 {
        self.counts
            .get(&(x_bin, y_bin))
            .map(|bin| bin.sumw)
            .unwrap_or(0.0)
    }

    pub fn bin_error(&self, x_bin: usize, y_bin: usize) -> f64 {
        self.counts
            .get(&(x_bin, y_bin))
            .map(|bin| bin.sumw2.sqrt())
            .unwrap_or(0.0)
    }

    /// Sum over in-range cells only.
    pub fn integral(&self) -> f64 {
        let (nx, ny) = (self.x_axis.bins, self.y_axis.bins);
        self.counts
            .iter()
            .filter(|((x, y), _)| (1..=nx).contains(x) && (1..=ny).contains(y))
            .map(|(_, bin)| bin.sumw)
            .sum()
    }

    pub fn validate(&self) -> Result<(), UEError> {
        for axis in [&self.x_axis, &self.y_axis] {
            axis.validate()
                .map_err(|err| UEError::InvalidAxis(format!("{}: {err}", self.name)))?;
        }
        let (nx, ny) = (self.x_axis.bins, self.y_axis.bins);
        if let Some((x, y)) = self.counts.keys().find(|(x, y)| *x > nx + 1 || *y > ny + 1) {
            return Err(UEError::InvalidAxis(format!(
                "{} has a cell ({x}, {y}) outside its {nx}x{ny} grid",
                self.name
            )));
        }
        Ok(())
    }

    pub fn merge(&mut self, other: &Self) -> Result<(), UEError> {
        if !self.x_axis.same_binning(&other.x_axis) || !self.y_axis.same_binning(&other.y_axis) {
            return Err(UEError::Incompatible(format!(
                "{} and {} have different binning",
                self.name, other.name
            )));
        }
        for (cell, value) in &other.counts {
            let bin = self.counts.entry(*cell).or_default();
            bin.sumw += value.sumw;
            bin.sumw2 += value.sumw2;
        }
        self.entries += other.entries;
        Ok(())
    }
}
