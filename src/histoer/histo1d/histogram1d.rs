use crate::error::UEError;
use crate::histoer::axis::Axis;

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Histogram {
    pub name: String,
    pub axis: Axis,
    pub bins: Vec<f64>,
    pub sumw2: Vec<f64>,
    pub overflow: f64,
    pub underflow: f64,
    pub entries: u64,
}

impl Histogram {
    // Create a new Histogram over the given axis
    pub fn new(name: &str, axis: Axis) -> Self {
        Self {
            name: name.to_owned(),
            bins: vec![0.0; axis.bins],
            sumw2: vec![0.0; axis.bins],
            axis,
            overflow: 0.0,
            underflow: 0.0,
            entries: 0,
        }
    }

    pub fn reset(&mut self) {
        self.bins = vec![0.0; self.bins.len()];
        self.sumw2 = vec![0.0; self.sumw2.len()];
        self.overflow = 0.0;
        self.underflow = 0.0;
        self.entries = 0;
    }

    // Add a weighted value to the histogram
    pub fn fill(&mut self, value: f64, weight: f64) {
        let bin = self.axis.find_bin(value);
        if bin == 0 {
            self.underflow += weight;
        } else if bin > self.axis.bins {
            self.overflow += weight;
        } else {
            self.bins[bin - 1] += weight;
            self.sumw2[bin - 1] += weight * weight;
        }
        self.entries += 1;
    }

    /// Content of bin `bin` in ROOT numbering (`0` underflow, `bins + 1` overflow).
    pub fn bin_content(&self, bin: usize) -> f64 {
        match bin {
            0 => self.underflow,
            b if b > self.bins.len() => self.overflow,
            b => self.bins[b - 1],
        }
    }

    pub fn bin_error(&self, bin: usize) -> f64 {
        if bin == 0 || bin > self.sumw2.len() {
            return 0.0;
        }
        self.sumw2[bin - 1].sqrt()
    }

    /// Check that the stored contents match the axis, as a loaded
    /// histogram may not.
    pub fn validate(&self) -> Result<(), UEError> {
        self.axis
            .validate()
            .map_err(|err| UEError::InvalidAxis(format!("{}: {err}", self.name)))?;
        if self.bins.len() != self.axis.bins || self.sumw2.len() != self.axis.bins {
            return Err(UEError::InvalidAxis(format!(
                "{} holds {} contents and {} errors for {} bins",
                self.name,
                self.bins.len(),
                self.sumw2.len(),
                self.axis.bins
            )));
        }
        Ok(())
    }

    pub fn merge(&mut self, other: &Self) -> Result<(), UEError> {
        if !self.axis.same_binning(&other.axis) {
            return Err(UEError::Incompatible(format!(
                "{} and {} have different binning",
                self.name, other.name
            )));
        }
        for (bin, value) in self.bins.iter_mut().zip(&other.bins) {
            *bin += value;
        }
        for (bin, value) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *bin += value;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
        Ok(())
    }
}
