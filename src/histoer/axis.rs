use crate::error::UEError;

/// Binning of one histogram dimension.
///
/// Bins are numbered the ROOT way: `0` is underflow, `1..=bins` are the
/// regular bins and `bins + 1` is overflow. When `edges` is present the
/// binning is variable and `min`/`max` must match the outer edges.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub bins: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<f64>>,
}

impl Axis {
    pub fn new(bins: usize, min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            bins,
            edges: None,
        }
    }

    pub fn from_edges(edges: Vec<f64>) -> Result<Self, UEError> {
        if edges.len() < 2 {
            return Err(UEError::InvalidAxis(format!(
                "need at least two edges, got {}",
                edges.len()
            )));
        }
        let axis = Self {
            min: edges[0],
            max: edges[edges.len() - 1],
            bins: edges.len() - 1,
            edges: Some(edges),
        };
        axis.validate()?;
        Ok(axis)
    }

    /// Axis over integer bin indices `[0, bins)`, one unit per bin.
    pub fn index_axis(bins: usize) -> Self {
        Self::new(bins, 0.0, bins as f64)
    }

    pub fn validate(&self) -> Result<(), UEError> {
        if self.bins == 0 {
            return Err(UEError::InvalidAxis("axis has no bins".to_owned()));
        }
        if !(self.min < self.max) {
            return Err(UEError::InvalidAxis(format!(
                "range [{}, {}] is empty",
                self.min, self.max
            )));
        }
        if let Some(edges) = &self.edges {
            if edges.len() != self.bins + 1 {
                return Err(UEError::InvalidAxis(format!(
                    "{} edges given for {} bins",
                    edges.len(),
                    self.bins
                )));
            }
            if edges.windows(2).any(|w| !(w[0] < w[1])) {
                return Err(UEError::InvalidAxis(
                    "edges must be strictly increasing".to_owned(),
                ));
            }
            if edges[0] != self.min || edges[self.bins] != self.max {
                return Err(UEError::InvalidAxis(
                    "outer edges do not match the axis range".to_owned(),
                ));
            }
        }
        Ok(())
    }

    pub fn bin_width(&self, bin: usize) -> f64 {
        match &self.edges {
            Some(edges) => edges[bin] - edges[bin - 1],
            None => (self.max - self.min) / self.bins as f64,
        }
    }

    pub fn low_edge(&self, bin: usize) -> f64 {
        match &self.edges {
            Some(edges) => edges[bin - 1],
            None => self.min + (bin - 1) as f64 * self.bin_width(bin),
        }
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.low_edge(bin) + 0.5 * self.bin_width(bin)
    }

    pub fn bin_edges(&self) -> Vec<f64> {
        match &self.edges {
            Some(edges) => edges.clone(),
            None => (1..=self.bins + 1).map(|b| self.low_edge(b)).collect(),
        }
    }

    /// Bin number holding `x`: `0` below range (and for NaN), `bins + 1` at
    /// or above `max`.
    pub fn find_bin(&self, x: f64) -> usize {
        if !(x >= self.min) {
            return 0;
        }
        if x >= self.max {
            return self.bins + 1;
        }
        match &self.edges {
            Some(edges) => edges.partition_point(|&e| e <= x).min(self.bins),
            None => {
                let bin = ((x - self.min) / self.bin_width(1)).floor() as usize + 1;
                bin.min(self.bins)
            }
        }
    }

    /// Bin used to book an observable value: values above the range fold
    /// into the last bin, values below it (or NaN) resolve to `0`.
    pub fn resolve_bin(&self, value: f64) -> usize {
        if value >= self.max {
            return self.bins;
        }
        if !(value >= self.min) {
            return 0;
        }
        self.find_bin(value)
    }

    pub fn same_binning(&self, other: &Self) -> bool {
        self.bins == other.bins && self.bin_edges() == other.bin_edges()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_bin_uniform() {
        let axis = Axis::new(10, 0.0, 100.0);
        assert_eq!(axis.find_bin(-0.1), 0);
        assert_eq!(axis.find_bin(0.0), 1);
        assert_eq!(axis.find_bin(9.99), 1);
        assert_eq!(axis.find_bin(10.0), 2);
        assert_eq!(axis.find_bin(99.99), 10);
        assert_eq!(axis.find_bin(100.0), 11);
        assert_eq!(axis.find_bin(f64::NAN), 0);
    }

    #[test]
    fn find_bin_variable_edges() {
        let axis = Axis::from_edges(vec![0.0, 1.0, 5.0, 20.0]).unwrap();
        assert_eq!(axis.bins, 3);
        assert_eq!(axis.find_bin(-1.0), 0);
        assert_eq!(axis.find_bin(0.0), 1);
        assert_eq!(axis.find_bin(1.0), 2);
        assert_eq!(axis.find_bin(4.9), 2);
        assert_eq!(axis.find_bin(19.0), 3);
        assert_eq!(axis.find_bin(20.0), 4);
    }

    #[test]
    fn resolve_bin_folds_out_of_range_values() {
        let axis = Axis::new(10, 0.0, 100.0);
        assert_eq!(axis.resolve_bin(150.0), 10);
        assert_eq!(axis.resolve_bin(100.0), 10);
        assert_eq!(axis.resolve_bin(-5.0), 0);
        assert_eq!(axis.resolve_bin(f64::NAN), 0);
        assert_eq!(axis.resolve_bin(0.0), 1);
        assert_eq!(axis.resolve_bin(55.0), 6);
        for v in [-1e9, -1.0, -1e-9] {
            assert_eq!(axis.resolve_bin(v), 0);
        }
        for v in [100.0, 100.5, 1e12] {
            assert_eq!(axis.resolve_bin(v), axis.bins);
        }
    }

    #[test]
    fn index_axis_puts_every_integer_in_its_own_bin() {
        for n in 1..=100 {
            let axis = Axis::index_axis(n);
            for k in 0..n {
                assert_eq!(axis.find_bin(k as f64), k + 1, "{k} on {n} bins");
            }
            assert_eq!(axis.find_bin(-1.0), 0);
            assert_eq!(axis.find_bin(n as f64), n + 1);
        }
    }

    #[test]
    fn resolve_bin_on_exact_edges() {
        let axis = Axis::new(49, 0.0, 49.0);
        assert_eq!(axis.resolve_bin(1.0), 2);
        assert_eq!(Axis::index_axis(22).find_bin(15.0), 16);
        assert_eq!(Axis::index_axis(45).find_bin(13.0), 14);
        let axis = Axis::new(10, 0.0, 100.0);
        for edge in 0..10 {
            assert_eq!(axis.resolve_bin(f64::from(edge) * 10.0), edge as usize + 1);
        }
    }

    #[test]
    fn resolve_bin_inside_matches_find_bin() {
        let axis = Axis::from_edges(vec![0.0, 2.0, 3.0, 10.0]).unwrap();
        for v in [0.0, 1.5, 2.0, 2.5, 9.0] {
            assert_eq!(axis.resolve_bin(v), axis.find_bin(v));
        }
    }

    #[test]
    fn validate_rejects_bad_axes() {
        assert!(Axis::new(0, 0.0, 1.0).validate().is_err());
        assert!(Axis::new(4, 1.0, 1.0).validate().is_err());
        assert!(Axis::from_edges(vec![0.0]).is_err());
        assert!(Axis::from_edges(vec![0.0, 2.0, 1.0]).is_err());
        let mut axis = Axis::from_edges(vec![0.0, 1.0, 2.0]).unwrap();
        axis.max = 3.0;
        assert!(axis.validate().is_err());
    }

    #[test]
    fn centers_and_edges() {
        let axis = Axis::new(4, 0.0, 2.0);
        assert_eq!(axis.bin_edges(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert!((axis.bin_center(1) - 0.25).abs() < 1e-12);
        assert!((axis.bin_center(4) - 1.75).abs() < 1e-12);
        let index = Axis::index_axis(3);
        assert_eq!(index.find_bin(-1.0), 0);
        assert_eq!(index.find_bin(2.0), 3);
        assert_eq!(index.find_bin(3.0), 4);
    }
}
