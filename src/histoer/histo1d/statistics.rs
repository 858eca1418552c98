use super::histogram1d::Histogram;

impl Histogram {
    /// Sum of the in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.bins.iter().sum()
    }

    // Calculate the statistics for the histogram over the in-range bins.
    pub fn get_statistics(&self) -> (f64, f64, f64) {
        let mut sum_product = 0.0;
        let mut total = 0.0;

        for (index, count) in self.bins.iter().enumerate() {
            sum_product += count * self.axis.bin_center(index + 1);
            total += count;
        }

        if total == 0.0 {
            return (0.0, 0.0, 0.0);
        }

        let mean = sum_product / total;

        let sum_squared_diff: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(index, count)| {
                let diff = self.axis.bin_center(index + 1) - mean;
                count * diff * diff
            })
            .sum();

        let stdev = (sum_squared_diff / total).sqrt();

        (total, mean, stdev)
    }
}
