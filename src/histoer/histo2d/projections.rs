use crate::histoer::histo1d::histogram1d::Histogram;

use super::histogram2d::Histogram2D;

impl Histogram2D {
    /// Project onto the x axis, summing every y row including its flows.
    pub fn x_projection(&self) -> Histogram {
        let mut projection = Histogram::new(&format!("{}_px", self.name), self.x_axis.clone());
        for ((x_bin, _), bin) in &self.counts {
            add_to_bin(&mut projection, *x_bin, bin.sumw, bin.sumw2);
        }
        projection.entries = self.entries;
        projection
    }

    /// Project onto the y axis, summing every x column including its flows.
    pub fn y_projection(&self) -> Histogram {
        let mut projection = Histogram::new(&format!("{}_py", self.name), self.y_axis.clone());
        for ((_, y_bin), bin) in &self.counts {
            add_to_bin(&mut projection, *y_bin, bin.sumw, bin.sumw2);
        }
        projection.entries = self.entries;
        projection
    }
}

fn add_to_bin(hist: &mut Histogram, bin: usize, sumw: f64, sumw2: f64) {
    if bin == 0 {
        hist.underflow += sumw;
    } else if bin > hist.bins.len() {
        hist.overflow += sumw;
    } else {
        hist.bins[bin - 1] += sumw;
        hist.sumw2[bin - 1] += sumw2;
    }
}

#[cfg(test)]
mod tests {
    use crate::histoer::axis::Axis;
    use crate::histoer::histo2d::histogram2d::Histogram2D;

    #[test]
    fn test_projections() {
        let mut matrix = Histogram2D::new("mig", Axis::index_axis(2), Axis::index_axis(3));
        matrix.fill(0.0, 0.0, 1.0);
        matrix.fill(0.0, 2.0, 2.0);
        matrix.fill(1.0, -1.0, 4.0);
        matrix.fill(-1.0, 1.0, 8.0);

        let px = matrix.x_projection();
        assert_eq!(px.name, "mig_px");
        assert_eq!(px.bins, vec![3.0, 4.0]);
        assert_eq!(px.underflow, 8.0);

        let py = matrix.y_projection();
        assert_eq!(py.bins, vec![1.0, 8.0, 2.0]);
        assert_eq!(py.underflow, 4.0);
        assert_eq!(py.sumw2, vec![1.0, 64.0, 4.0]);
    }
}
