/// Timings recorded for one configuration, with the average frozen once
/// `trials` samples have arrived.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct SeriesStats {
    times: Vec<f64>,
    average: Option<f64>,
}

impl SeriesStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sample. The average is computed exactly when the sample count
    /// reaches `trials`; later samples are kept but never change it.
    pub fn add(&mut self, time: f64, trials: usize) {
        self.times.push(time);
        if self.times.len() == trials {
            let sum: f64 = self.times.iter().sum();
            self.average = Some(round(sum / trials as f64));
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// `None` until the series has seen `trials` samples.
    pub fn average(&self) -> Option<f64> {
        self.average
    }

    pub fn count(&self) -> usize {
        self.times.len()
    }
}

/// Rounds to 2 decimal places, exact ties to the even neighbour.
pub fn round(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}
