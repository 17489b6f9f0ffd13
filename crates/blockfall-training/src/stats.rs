/// Summary statistics over a sample of `f32` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub std_dev: f32,
}

impl DescriptiveStats {
    /// Computes summary statistics over the samples.
    ///
    /// Returns `None` for an empty sample. The standard deviation is the
    /// population form, dividing by the sample count.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blockfall_training::DescriptiveStats;
    /// let stats = DescriptiveStats::new([1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 3.0);
    /// assert_eq!(stats.mean, 2.0);
    ///
    /// assert_eq!(DescriptiveStats::new([]), None);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let samples: Vec<f32> = samples.into_iter().collect();
        if samples.is_empty() {
            return None;
        }
        let count = samples.len() as f32;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0;
        for &sample in &samples {
            min = min.min(sample);
            max = max.max(sample);
            sum += sample;
        }
        let mean = sum / count;
        let variance = samples
            .iter()
            .map(|sample| (sample - mean).powi(2))
            .sum::<f32>()
            / count;
        Some(Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_has_no_spread() {
        let stats = DescriptiveStats::new([5.0]).unwrap();
        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn spread_is_the_population_deviation() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn order_does_not_matter() {
        let a = DescriptiveStats::new([3.0, 1.0, 2.0]).unwrap();
        let b = DescriptiveStats::new([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(a, b);
    }
}
