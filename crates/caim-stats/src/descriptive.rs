/// Descriptive statistics of one numeric column.
///
/// Missing cells (`None` or `NaN`) are counted separately and excluded from
/// every other measure.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    /// Number of non-missing values.
    pub count: usize,
    /// Number of missing values.
    pub missing: usize,
    /// Number of distinct non-missing values.
    pub distinct: usize,
    /// The minimum value.
    pub min: f64,
    /// The maximum value.
    pub max: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The population standard deviation.
    pub std_dev: f64,
}

impl ColumnSummary {
    /// Summarizes a column.
    ///
    /// Returns `None` if the column has no non-missing value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use caim_stats::descriptive::ColumnSummary;
    /// let column = [Some(1.0), None, Some(3.0), Some(3.0), Some(f64::NAN)];
    /// let summary = ColumnSummary::new(column).unwrap();
    /// assert_eq!(summary.count, 3);
    /// assert_eq!(summary.missing, 2);
    /// assert_eq!(summary.distinct, 2);
    /// assert_eq!(summary.min, 1.0);
    /// assert_eq!(summary.max, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut missing = 0;
        let mut present = Vec::new();
        for value in values {
            match value {
                Some(v) if !v.is_nan() => present.push(v),
                _ => missing += 1,
            }
        }
        present.sort_by(f64::total_cmp);

        let min = *present.first()?;
        let max = *present.last()?;
        let count = present.len();
        let n = count as f64;
        let mean = present.iter().sum::<f64>() / n;
        let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let mut distinct = present.clone();
        distinct.dedup();

        Some(Self {
            count,
            missing,
            distinct: distinct.len(),
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
    fn test_all_missing() {
        assert_eq!(ColumnSummary::new([None, Some(f64::NAN)]), None);
        assert_eq!(ColumnSummary::new([]), None);
    }

    #[test]
    fn test_mean_and_std_dev() {
        let summary = ColumnSummary::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].map(Some)).unwrap();
        assert_eq!(summary.count, 8);
        assert_eq!(summary.missing, 0);
        assert_eq!(summary.distinct, 5);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.std_dev, 2.0);
    }

    #[test]
    fn test_constant_column() {
        let summary = ColumnSummary::new([Some(3.0); 3]).unwrap();
        assert_eq!(summary.distinct, 1);
        assert_eq!(summary.min, summary.max);
        assert_eq!(summary.std_dev, 0.0);
    }
}
