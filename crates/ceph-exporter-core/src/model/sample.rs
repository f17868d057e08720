//! The mapper's output unit.

/// One gauge value for one descriptor and label set.
///
/// `label_values` lines up with the descriptor's `label_names`.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricSample {
    pub key: &'static str,
    pub value: f64,
    pub label_values: Vec<String>,
}

impl MetricSample {
    /// Sample without labels.
    pub fn new(key: &'static str, value: f64) -> Self {
        Self {
            key,
            value,
            label_values: Vec::new(),
        }
    }

    /// Sample with labels, in descriptor order.
    pub fn labeled<I, S>(key: &'static str, value: f64, label_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key,
            value,
            label_values: label_values.into_iter().map(Into::into).collect(),
        }
    }
}
