/// Fixed-length numeric encoding of one frame's hand geometry.
///
/// The length is fixed at construction: shorter input is zero-padded and
/// longer input is truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn from_values(mut values: Vec<f32>, length: usize) -> Self {
        values.resize(length, 0.0);
        Self { values }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_input_with_zeros() {
        let vector = FeatureVector::from_values(vec![0.5, 0.25], 4);
        assert_eq!(vector.as_slice(), &[0.5, 0.25, 0.0, 0.0]);
    }

    #[test]
    fn truncates_long_input() {
        let vector = FeatureVector::from_values(vec![1.0, 2.0, 3.0], 2);
        assert_eq!(vector.as_slice(), &[1.0, 2.0]);
    }
}
