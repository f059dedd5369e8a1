// src/ml/encoder.rs

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Categorical encoder fitted at training time.
///
/// A value is encoded as its position in `classes`; decoding is the reverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("encoder has no classes".to_string());
        }

        let mut seen = HashSet::new();
        if let Some(dup) = classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(format!("duplicate class '{}'", dup));
        }

        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Returns `None` for a value never seen during training.
    pub fn transform(&self, value: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == value)
    }

    pub fn inverse_transform(&self, encoded: usize) -> Option<&str> {
        self.classes.get(encoded).map(String::as_str)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        Self::new(self.classes.clone()).map(|_| ())
    }
}

/// Per-feature encoders keyed by feature column name (`A1`..`A5`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureEncoderSet {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl FeatureEncoderSet {
    pub fn new(encoders: BTreeMap<String, LabelEncoder>) -> Self {
        Self { encoders }
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }
}

/// Maps the classifier's integer output back to a character name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetDecoder(pub LabelEncoder);

impl TargetDecoder {
    pub fn decode(&self, label: usize) -> Option<&str> {
        self.0.inverse_transform(label)
    }

    pub fn labels(&self) -> &[String] {
        self.0.classes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_transform_uses_trained_positions() {
        let encoder = LabelEncoder::new(letters(&["A", "B", "D"])).unwrap();
        assert_eq!(encoder.transform("A"), Some(0));
        assert_eq!(encoder.transform("D"), Some(2));
        assert_eq!(encoder.transform("C"), None);
    }

    #[test]
    fn test_inverse_transform_out_of_range() {
        let encoder = LabelEncoder::new(letters(&["x", "y"])).unwrap();
        assert_eq!(encoder.inverse_transform(1), Some("y"));
        assert_eq!(encoder.inverse_transform(2), None);
    }

    #[test]
    fn test_new_rejects_empty_and_duplicates() {
        assert!(LabelEncoder::new(vec![]).is_err());
        assert!(LabelEncoder::new(letters(&["A", "A"])).is_err());
    }

    #[test]
    fn test_feature_set_json_shape() {
        let json = r#"{ "A1": { "classes": ["A", "B"] }, "A2": { "classes": ["C"] } }"#;
        let set: FeatureEncoderSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.get("A2").unwrap().transform("C"), Some(0));
        assert!(set.get("A3").is_none());
        assert_eq!(set.columns().collect::<Vec<_>>(), vec!["A1", "A2"]);
    }

    #[test]
    fn test_target_decoder_json_shape() {
        let decoder: TargetDecoder =
            serde_json::from_str(r#"{ "classes": ["Draco Malfoy", "Harry Potter"] }"#).unwrap();
        assert_eq!(decoder.decode(1), Some("Harry Potter"));
    }
}
