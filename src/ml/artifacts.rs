// src/ml/artifacts.rs

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::de::DeserializeOwned;

use crate::{
    config::{Config, FEATURE_COLUMNS, QUESTION_COUNT},
    error::LoadError,
    ml::{
        encoder::{FeatureEncoderSet, TargetDecoder},
        forest::RandomForest,
        pipeline::InferencePipeline,
    },
};

/// Locations of the three training artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub encoders: PathBuf,
    pub target: PathBuf,
}

impl From<&Config> for ArtifactPaths {
    fn from(config: &Config) -> Self {
        Self {
            model: config.model_path.clone(),
            encoders: config.encoder_path.clone(),
            target: config.target_encoder_path.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Artifacts {
    pub model: RandomForest,
    pub encoders: FeatureEncoderSet,
    pub target: TargetDecoder,
}

impl Artifacts {
    pub fn into_pipeline(self) -> InferencePipeline {
        InferencePipeline::new(self.encoders, Arc::new(self.model), self.target)
    }
}

/// Loads and validates the classifier and both encoders.
///
/// Any missing, unreadable or malformed file is an error; the caller is
/// expected to halt.
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<Artifacts, LoadError> {
    let model: RandomForest = read_json(&paths.model)?;
    model.validate().map_err(|reason| invalid(&paths.model, reason))?;
    if model.n_features != QUESTION_COUNT {
        return Err(invalid(
            &paths.model,
            format!(
                "model expects {} features, quiz has {}",
                model.n_features, QUESTION_COUNT
            ),
        ));
    }

    let encoders: FeatureEncoderSet = read_json(&paths.encoders)?;
    for column in encoders.columns() {
        if let Some(encoder) = encoders.get(column) {
            encoder
                .validate()
                .map_err(|reason| invalid(&paths.encoders, format!("{}: {}", column, reason)))?;
        }
    }
    for column in FEATURE_COLUMNS {
        if encoders.get(column).is_none() {
            tracing::warn!("No label encoder for feature column '{}'", column);
        }
    }

    let target: TargetDecoder = read_json(&paths.target)?;
    target
        .0
        .validate()
        .map_err(|reason| invalid(&paths.target, reason))?;
    if target.labels().len() != model.n_classes {
        tracing::warn!(
            "Target encoder has {} labels but model has {} classes",
            target.labels().len(),
            model.n_classes
        );
    }

    tracing::info!(
        "Loaded model with {} trees and {} characters",
        model.trees.len(),
        target.labels().len()
    );

    Ok(Artifacts {
        model,
        encoders,
        target,
    })
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(path: &Path, reason: String) -> LoadError {
    LoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{answer::Answer, question::OptionCode};

    fn shipped() -> ArtifactPaths {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/saved_model");
        ArtifactPaths {
            model: dir.join("random_forest_model.json"),
            encoders: dir.join("label_encoders.json"),
            target: dir.join("target_encoder.json"),
        }
    }

    #[test]
    fn test_load_shipped_artifacts() {
        let artifacts = load_artifacts(&shipped()).unwrap();
        assert_eq!(artifacts.model.n_features, QUESTION_COUNT);
        assert_eq!(artifacts.target.labels().len(), 5);
    }

    #[test]
    fn test_missing_model_file_is_io_error() {
        let mut paths = shipped();
        paths.model = PathBuf::from("/definitely/not/here/model.json");
        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("model.json"));
    }

    #[test]
    fn test_garbage_encoder_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("label_encoders.json");
        fs::write(&bad, "not json at all").unwrap();

        let mut paths = shipped();
        paths.encoders = bad;
        assert!(matches!(
            load_artifacts(&paths).unwrap_err(),
            LoadError::Parse { .. }
        ));
    }

    #[test]
    fn test_feature_count_mismatch_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.json");
        fs::write(
            &model,
            r#"{ "n_classes": 1, "n_features": 2, "trees": [{ "nodes": [{ "leaf": { "value": [1] } }] }] }"#,
        )
        .unwrap();

        let mut paths = shipped();
        paths.model = model;
        assert!(matches!(
            load_artifacts(&paths).unwrap_err(),
            LoadError::Invalid { .. }
        ));
    }

    #[test]
    fn test_golden_answers() {
        let pipeline = load_artifacts(&shipped()).unwrap().into_pipeline();

        let harry = [
            OptionCode::A,
            OptionCode::B,
            OptionCode::A,
            OptionCode::C,
            OptionCode::D,
        ]
        .map(Answer::Code);
        let draco = [
            OptionCode::C,
            OptionCode::C,
            OptionCode::C,
            OptionCode::A,
            OptionCode::A,
        ]
        .map(Answer::Code);

        for _ in 0..3 {
            assert_eq!(pipeline.predict(&harry).unwrap(), "Harry Potter");
            assert_eq!(pipeline.predict(&draco).unwrap(), "Draco Malfoy");
        }
    }

    #[test]
    fn test_every_known_tuple_is_deterministic() {
        let pipeline = load_artifacts(&shipped()).unwrap().into_pipeline();

        // A5 never saw 'E' during training, so it is left out here.
        let a5_codes = [OptionCode::A, OptionCode::B, OptionCode::C, OptionCode::D];
        for a1 in OptionCode::ALL {
            for a4 in OptionCode::ALL {
                for a5 in a5_codes {
                    let answers = [a1, OptionCode::B, OptionCode::C, a4, a5].map(Answer::Code);
                    let first = pipeline.predict(&answers).unwrap();
                    assert_eq!(pipeline.predict(&answers).unwrap(), first);
                }
            }
        }
    }
}
