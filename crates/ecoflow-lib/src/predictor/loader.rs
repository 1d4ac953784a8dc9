//! Loading forecast model artifacts from disk
//!
//! The artifact format is picked from the file extension. An optional
//! SHA-256 checksum is verified before anything is parsed.

use super::features::NUM_FEATURES;
use super::inference::{LinearForecaster, OnnxForecaster, TreeForecaster, TreeNode};
use super::Forecaster;
use anyhow::{Context, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Version reported when an artifact does not carry one
pub const DEFAULT_MODEL_VERSION: &str = "v0.1.0";

/// Artifact family of a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Linear,
    Tree,
    Onnx,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Linear => "linear",
            ModelKind::Tree => "tree",
            ModelKind::Onnx => "onnx",
        };
        f.write_str(name)
    }
}

/// JSON model artifact
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum JsonArtifact {
    Linear {
        #[serde(default)]
        version: Option<String>,
        coefficients: [f64; NUM_FEATURES],
        intercept: f64,
    },
    Tree {
        #[serde(default)]
        version: Option<String>,
        nodes: Vec<TreeNode>,
    },
}

/// A model ready to serve, with the facts logged at startup
pub struct LoadedModel {
    pub forecaster: Arc<dyn Forecaster>,
    pub kind: ModelKind,
    pub checksum: String,
    pub size_bytes: usize,
}

/// Read, verify and parse a model artifact
///
/// `.json` files hold linear or tree exports, `.onnx` files are run with
/// tract. When `expected_sha256` is set the file must match it.
pub fn load_forecaster(path: &Path, expected_sha256: Option<&str>) -> Result<LoadedModel> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read model file {:?}", path))?;
    let checksum = compute_checksum(&bytes);

    if let Some(expected) = expected_sha256 {
        if !expected.trim().eq_ignore_ascii_case(&checksum) {
            anyhow::bail!(
                "Model checksum mismatch for {:?}: expected {}, got {}",
                path,
                expected.trim(),
                checksum
            );
        }
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let (forecaster, kind): (Arc<dyn Forecaster>, ModelKind) = match extension.as_str() {
        "json" => parse_json_artifact(&bytes)?,
        "onnx" => {
            let forecaster: Arc<dyn Forecaster> =
                Arc::new(OnnxForecaster::new(&bytes, DEFAULT_MODEL_VERSION)?);
            (forecaster, ModelKind::Onnx)
        }
        other => anyhow::bail!("Unsupported model artifact extension {:?} for {:?}", other, path),
    };

    info!(
        path = %path.display(),
        kind = %kind,
        version = %forecaster.model_version(),
        size_bytes = bytes.len(),
        "Loaded forecast model"
    );

    Ok(LoadedModel {
        forecaster,
        kind,
        checksum,
        size_bytes: bytes.len(),
    })
}

fn parse_json_artifact(bytes: &[u8]) -> Result<(Arc<dyn Forecaster>, ModelKind)> {
    let artifact: JsonArtifact =
        serde_json::from_slice(bytes).context("Failed to parse JSON model artifact")?;

    match artifact {
        JsonArtifact::Linear {
            version,
            coefficients,
            intercept,
        } => {
            if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                anyhow::bail!("Linear model has non-finite parameters");
            }
            let version = version.unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string());
            let forecaster: Arc<dyn Forecaster> =
                Arc::new(LinearForecaster::new(coefficients, intercept, version));
            Ok((forecaster, ModelKind::Linear))
        }
        JsonArtifact::Tree { version, nodes } => {
            let version = version.unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string());
            let forecaster: Arc<dyn Forecaster> = Arc::new(TreeForecaster::new(nodes, version)?);
            Ok((forecaster, ModelKind::Tree))
        }
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
