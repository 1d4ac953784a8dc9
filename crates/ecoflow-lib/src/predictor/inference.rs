//! Forecast model backends
//!
//! Three artifact formats are supported: exported linear regression
//! coefficients, an exported regression tree (both as JSON), and ONNX graphs
//! run through tract. All of them take the same four-feature row.

use super::features::{FeatureRow, NUM_FEATURES};
use super::Forecaster;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Maximum inference latency before warning (5ms target)
const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Inference statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceStats {
    pub total_inferences: u64,
    pub slow_inferences: u64,
}

/// Latency bookkeeping shared by all backends
#[derive(Debug, Default)]
struct InferenceCounters {
    total: AtomicU64,
    slow: AtomicU64,
}

impl InferenceCounters {
    fn record(&self, started: Instant) {
        let elapsed = started.elapsed();
        self.total.fetch_add(1, Ordering::Relaxed);

        if elapsed.as_millis() > MAX_INFERENCE_MS {
            self.slow.fetch_add(1, Ordering::Relaxed);
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }
    }

    fn snapshot(&self) -> InferenceStats {
        InferenceStats {
            total_inferences: self.total.load(Ordering::Relaxed),
            slow_inferences: self.slow.load(Ordering::Relaxed),
        }
    }
}

/// Linear regression: `intercept + sum(coefficients[i] * x[i])`
#[derive(Debug)]
pub struct LinearForecaster {
    coefficients: [f64; NUM_FEATURES],
    intercept: f64,
    version: String,
    counters: InferenceCounters,
}

impl LinearForecaster {
    pub fn new(coefficients: [f64; NUM_FEATURES], intercept: f64, version: impl Into<String>) -> Self {
        Self {
            coefficients,
            intercept,
            version: version.into(),
            counters: InferenceCounters::default(),
        }
    }
}

impl Forecaster for LinearForecaster {
    fn forecast(&self, features: &FeatureRow) -> Result<f64> {
        let start = Instant::now();
        let value = self
            .coefficients
            .iter()
            .zip(features.values())
            .fold(self.intercept, |acc, (coef, x)| acc + coef * x);
        self.counters.record(start);
        Ok(value)
    }

    fn model_version(&self) -> &str {
        &self.version
    }

    fn stats(&self) -> InferenceStats {
        self.counters.snapshot()
    }
}

/// One node of an exported regression tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, otherwise `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Regression tree evaluated from the root at index 0
#[derive(Debug)]
pub struct TreeForecaster {
    nodes: Vec<TreeNode>,
    version: String,
    counters: InferenceCounters,
}

impl TreeForecaster {
    /// Build a tree, checking that every split points forward to an existing
    /// node and reads a known feature
    pub fn new(nodes: Vec<TreeNode>, version: impl Into<String>) -> Result<Self> {
        if nodes.is_empty() {
            anyhow::bail!("Regression tree has no nodes");
        }

        for (idx, node) in nodes.iter().enumerate() {
            if let TreeNode::Split { feature, left, right, threshold } = node {
                if *feature >= NUM_FEATURES {
                    anyhow::bail!("Node {} splits on feature {}, expected < {}", idx, feature, NUM_FEATURES);
                }
                if !threshold.is_finite() {
                    anyhow::bail!("Node {} has a non-finite threshold", idx);
                }
                for child in [*left, *right] {
                    if child <= idx || child >= nodes.len() {
                        anyhow::bail!("Node {} has invalid child index {}", idx, child);
                    }
                }
            }
        }

        Ok(Self {
            nodes,
            version: version.into(),
            counters: InferenceCounters::default(),
        })
    }

    fn evaluate(&self, x: &[f64; NUM_FEATURES]) -> Result<f64> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx).context("Tree walk left the node table")? {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl Forecaster for TreeForecaster {
    fn forecast(&self, features: &FeatureRow) -> Result<f64> {
        let start = Instant::now();
        let value = self.evaluate(features.values())?;
        self.counters.record(start);
        Ok(value)
    }

    fn model_version(&self) -> &str {
        &self.version
    }

    fn stats(&self) -> InferenceStats {
        self.counters.snapshot()
    }
}

/// ONNX-based forecaster using tract for lightweight inference
pub struct OnnxForecaster {
    model: TractModel,
    version: String,
    counters: InferenceCounters,
}

impl OnnxForecaster {
    /// Create a new forecaster from model bytes
    pub fn new(model_bytes: &[u8], version: impl Into<String>) -> Result<Self> {
        Ok(Self {
            model: Self::load_model(model_bytes)?,
            version: version.into(),
            counters: InferenceCounters::default(),
        })
    }

    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8]) -> Result<TractModel> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(model)
    }

    fn features_to_tensor(features: &FeatureRow) -> Result<Tensor> {
        let array = tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), features.to_f32())
            .context("Failed to shape feature tensor")?;
        Ok(array.into())
    }
}

impl Forecaster for OnnxForecaster {
    fn forecast(&self, features: &FeatureRow) -> Result<f64> {
        let start = Instant::now();
        let input = Self::features_to_tensor(features)?;

        let result = self.model.run(tvec!(input.into()))?;
        let output = result.first().context("No output from model")?;
        let value = output
            .to_array_view::<f32>()?
            .iter()
            .next()
            .copied()
            .context("Model output is empty")?;

        self.counters.record(start);
        Ok(f64::from(value))
    }

    fn model_version(&self) -> &str {
        &self.version
    }

    fn stats(&self) -> InferenceStats {
        self.counters.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Vec<TreeNode> {
        vec![
            // temperature <= 20
            TreeNode::Split { feature: 0, threshold: 20.0, left: 1, right: 2 },
            TreeNode::Leaf { value: 35.0 },
            // location code <= 1
            TreeNode::Split { feature: 3, threshold: 1.0, left: 3, right: 4 },
            TreeNode::Leaf { value: 48.5 },
            TreeNode::Leaf { value: 62.25 },
        ]
    }

    #[test]
    fn test_linear_forecast() {
        let model = LinearForecaster::new([0.5, 0.5, 1.0, 2.0], 10.0, "linear-test");
        let row = FeatureRow([20.0, 50.0, 3.0, 1.0]);
        // 10 + 10 + 25 + 3 + 2
        assert_eq!(model.forecast(&row).unwrap(), 50.0);
        assert_eq!(model.model_version(), "linear-test");
    }

    #[test]
    fn test_linear_forecast_is_deterministic() {
        let model = LinearForecaster::new([0.37, -0.21, 1.3, 2.7], 49.9, "v1");
        let row = FeatureRow([27.3, 61.8, 4.0, 2.0]);
        let first = model.forecast(&row).unwrap();
        for _ in 0..10 {
            assert_eq!(model.forecast(&row).unwrap().to_bits(), first.to_bits());
        }
        assert_eq!(model.stats().total_inferences, 11);
    }

    #[test]
    fn test_tree_forecast_paths() {
        let model = TreeForecaster::new(sample_tree(), "tree-test").unwrap();
        assert_eq!(model.forecast(&FeatureRow([15.0, 40.0, 0.0, 3.0])).unwrap(), 35.0);
        assert_eq!(model.forecast(&FeatureRow([25.0, 40.0, 0.0, 0.0])).unwrap(), 48.5);
        assert_eq!(model.forecast(&FeatureRow([25.0, 40.0, 0.0, 3.0])).unwrap(), 62.25);
        // Threshold is inclusive on the left
        assert_eq!(model.forecast(&FeatureRow([20.0, 40.0, 0.0, 3.0])).unwrap(), 35.0);
    }

    #[test]
    fn test_tree_rejects_backward_children() {
        let nodes = vec![
            TreeNode::Split { feature: 0, threshold: 1.0, left: 1, right: 0 },
            TreeNode::Leaf { value: 1.0 },
        ];
        assert!(TreeForecaster::new(nodes, "bad").is_err());
    }

    #[test]
    fn test_tree_rejects_unknown_feature_and_empty() {
        let nodes = vec![
            TreeNode::Split { feature: 9, threshold: 1.0, left: 1, right: 2 },
            TreeNode::Leaf { value: 1.0 },
            TreeNode::Leaf { value: 2.0 },
        ];
        assert!(TreeForecaster::new(nodes, "bad").is_err());
        assert!(TreeForecaster::new(Vec::new(), "empty").is_err());
    }

    #[test]
    fn test_tree_node_deserialization() {
        let nodes: Vec<TreeNode> = serde_json::from_str(
            r#"[{"feature":1,"threshold":55.0,"left":1,"right":2},{"value":3.5},{"value":7.0}]"#,
        )
        .unwrap();
        assert_eq!(nodes[1], TreeNode::Leaf { value: 3.5 });
        assert!(matches!(nodes[0], TreeNode::Split { feature: 1, .. }));
    }

    #[test]
    fn test_onnx_rejects_garbage_bytes() {
        assert!(OnnxForecaster::new(b"definitely not a protobuf graph", "v0").is_err());
    }
}
