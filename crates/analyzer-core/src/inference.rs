//! Model artifact loading and inference via the `ort` crate.
//!
//! The model artifact is a pair of files fixed at training time:
//! - an ONNX graph with input `"input"` (f32, shape `[1, 8]`) and output
//!   `"probabilities"` (f32, shape `[1, 2]`, benign then malicious), and
//! - a JSON file with the standardizer statistics (per-feature mean and
//!   scale, in the fixed feature order).
//!
//! Both are loaded once at startup and shared read-only afterwards.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use ort::session::Session;
use ort::value::TensorRef;
use serde::Deserialize;

use crate::features::{FeatureVector, NUM_FEATURES};

/// Class probabilities on the 0-100 percent scale.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Probabilities {
    pub safe: f32,
    pub malicious: f32,
}

impl Probabilities {
    /// Build from the model's `(benign, malicious)` pair on the 0-1 scale.
    pub fn from_fractions(p0: f32, p1: f32) -> Self {
        Self { safe: p0 * 100.0, malicious: p1 * 100.0 }
    }
}

/// Per-feature standardization statistics, fitted at training time and
/// stored beside the model. Never recomputed at inference.
#[derive(Debug, Clone, Deserialize)]
pub struct Standardizer {
    pub mean: [f32; NUM_FEATURES],
    pub scale: [f32; NUM_FEATURES],
}

impl Standardizer {
    /// Load the statistics from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("cannot read scaler file {}", path.display()))?;
        let standardizer: Self =
            serde_json::from_str(&data).context("malformed scaler file")?;
        if standardizer.scale.iter().any(|s| *s == 0.0) {
            bail!("scaler has a zero scale entry");
        }
        Ok(standardizer)
    }

    /// Zero-mean unit-variance transform in the fixed feature order.
    pub fn transform(&self, features: &FeatureVector) -> [f32; NUM_FEATURES] {
        let raw = features.to_array();
        let mut out = [0.0f32; NUM_FEATURES];
        for i in 0..NUM_FEATURES {
            out[i] = (raw[i] - self.mean[i]) / self.scale[i];
        }
        out
    }
}

/// Scoring interface of the pretrained classifier.
///
/// Implementations must behave as pure functions of the input vector;
/// one instance is shared across all concurrent requests.
pub trait UrlScorer: Send + Sync {
    /// Score a standardized feature vector into class probabilities.
    fn predict_proba(&self, standardized: &[f32; NUM_FEATURES]) -> Result<Probabilities>;
}

/// ONNX-backed scorer.
pub struct OnnxOracle {
    session: Mutex<Session>,
}

impl OnnxOracle {
    /// Load an ONNX model from the given path.
    pub fn load(model_path: &Path) -> Result<Self> {
        let session = Session::builder()?
            .with_intra_threads(1)?
            .commit_from_file(model_path)
            .with_context(|| format!("cannot load model {}", model_path.display()))?;

        Ok(Self { session: Mutex::new(session) })
    }
}

impl UrlScorer for OnnxOracle {
    fn predict_proba(&self, standardized: &[f32; NUM_FEATURES]) -> Result<Probabilities> {
        let input = Array2::from_shape_vec((1, NUM_FEATURES), standardized.to_vec())?;
        let input_tensor = TensorRef::from_array_view(&input)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("lock error: {e}"))?;
        let outputs = session.run(ort::inputs!["input" => input_tensor])?;

        let probs = outputs["probabilities"].try_extract_array::<f32>()?;
        let p0 = probs.iter().next().copied().unwrap_or(0.0);
        let p1 = probs.iter().nth(1).copied().unwrap_or(0.0);

        Ok(Probabilities::from_fractions(p0, p1))
    }
}
