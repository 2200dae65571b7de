use crate::error::RiskError;
use crate::features::RiskFeatures;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Learned risk scorer: maps features to a raw logit.
///
/// Implementations run on tokio's blocking pool, so they may be CPU-heavy but
/// must be `Send + Sync`.
pub trait RiskModel: Send + Sync {
    fn logit(&self, features: &RiskFeatures) -> Result<f64, RiskError>;
}

/// One fully connected layer. `weights` is `outputs × inputs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.weights.first().map(Vec::len).unwrap_or(0)
    }

    fn outputs(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }
}

/// Feed-forward network with ReLU between layers and a single output logit.
///
/// Serialized as `{"layers": [{"weights": [[..], ..], "bias": [..]}, ..]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseRiskModel {
    layers: Vec<DenseLayer>,
}

impl DenseRiskModel {
    /// Validate layer shapes: two inputs, chained widths, one output.
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self, RiskError> {
        let model = Self { layers };
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, RiskError> {
        let raw = std::fs::read_to_string(path).map_err(|e| RiskError::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let model: DenseRiskModel = serde_json::from_str(&raw).map_err(|e| RiskError::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), RiskError> {
        let first = self
            .layers
            .first()
            .ok_or_else(|| RiskError::InvalidModel("model has no layers".into()))?;
        if first.inputs() != 2 {
            return Err(RiskError::InvalidModel(format!(
                "first layer takes {} inputs, expected 2",
                first.inputs()
            )));
        }

        let mut width = 2;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.weights.iter().any(|row| row.len() != width) {
                return Err(RiskError::InvalidModel(format!(
                    "layer {i} rows must have {width} weights"
                )));
            }
            if layer.bias.len() != layer.outputs() {
                return Err(RiskError::InvalidModel(format!(
                    "layer {i} has {} biases for {} outputs",
                    layer.bias.len(),
                    layer.outputs()
                )));
            }
            width = layer.outputs();
        }

        if width != 1 {
            return Err(RiskError::InvalidModel(format!(
                "last layer produces {width} outputs, expected 1"
            )));
        }
        Ok(())
    }
}

impl RiskModel for DenseRiskModel {
    fn logit(&self, features: &RiskFeatures) -> Result<f64, RiskError> {
        let last = self
            .layers
            .len()
            .checked_sub(1)
            .ok_or_else(|| RiskError::Inference("model has no layers".into()))?;
        let mut activations = features.as_array().to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            activations = layer.forward(&activations);
            if i < last {
                activations.iter_mut().for_each(|a| *a = a.max(0.0));
            }
        }
        match activations.as_slice() {
            [logit] if logit.is_finite() => Ok(*logit),
            [logit] => Err(RiskError::Inference(format!("non-finite logit {logit}"))),
            other => Err(RiskError::Inference(format!(
                "expected one output, got {}",
                other.len()
            ))),
        }
    }
}

/// A loaded model plus the name it is reported under in verdicts.
#[derive(Clone)]
pub struct ModelBackend {
    model: Arc<dyn RiskModel>,
    name: String,
}

impl ModelBackend {
    pub fn new(model: Arc<dyn RiskModel>, name: impl Into<String>) -> Self {
        Self {
            model,
            name: name.into(),
        }
    }

    /// Load a [`DenseRiskModel`] artifact from disk.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RiskError> {
        let path = path.into();
        let model = DenseRiskModel::load(&path)?;
        Ok(Self::new(Arc::new(model), path.display().to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn model(&self) -> Arc<dyn RiskModel> {
        Arc::clone(&self.model)
    }
}

impl fmt::Debug for ModelBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBackend").field("name", &self.name).finish()
    }
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
