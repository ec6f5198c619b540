//! ONNX Runtime classifier

use crate::config::ModelConfig;
use crate::models::classifier::Classifier;
use crate::models::features::{FeatureEncoder, FEATURE_COUNT};
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::TransactionRecord;
use anyhow::{Context, Result};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier backed by an exported binary model.
///
/// Rows are scored in one `[rows, 9]` tensor. When the export has a
/// probability output, a row is fraud when its class-1 probability reaches
/// `threshold`; otherwise the label output is used as is. Exports must emit
/// plain tensors (sklearn-onnx: `zipmap=False`).
pub struct OnnxClassifier {
    /// Session needs `&mut` to run
    model: Mutex<LoadedModel>,
    encoder: FeatureEncoder,
    threshold: f64,
}

impl OnnxClassifier {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        Self::from_path(&config.path, config.threshold, config.intra_threads)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, threshold: f64, intra_threads: usize) -> Result<Self> {
        let loader = ModelLoader::with_threads(intra_threads)?;
        let model = loader.load(path)?;

        info!(threshold = threshold, "ONNX classifier ready");

        Ok(Self {
            model: Mutex::new(model),
            encoder: FeatureEncoder::new(),
            threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn run(&self, records: &[TransactionRecord]) -> Result<Vec<u8>> {
        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let rows = records.len();
        let shape = vec![rows as i64, FEATURE_COUNT as i64];
        let input_tensor = Tensor::from_array((shape, self.encoder.encode_batch(records)))
            .context("Failed to create input tensor")?;

        let input_name = model.input_name.clone();
        let probability_output = model.probability_output.clone();
        let label_output = model.label_output.clone();

        let outputs = model
            .session
            .run(ort::inputs![input_name.as_str() => input_tensor])?;

        if let Some(name) = probability_output {
            if let Some(output) = outputs.get(name.as_str()) {
                if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                    let dims: Vec<i64> = shape.iter().copied().collect();
                    let probabilities = fraud_probabilities(&dims, data, rows)?;
                    debug!(rows = rows, "Scored batch from probability output");
                    return Ok(probabilities
                        .into_iter()
                        .map(|p| u8::from(p as f64 >= self.threshold))
                        .collect());
                }
            }
        }

        if let Some(name) = label_output {
            if let Some(output) = outputs.get(name.as_str()) {
                let (_, data) = output
                    .try_extract_tensor::<i64>()
                    .context("Label output is not an int64 tensor")?;
                debug!(rows = rows, "Scored batch from label output");
                return Ok(data
                    .iter()
                    .map(|&label| u8::try_from(label).unwrap_or(u8::MAX))
                    .collect());
            }
        }

        anyhow::bail!("Model produced no usable probability or label output")
    }
}

/// Class-1 probability per row from a `[rows, classes]`, `[rows, 1]` or
/// `[rows]` tensor.
fn fraud_probabilities(dims: &[i64], data: &[f32], rows: usize) -> Result<Vec<f32>> {
    let classes = match dims {
        [n, k] if *n as usize == rows => *k as usize,
        [n] if *n as usize == rows => 1,
        _ => anyhow::bail!("Unexpected probability shape {:?} for {} rows", dims, rows),
    };

    if data.len() != rows * classes {
        anyhow::bail!("Probability tensor holds {} values, expected {}", data.len(), rows * classes);
    }

    Ok((0..rows)
        .map(|row| {
            if classes >= 2 {
                data[row * classes + 1]
            } else {
                data[row]
            }
        })
        .collect())
}

impl Classifier for OnnxClassifier {
    fn predict(&self, records: &[TransactionRecord]) -> Result<Vec<u8>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        self.run(records)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
