//! ONNX model loader

use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded ONNX model with resolved tensor names
pub struct LoadedModel {
    pub session: Session,
    /// Feature tensor input
    pub input_name: String,
    /// Class probability output, if the export has one
    pub probability_output: Option<String>,
    /// Predicted label output, if the export has one
    pub label_output: Option<String>,
}

/// Loader for ONNX classifier exports
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    intra_threads: usize,
}

impl ModelLoader {
    pub fn with_threads(intra_threads: usize) -> Result<Self> {
        ort::init().commit()?;
        info!(intra_threads = intra_threads, "ONNX Runtime initialized");
        Ok(Self { intra_threads })
    }

    /// Load a classifier export from file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel> {
        let path = path.as_ref();

        info!(path = %path.display(), threads = self.intra_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.intra_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        if probability_output.is_none() && label_output.is_none() {
            anyhow::bail!(
                "Model {} exposes neither a probability nor a label output",
                path.display()
            );
        }

        info!(
            input = %input_name,
            probability_output = ?probability_output,
            label_output = ?label_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            session,
            input_name,
            probability_output,
            label_output,
        })
    }
}
