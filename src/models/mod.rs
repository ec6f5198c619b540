//! Classifier boundary and model inference components

pub mod classifier;
pub mod features;
#[cfg(feature = "onnx")]
pub mod inference;
#[cfg(feature = "onnx")]
pub mod loader;

pub use classifier::{label_batch, Classifier};
pub use features::FeatureEncoder;
#[cfg(feature = "onnx")]
pub use inference::OnnxClassifier;
