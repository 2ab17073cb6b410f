//! AnimeGANv3 ONNX model session management and inference.
//!
//! Loads a generator exported to ONNX format and runs it on normalized NHWC
//! tensors. Tensor names are resolved once at load time.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::{PipelineError, PipelineResult};

use super::StyleModel;

/// Wraps an ONNX Runtime session for the AnimeGANv3 generator.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct OnnxStyleSession {
    session: Mutex<Session>,
    /// Name of the image input tensor.
    input_name: String,
    /// Name of the stylized output tensor.
    output_name: String,
    model_path: PathBuf,
}

impl OnnxStyleSession {
    /// Load a generator from an ONNX file.
    pub fn load(model_path: &Path) -> PipelineResult<Self> {
        let load_err = |message: String| PipelineError::ModelLoad {
            path: model_path.to_path_buf(),
            message,
        };

        let session = Session::builder()
            .map_err(|e| load_err(format!("Failed to create ONNX session builder: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| load_err(format!("Failed to load ONNX model: {e}")))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .ok_or_else(|| load_err("Model declares no inputs".to_string()))?;
        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| load_err("Model declares no outputs".to_string()))?;

        tracing::debug!(
            "Loaded AnimeGAN model from {:?} (input: {:?}, output: {:?})",
            model_path,
            input_name,
            output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_path: model_path.to_path_buf(),
        })
    }
}

impl StyleModel for OnnxStyleSession {
    /// Input shape: \[1, H, W, 3\] (NHWC, normalized to \[-1, 1\]).
    /// Output: a tensor of the same layout, roughly in \[-1, 1\].
    fn stylize(&self, input: &Array4<f32>, path: &Path) -> PipelineResult<Array4<f32>> {
        let infer_err = |message: String| PipelineError::Inference {
            path: path.to_path_buf(),
            message,
        };

        let shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = input.iter().copied().collect();

        let input_value = Value::from_array((shape, flat_data))
            .map_err(|e| infer_err(format!("Failed to create input tensor: {e}")))?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self
            .session
            .lock()
            .map_err(|e| infer_err(format!("Session lock poisoned: {e}")))?;

        let outputs = session
            .run(inputs)
            .map_err(|e| infer_err(format!("ONNX inference failed: {e}")))?;

        let output = outputs
            .iter()
            .find(|(name, _)| *name == self.output_name.as_str())
            .ok_or_else(|| infer_err(format!("Model did not produce {}", self.output_name)))?;

        let (shape, data) = output
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e| infer_err(format!("Failed to extract output tensor: {e}")))?;

        if shape.len() != 4 {
            return Err(infer_err(format!("Unexpected output shape: {:?}", shape)));
        }
        let dims = (
            shape[0] as usize,
            shape[1] as usize,
            shape[2] as usize,
            shape[3] as usize,
        );

        Array4::from_shape_vec(dims, data.to_vec())
            .map_err(|e| infer_err(format!("Output tensor does not match its shape: {e}")))
    }

    fn describe(&self) -> String {
        format!("onnx:{}", self.model_path.display())
    }
}
