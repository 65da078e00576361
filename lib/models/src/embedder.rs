use crate::error::{ModelError, Result};
use crate::tokenize::{pad_batch, TextTokenizer, TokenizedInput};
use crate::TractModel;
use ndarray::{Array2, Axis};
use sheetqa_core::{TextEmbedder, Vector};
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

/// Configuration for the sentence embedding model
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Maximum token length per text; longer inputs are truncated
    pub max_length: usize,
    /// L2-normalize pooled embeddings
    pub normalize: bool,
    /// Whether the ONNX graph takes a `token_type_ids` input
    pub token_type_input: bool,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        // Defaults match MiniLM-style sentence transformers
        Self {
            max_length: 256,
            normalize: true,
            token_type_input: true,
        }
    }
}

/// Sentence embedding model running on ONNX via tract.
///
/// Token embeddings are mean-pooled over the attention mask, matching the
/// sentence-transformers convention.
pub struct OnnxEmbedder {
    model: Arc<TractModel>,
    tokenizer: TextTokenizer,
    config: EmbedderConfig,
    dim: usize,
}

impl OnnxEmbedder {
    /// Load the model and tokenizer from disk.
    ///
    /// Runs one probe inference to learn the embedding width and to surface
    /// a broken model file at startup rather than on the first request.
    pub fn from_files(
        model_path: &Path,
        tokenizer_path: &Path,
        config: EmbedderConfig,
    ) -> Result<Self> {
        let model_bytes =
            std::fs::read(model_path).map_err(|e| ModelError::Load(e.to_string()))?;

        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(&model_bytes))
            .map_err(|e| ModelError::Load(e.to_string()))?
            .into_optimized()
            .map_err(|e| ModelError::Load(e.to_string()))?
            .into_runnable()
            .map_err(|e| ModelError::Load(e.to_string()))?;

        let tokenizer = TextTokenizer::from_file(tokenizer_path, config.max_length)?;

        let mut embedder = Self {
            model: Arc::new(model),
            tokenizer,
            config,
            dim: 0,
        };

        let probe = embedder.encode_batch(&["dimension probe".to_string()])?;
        embedder.dim = probe.first().map(|v| v.len()).unwrap_or(0);
        if embedder.dim == 0 {
            return Err(ModelError::Shape("probe produced empty embedding".to_string()));
        }

        tracing::debug!(dim = embedder.dim, "embedding model loaded");
        Ok(embedder)
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encoded = self.tokenizer.encode_batch(texts)?;
        let (padded, seq_len) = pad_batch(encoded);
        let batch_size = padded.len();

        let mut inputs: TVec<TValue> = tvec![
            build_input_tensor(&padded, seq_len, |t| &t.input_ids)?.into(),
            build_input_tensor(&padded, seq_len, |t| &t.attention_mask)?.into(),
        ];
        if self.config.token_type_input {
            inputs.push(build_input_tensor(&padded, seq_len, |t| &t.token_type_ids)?.into());
        }

        let attention_mask = build_mask_array(&padded, seq_len)?;

        let outputs = self
            .model
            .run(inputs)
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        // BERT-style models output (batch_size, seq_len, hidden_size)
        let hidden = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| ModelError::Shape(e.to_string()))?
            .to_owned()
            .into_dimensionality::<ndarray::Ix3>()
            .map_err(|e| ModelError::Shape(e.to_string()))?;

        let mut embeddings = Vec::with_capacity(batch_size);
        for i in 0..batch_size {
            let token_embeddings = hidden.index_axis(Axis(0), i);
            let mask = attention_mask.index_axis(Axis(0), i);

            // Mean pooling: sum(embeddings * mask) / sum(mask)
            let hidden_size = token_embeddings.shape()[1];
            let mut sum = vec![0.0f32; hidden_size];
            let mut count = 0.0f32;
            for (j, &m) in mask.iter().enumerate() {
                if m > 0 {
                    for (k, val) in token_embeddings.row(j).iter().enumerate() {
                        sum[k] += val;
                    }
                    count += 1.0;
                }
            }
            if count > 0.0 {
                sum.iter_mut().for_each(|v| *v /= count);
            }

            embeddings.push(sum);
        }

        if self.config.normalize {
            for emb in &mut embeddings {
                let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm > 0.0 {
                    emb.iter_mut().for_each(|x| *x /= norm);
                }
            }
        }

        Ok(embeddings)
    }
}

impl TextEmbedder for OnnxEmbedder {
    fn embed_batch(&self, texts: &[String]) -> sheetqa_core::Result<Vec<Vector>> {
        let embeddings = self.encode_batch(texts)?;
        Ok(embeddings.into_iter().map(Vector::new).collect())
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// Stack one field of a tokenized batch into a (batch, seq) i64 tensor
pub(crate) fn build_input_tensor<F>(
    inputs: &[TokenizedInput],
    seq_len: usize,
    extractor: F,
) -> Result<Tensor>
where
    F: Fn(&TokenizedInput) -> &[i64],
{
    let batch_size = inputs.len();
    let mut data = Vec::with_capacity(batch_size * seq_len);

    for input in inputs {
        data.extend_from_slice(extractor(input));
    }

    Tensor::from_shape(&[batch_size, seq_len], &data)
        .map_err(|e| ModelError::Shape(e.to_string()))
}

fn build_mask_array(inputs: &[TokenizedInput], seq_len: usize) -> Result<Array2<i64>> {
    let batch_size = inputs.len();
    let mut data = Vec::with_capacity(batch_size * seq_len);

    for input in inputs {
        data.extend_from_slice(&input.attention_mask);
    }

    Array2::from_shape_vec((batch_size, seq_len), data)
        .map_err(|e| ModelError::Shape(e.to_string()))
}
