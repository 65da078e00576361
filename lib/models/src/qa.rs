use crate::embedder::build_input_tensor;
use crate::error::{ModelError, Result};
use crate::tokenize::{PairEncoding, TextTokenizer};
use crate::TractModel;
use sheetqa_core::{AnswerExtractor, SpanAnswer};
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

/// Configuration for the extractive QA model
#[derive(Debug, Clone)]
pub struct QaConfig {
    /// Maximum token length for the question+context pair
    pub max_length: usize,
    /// Maximum answer span length in tokens
    pub max_answer_len: usize,
    /// Whether the ONNX graph takes a `token_type_ids` input
    pub token_type_input: bool,
}

impl Default for QaConfig {
    fn default() -> Self {
        // Defaults match DistilBERT SQuAD exports, which drop token type ids
        Self {
            max_length: 384,
            max_answer_len: 30,
            token_type_input: false,
        }
    }
}

/// Extractive question answering model running on ONNX via tract.
///
/// The model scores every token as a potential answer start and end; the
/// best-scoring valid (start, end) pair inside the context is mapped back to
/// a character span of the context string.
pub struct OnnxExtractor {
    model: Arc<TractModel>,
    tokenizer: TextTokenizer,
    config: QaConfig,
}

impl OnnxExtractor {
    /// Load the model and tokenizer from disk
    pub fn from_files(model_path: &Path, tokenizer_path: &Path, config: QaConfig) -> Result<Self> {
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

        Ok(Self {
            model: Arc::new(model),
            tokenizer,
            config,
        })
    }

    fn run(&self, question: &str, context: &str) -> Result<SpanAnswer> {
        let encoding = self.tokenizer.encode_pair(question, context)?;
        let seq_len = encoding.input.len();
        if seq_len == 0 {
            return Ok(SpanAnswer::empty());
        }

        let batch = std::slice::from_ref(&encoding.input);
        let mut inputs: TVec<TValue> = tvec![
            build_input_tensor(batch, seq_len, |t| &t.input_ids)?.into(),
            build_input_tensor(batch, seq_len, |t| &t.attention_mask)?.into(),
        ];
        if self.config.token_type_input {
            inputs.push(build_input_tensor(batch, seq_len, |t| &t.token_type_ids)?.into());
        }

        let outputs = self
            .model
            .run(inputs)
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        // QA heads output start and end logits, each (batch, seq_len)
        let start_logits = logits_row(&outputs[0])?;
        let end_logits = logits_row(&outputs[1])?;
        if start_logits.len() < seq_len || end_logits.len() < seq_len {
            return Err(ModelError::Shape(format!(
                "logits shorter than input: {} / {} vs {seq_len}",
                start_logits.len(),
                end_logits.len()
            )));
        }

        let allowed = context_token_mask(&encoding);
        let span = best_span(
            &start_logits,
            &end_logits,
            &allowed,
            self.config.max_answer_len,
        );

        Ok(match span {
            Some((start, end, score)) => {
                let from = encoding.offsets[start].0;
                let to = encoding.offsets[end].1;
                let text = context.get(from..to).unwrap_or_default().to_string();
                SpanAnswer::new(text, score)
            }
            None => SpanAnswer::empty(),
        })
    }
}

impl AnswerExtractor for OnnxExtractor {
    fn extract(&self, question: &str, context: &str) -> sheetqa_core::Result<SpanAnswer> {
        Ok(self.run(question, context)?)
    }
}

fn logits_row(output: &TValue) -> Result<Vec<f32>> {
    let view = output
        .to_array_view::<f32>()
        .map_err(|e| ModelError::Shape(e.to_string()))?;
    Ok(view.iter().copied().collect())
}

/// Tokens eligible to be part of the answer span: context tokens that carry
/// attention and a non-degenerate character range. Question and special
/// tokens are excluded.
fn context_token_mask(encoding: &PairEncoding) -> Vec<bool> {
    encoding
        .sequence_ids
        .iter()
        .zip(encoding.offsets.iter())
        .zip(encoding.input.attention_mask.iter())
        .map(|((seq, offset), &mask)| *seq == Some(1) && mask == 1 && offset.1 > offset.0)
        .collect()
}

/// Pick the best (start, end) token pair.
///
/// Scores are softmax probabilities over the allowed positions; the returned
/// score is `p_start * p_end`. Pairs with `end < start` or longer than
/// `max_answer_len` tokens are skipped. Returns `None` when no position is
/// allowed.
fn best_span(
    start_logits: &[f32],
    end_logits: &[f32],
    allowed: &[bool],
    max_answer_len: usize,
) -> Option<(usize, usize, f32)> {
    let start_probs = masked_softmax(start_logits, allowed);
    let end_probs = masked_softmax(end_logits, allowed);

    let mut best: Option<(usize, usize, f32)> = None;
    for start in 0..allowed.len() {
        if !allowed[start] {
            continue;
        }
        let window_end = (start + max_answer_len).min(allowed.len());
        for end in start..window_end {
            if !allowed[end] {
                continue;
            }
            let score = start_probs[start] * end_probs[end];
            if best.map_or(true, |(_, _, s)| score > s) {
                best = Some((start, end, score));
            }
        }
    }
    best
}

/// Softmax over the allowed positions only; disallowed positions get zero
fn masked_softmax(logits: &[f32], allowed: &[bool]) -> Vec<f32> {
    let max = logits
        .iter()
        .zip(allowed.iter())
        .filter(|(_, &a)| a)
        .map(|(&l, _)| l)
        .fold(f32::NEG_INFINITY, f32::max);

    if max == f32::NEG_INFINITY {
        return vec![0.0; logits.len()];
    }

    let exps: Vec<f32> = logits
        .iter()
        .zip(allowed.iter())
        .map(|(&l, &a)| if a { (l - max).exp() } else { 0.0 })
        .collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}
