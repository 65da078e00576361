use crate::error::{ModelError, Result};
use tokenizers::Tokenizer;

/// Tokenizer wrapper for BERT-style models
pub struct TextTokenizer {
    tokenizer: Tokenizer,
    max_length: usize,
}

/// Tokenized input ready for model inference
#[derive(Debug, Clone)]
pub struct TokenizedInput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub token_type_ids: Vec<i64>,
}

impl TokenizedInput {
    #[inline]
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }
}

/// Tokenized question+context pair with the alignment data needed to map a
/// predicted token span back to a character span of the context.
#[derive(Debug, Clone)]
pub struct PairEncoding {
    pub input: TokenizedInput,
    /// Byte offsets of each token within its originating string
    pub offsets: Vec<(usize, usize)>,
    /// `Some(0)` for question tokens, `Some(1)` for context tokens,
    /// `None` for special tokens
    pub sequence_ids: Vec<Option<usize>>,
}

impl TextTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file
    pub fn from_file(path: &std::path::Path, max_length: usize) -> Result<Self> {
        let tokenizer =
            Tokenizer::from_file(path).map_err(|e| ModelError::Tokenizer(e.to_string()))?;

        Ok(Self {
            tokenizer,
            max_length,
        })
    }

    /// Tokenize a single text
    pub fn encode(&self, text: &str) -> Result<TokenizedInput> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ModelError::Tokenizer(e.to_string()))?;

        let mut input = TokenizedInput {
            input_ids: encoding.get_ids().iter().map(|&id| id as i64).collect(),
            attention_mask: encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect(),
            token_type_ids: encoding.get_type_ids().iter().map(|&id| id as i64).collect(),
        };
        truncate_input(&mut input, self.max_length);
        Ok(input)
    }

    /// Tokenize a (question, context) pair for extractive QA
    pub fn encode_pair(&self, question: &str, context: &str) -> Result<PairEncoding> {
        let encoding = self
            .tokenizer
            .encode((question, context), true)
            .map_err(|e| ModelError::Tokenizer(e.to_string()))?;

        let mut input = TokenizedInput {
            input_ids: encoding.get_ids().iter().map(|&id| id as i64).collect(),
            attention_mask: encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect(),
            token_type_ids: encoding.get_type_ids().iter().map(|&id| id as i64).collect(),
        };
        let mut offsets: Vec<(usize, usize)> = encoding.get_offsets().to_vec();
        let mut sequence_ids: Vec<Option<usize>> = encoding.get_sequence_ids();

        // All parallel arrays are truncated together so token positions
        // stay aligned with offsets and sequence ids.
        truncate_input(&mut input, self.max_length);
        offsets.truncate(self.max_length);
        sequence_ids.truncate(self.max_length);

        Ok(PairEncoding {
            input,
            offsets,
            sequence_ids,
        })
    }

    /// Tokenize a batch of texts
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<TokenizedInput>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

/// Pad a batch to uniform length, returning the padded inputs and the
/// common sequence length
pub fn pad_batch(inputs: Vec<TokenizedInput>) -> (Vec<TokenizedInput>, usize) {
    if inputs.is_empty() {
        return (inputs, 0);
    }

    let max_len = inputs.iter().map(|i| i.len()).max().unwrap_or(0);

    let padded: Vec<TokenizedInput> = inputs
        .into_iter()
        .map(|mut input| {
            let pad_len = max_len - input.len();
            if pad_len > 0 {
                input.input_ids.extend(vec![0i64; pad_len]);
                input.attention_mask.extend(vec![0i64; pad_len]);
                input.token_type_ids.extend(vec![0i64; pad_len]);
            }
            input
        })
        .collect();

    (padded, max_len)
}

fn truncate_input(input: &mut TokenizedInput, max_length: usize) {
    if input.input_ids.len() > max_length {
        input.input_ids.truncate(max_length);
        input.attention_mask.truncate(max_length);
        input.token_type_ids.truncate(max_length);
    }
}
