use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use aibackend_core::error::{BackendError, BackendResult};
use aibackend_core::{Backend, Embedding, EmbeddingBackend, EmbeddingConfig, Embeddings};

/// Deterministic feature-hashing embeddings.
///
/// Every whitespace token is hashed into one of `embedding_output_dimensions`
/// buckets and the result is L2-normalised, so identical inputs always map to
/// identical vectors and texts sharing words have positive similarity. Text
/// with no tokens maps to the zero vector.
#[derive(Debug, Clone)]
pub struct HashEmbeddingBackend {
    config: EmbeddingConfig,
}

impl HashEmbeddingBackend {
    fn embed_one(&self, text: &str) -> BackendResult<Embedding> {
        let dim = self.embedding_output_dimensions();
        if dim == 0 {
            return Err(BackendError::InvalidInput("embedding_output_dimensions is 0".to_string()));
        }
        let mut v = vec![0f32; dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            #[allow(clippy::cast_possible_truncation)]
            let idx = (h % dim as u64) as usize;
            #[allow(clippy::cast_precision_loss)]
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            #[allow(clippy::cast_precision_loss)]
            let position = (i % 3) as f32 * 0.01;
            v[idx] += val + position;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }
}

impl Backend for HashEmbeddingBackend {
    type Config = EmbeddingConfig;

    fn from_config(config: EmbeddingConfig) -> Self { Self { config } }

    fn config(&self) -> &EmbeddingConfig { &self.config }
}

impl EmbeddingBackend for HashEmbeddingBackend {
    fn embed<'a>(&'a self, inputs: Vec<String>) -> Embeddings<'a> {
        Box::new(inputs.into_iter().map(move |text| self.embed_one(&text)))
    }
}
