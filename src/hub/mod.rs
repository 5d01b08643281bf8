pub mod artifact;
pub mod cache;
pub mod files;
pub mod hf;

pub use cache::{cache_status, CacheStatus, WeightStatus};
pub use hf::HfHub;

use crate::credential::Credential;
use crate::error::Result;

/// A source of pretrained tokenizers and causal language models.
///
/// Implementations own transfer, authentication and caching. Callers only
/// supply the repository id and a credential.
pub trait ModelHub {
    type Tokenizer;
    type Model;

    fn load_tokenizer(&self, model_id: &str, credential: &Credential) -> Result<Self::Tokenizer>;

    fn load_causal_lm(&self, model_id: &str, credential: &Credential) -> Result<Self::Model>;
}
