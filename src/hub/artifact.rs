use crate::error::Result;
use crate::hub::files::WeightLayout;
use serde_json::Value;
use std::path::PathBuf;

/// Tokenizer files from one repository snapshot, plus the parsed `tokenizer.json`.
pub struct TokenizerArtifact {
    pub snapshot_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub tokenizer: tokenizers::Tokenizer,
}

impl TokenizerArtifact {
    pub fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }
}

/// The subset of `config.json` we report on. Key names differ between
/// model families, so each field probes its known spellings.
#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    pub model_type: Option<String>,
    pub architectures: Vec<String>,
    pub hidden_size: Option<usize>,
    pub num_hidden_layers: Option<usize>,
    pub vocab_size: Option<usize>,
    pub torch_dtype: Option<String>,
}

impl ModelConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Value = serde_json::from_str(content)?;

        let string = |key: &str| config.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| config.get(*key))
                .and_then(Value::as_u64)
                .map(|n| n as usize)
        };

        let architectures: Vec<String> = config
            .get("architectures")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            model_type: string("model_type"),
            architectures,
            hidden_size: number(&["hidden_size", "n_embd", "d_model"]),
            num_hidden_layers: number(&["num_hidden_layers", "n_layer", "num_layers"]),
            vocab_size: number(&["vocab_size"]),
            torch_dtype: string("torch_dtype"),
        })
    }

    pub fn is_causal_lm(&self) -> bool {
        self.architectures
            .iter()
            .any(|arch| arch.ends_with("ForCausalLM") || arch.ends_with("LMHeadModel"))
    }
}

#[derive(Debug)]
pub struct ModelArtifact {
    pub snapshot_dir: PathBuf,
    pub config: ModelConfig,
    pub layout: WeightLayout,
    pub weight_files: Vec<PathBuf>,
    pub tensor_count: usize,
}
