//! Which repository files make up a tokenizer and which make up the weights.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

pub const TOKENIZER_JSON: &str = "tokenizer.json";
pub const CONFIG_JSON: &str = "config.json";
pub const GENERATION_CONFIG_JSON: &str = "generation_config.json";

const SAFETENSORS_INDEX: &str = "model.safetensors.index.json";
const SAFETENSORS_SINGLE: &str = "model.safetensors";
const PYTORCH_INDEX: &str = "pytorch_model.bin.index.json";
const PYTORCH_SINGLE: &str = "pytorch_model.bin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightFormat {
    SafeTensors,
    PyTorch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightLayout {
    /// One weight file holding every tensor.
    Single { format: WeightFormat, file: String },
    /// An index json whose `weight_map` names the shard files.
    Sharded { format: WeightFormat, index: String },
}

impl WeightLayout {
    pub fn format(&self) -> WeightFormat {
        match self {
            WeightLayout::Single { format, .. } | WeightLayout::Sharded { format, .. } => *format,
        }
    }
}

#[derive(Deserialize)]
struct ShardIndex {
    weight_map: BTreeMap<String, String>,
}

// Subfolders such as `original/` carry alternate checkpoints we never load.
fn is_top_level(filename: &str) -> bool {
    !filename.contains('/')
}

fn is_chat_template_file(filename: &str) -> bool {
    filename.ends_with(".jinja") || filename == "chat_template.json"
}

pub fn is_tokenizer_file(filename: &str) -> bool {
    is_top_level(filename)
        && (filename == TOKENIZER_JSON
            || filename == "tokenizer_config.json"
            || filename == "special_tokens_map.json"
            || filename == "added_tokens.json"
            || filename == "vocab.json"
            || filename == "vocab.txt"
            || filename == "merges.txt"
            || filename.ends_with(".model")
            || filename.ends_with(".tiktoken")
            || is_chat_template_file(filename))
}

/// Tokenizer files listed in the repository, in listing order.
pub fn tokenizer_files(siblings: &[String]) -> Vec<String> {
    siblings
        .iter()
        .filter(|name| is_tokenizer_file(name))
        .cloned()
        .collect()
}

/// Picks the weight layout, preferring safetensors and sharded checkpoints.
pub fn weight_layout(siblings: &[String]) -> Option<WeightLayout> {
    let has = |name: &str| siblings.iter().any(|s| s == name);

    if has(SAFETENSORS_INDEX) {
        Some(WeightLayout::Sharded {
            format: WeightFormat::SafeTensors,
            index: SAFETENSORS_INDEX.to_string(),
        })
    } else if has(SAFETENSORS_SINGLE) {
        Some(WeightLayout::Single {
            format: WeightFormat::SafeTensors,
            file: SAFETENSORS_SINGLE.to_string(),
        })
    } else if has(PYTORCH_INDEX) {
        Some(WeightLayout::Sharded {
            format: WeightFormat::PyTorch,
            index: PYTORCH_INDEX.to_string(),
        })
    } else if has(PYTORCH_SINGLE) {
        Some(WeightLayout::Single {
            format: WeightFormat::PyTorch,
            file: PYTORCH_SINGLE.to_string(),
        })
    } else {
        None
    }
}

fn missing(file: &str, model_id: &str) -> Error {
    Error::MissingFile {
        file: file.to_string(),
        model_id: model_id.to_string(),
    }
}

/// Tokenizer files to download; the listing must include `tokenizer.json`.
pub fn required_tokenizer_files(siblings: &[String], model_id: &str) -> Result<Vec<String>> {
    let wanted = tokenizer_files(siblings);
    if !wanted.iter().any(|f| f == TOKENIZER_JSON) {
        return Err(missing(TOKENIZER_JSON, model_id));
    }
    Ok(wanted)
}

/// Weight layout for a causal LM; the listing must include `config.json` and
/// at least one known weight layout.
pub fn required_model_layout(siblings: &[String], model_id: &str) -> Result<WeightLayout> {
    if !siblings.iter().any(|s| s == CONFIG_JSON) {
        return Err(missing(CONFIG_JSON, model_id));
    }
    weight_layout(siblings).ok_or_else(|| missing(SAFETENSORS_SINGLE, model_id))
}

/// Every layout `weight_layout` understands, in preference order.
pub fn known_layouts() -> [WeightLayout; 4] {
    [
        WeightLayout::Sharded {
            format: WeightFormat::SafeTensors,
            index: SAFETENSORS_INDEX.to_string(),
        },
        WeightLayout::Single {
            format: WeightFormat::SafeTensors,
            file: SAFETENSORS_SINGLE.to_string(),
        },
        WeightLayout::Sharded {
            format: WeightFormat::PyTorch,
            index: PYTORCH_INDEX.to_string(),
        },
        WeightLayout::Single {
            format: WeightFormat::PyTorch,
            file: PYTORCH_SINGLE.to_string(),
        },
    ]
}

/// Shard file names referenced by an index json, deduplicated and sorted.
pub fn shard_files(index_json: &str) -> Result<Vec<String>> {
    let index: ShardIndex = serde_json::from_str(index_json)?;
    let shards: BTreeSet<String> = index.weight_map.into_values().collect();
    Ok(shards.into_iter().collect())
}
