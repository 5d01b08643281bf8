use hf_hub::api::sync::ApiError;
use std::fmt;

/// Which of the two downloads an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
	Tokenizer,
	Model,
}

impl fmt::Display for Artifact {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Artifact::Tokenizer => write!(f, "tokenizer"),
			Artifact::Model => write!(f, "model"),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Missing credential: {0} is not set or empty")]
	MissingCredential(String),

	#[error("Invalid model id: {0:?}")]
	InvalidModelId(String),

	#[error("Configuration error: {0}")]
	Config(String),

	#[error("Failed to download {artifact} for {model_id}: {source}")]
	Hub {
		artifact: Artifact,
		model_id: String,
		#[source]
		source: ApiError,
	},

	#[error("{file} not found in repository {model_id}")]
	MissingFile { file: String, model_id: String },

	#[error("Failed to load tokenizer: {0}")]
	TokenizerLoad(String),

	#[error("Failed to load model: {0}")]
	ModelLoad(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
