use crate::error::{Error, Result};
use std::path::PathBuf;

/// Model fetched when neither `LLAMA_FETCH_MODEL` nor `--model` is given.
pub const DEFAULT_MODEL_ID: &str = "meta-llama/Meta-Llama-3-8B-Instruct";
pub const DEFAULT_REVISION: &str = "main";
pub const DEFAULT_TOKEN_ENV: &str = "HF_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub model_id: String,
	pub revision: String,
	/// Hub cache root. `None` leaves the choice to hf-hub (`$HF_HOME/hub`).
	pub cache_dir: Option<PathBuf>,
	/// Name of the environment variable holding the access token.
	pub token_env: String,
	pub progress: bool,
}

impl Config {
	pub fn from_env() -> Self {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Builds a config from `LLAMA_FETCH_*` values. Nothing is validated here so
	/// that command-line overrides can still replace a bad value; call
	/// `validate` once every source has been applied.
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Self::default();

		if let Some(model_id) = lookup("LLAMA_FETCH_MODEL") {
			config.model_id = model_id;
		}
		if let Some(revision) = lookup("LLAMA_FETCH_REVISION") {
			config.revision = revision;
		}
		if let Some(cache_dir) = lookup("LLAMA_FETCH_CACHE_DIR") {
			config.cache_dir = Some(PathBuf::from(cache_dir));
		}

		config
	}

	/// Command-line values win over the environment.
	pub fn with_overrides(
		mut self,
		model_id: Option<String>,
		revision: Option<String>,
		cache_dir: Option<PathBuf>,
	) -> Self {
		if let Some(model_id) = model_id {
			self.model_id = model_id;
		}
		if let Some(revision) = revision {
			self.revision = revision;
		}
		if let Some(cache_dir) = cache_dir {
			self.cache_dir = Some(cache_dir);
		}
		self
	}

	/// Checks the model id looks like `name` or `owner/name`.
	pub fn validate(&self) -> Result<()> {
		let id = self.model_id.as_str();
		let invalid = || Error::InvalidModelId(id.to_string());

		if id.is_empty() || id.chars().any(char::is_whitespace) {
			return Err(invalid());
		}

		let mut parts = id.split('/');
		let well_formed = match (parts.next(), parts.next(), parts.next()) {
			(Some(name), None, _) => !name.is_empty(),
			(Some(owner), Some(name), None) => !owner.is_empty() && !name.is_empty(),
			_ => false,
		};
		if !well_formed {
			return Err(invalid());
		}

		if self.revision.trim().is_empty() {
			return Err(Error::Config("revision must not be empty".to_string()));
		}

		Ok(())
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			model_id: DEFAULT_MODEL_ID.to_string(),
			revision: DEFAULT_REVISION.to_string(),
			cache_dir: None,
			token_env: DEFAULT_TOKEN_ENV.to_string(),
			progress: true,
		}
	}
}
