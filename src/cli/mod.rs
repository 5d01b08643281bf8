use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "llama-fetch")]
#[command(version, about = "Prefetch a gated causal LM and its tokenizer into the Hugging Face cache", long_about = None)]
pub struct Cli {
	/// HuggingFace model repository ID [default: meta-llama/Meta-Llama-3-8B-Instruct]
	#[arg(long, global = true)]
	pub model: Option<String>,

	/// Branch, tag or commit to fetch [default: main]
	#[arg(long, global = true)]
	pub revision: Option<String>,

	/// Hub cache directory (defaults to $HF_HOME/hub)
	#[arg(long, global = true)]
	pub cache_dir: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
	/// Download the tokenizer, then the model weights (the default)
	Fetch {
		/// Access token; read from HF_TOKEN when omitted
		#[arg(long)]
		token: Option<String>,

		/// Hide download progress bars
		#[arg(long)]
		no_progress: bool,
	},

	/// Show what the local cache already holds, without network access
	Status,
}

impl Default for Commands {
	fn default() -> Self {
		Commands::Fetch {
			token: None,
			no_progress: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_no_arguments_means_default_fetch() {
		let cli = Cli::try_parse_from(["llama-fetch"]).unwrap();
		assert!(cli.model.is_none());
		assert_eq!(cli.command.unwrap_or_default(), Commands::default());
	}

	#[test]
	fn test_fetch_with_overrides() {
		let cli = Cli::try_parse_from([
			"llama-fetch",
			"fetch",
			"--model",
			"gpt2",
			"--token",
			"tok_abc123",
			"--no-progress",
		])
		.unwrap();

		assert_eq!(cli.model.as_deref(), Some("gpt2"));
		assert_eq!(
			cli.command,
			Some(Commands::Fetch {
				token: Some("tok_abc123".to_string()),
				no_progress: true,
			})
		);
	}

	#[test]
	fn test_status_with_cache_dir() {
		let cli = Cli::try_parse_from(["llama-fetch", "--cache-dir", "/tmp/hub", "status"]).unwrap();
		assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/hub")));
		assert_eq!(cli.command, Some(Commands::Status));
	}

	#[test]
	fn test_status_rejects_token() {
		assert!(Cli::try_parse_from(["llama-fetch", "status", "--token", "x"]).is_err());
	}
}
