use crate::error::{Error, Result};
use std::fmt;

/// Access token handed to the model hub. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
	/// Wraps an explicit token. Unlike a plain environment read, a blank token
	/// counts as missing. `source` names where it came from for the error message.
	pub fn new(token: impl Into<String>, source: &str) -> Result<Self> {
		let token = token.into();
		if token.trim().is_empty() {
			return Err(Error::MissingCredential(source.to_string()));
		}
		Ok(Self(token))
	}

	/// An explicit `--token` wins; otherwise the token is read from `var`.
	pub fn resolve(token: Option<String>, var: &str) -> Result<Self> {
		Self::resolve_with(token, var, |name| std::env::var(name).ok())
	}

	pub fn resolve_with<F>(token: Option<String>, var: &str, lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		match token {
			Some(token) => Self::new(token, "--token"),
			None => Self::from_lookup(var, lookup),
		}
	}

	pub fn from_lookup<F>(var: &str, lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let token = lookup(var).ok_or_else(|| Error::MissingCredential(var.to_string()))?;
		Self::new(token, var)
	}

	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for Credential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Credential(***)")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unset_variable_is_missing_credential() {
		let err = Credential::from_lookup("HF_TOKEN", |_| None).unwrap_err();
		assert!(matches!(err, Error::MissingCredential(ref var) if var == "HF_TOKEN"));
		assert_eq!(
			err.to_string(),
			"Missing credential: HF_TOKEN is not set or empty"
		);
	}

	#[test]
	fn test_blank_variable_is_missing_credential() {
		let err = Credential::from_lookup("HF_TOKEN", |_| Some("  ".to_string())).unwrap_err();
		assert!(matches!(err, Error::MissingCredential(_)));
	}

	#[test]
	fn test_lookup_reads_named_variable() {
		let cred = Credential::from_lookup("MY_TOKEN", |name| {
			(name == "MY_TOKEN").then(|| "tok_abc123".to_string())
		})
		.unwrap();
		assert_eq!(cred.expose(), "tok_abc123");
	}

	#[test]
	fn test_explicit_token_wins_over_environment() {
		let cred = Credential::resolve_with(Some("tok_flag".to_string()), "HF_TOKEN", |_| {
			Some("tok_env".to_string())
		})
		.unwrap();
		assert_eq!(cred.expose(), "tok_flag");
	}

	#[test]
	fn test_blank_flag_token_rejected_without_env_fallback() {
		let err = Credential::resolve_with(Some(String::new()), "HF_TOKEN", |_| {
			Some("tok_env".to_string())
		})
		.unwrap_err();
		assert!(matches!(err, Error::MissingCredential(ref source) if source == "--token"));
	}

	#[test]
	fn test_resolve_falls_back_to_configured_variable() {
		let cred = Credential::resolve_with(None, "MY_TOKEN", |name| {
			(name == "MY_TOKEN").then(|| "tok_abc123".to_string())
		})
		.unwrap();
		assert_eq!(cred.expose(), "tok_abc123");

		let err = Credential::resolve_with(None, "HF_TOKEN", |_| None).unwrap_err();
		assert!(matches!(err, Error::MissingCredential(ref var) if var == "HF_TOKEN"));
	}

	#[test]
	fn test_debug_redacts_token() {
		let cred = Credential::new("tok_abc123", "--token").unwrap();
		let shown = format!("{:?}", cred);
		assert!(!shown.contains("tok_abc123"));
	}
}
