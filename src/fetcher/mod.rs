use crate::credential::Credential;
use crate::error::Result;
use crate::hub::ModelHub;
use std::io::Write;

pub const TOKENIZER_DOWNLOADED: &str = "*** TOKENIZER IS DOWNLOADED ***";
pub const MODEL_DOWNLOADED: &str = "*** MODEL IS DOWNLOADED ***";

/// Pulls a tokenizer and then a causal LM for one model id.
///
/// The two loads never overlap and the model is only requested once the
/// tokenizer load has succeeded. Artifacts are dropped as soon as their
/// confirmation line is written; what remains is the hub's cache.
pub struct Fetcher<H> {
    hub: H,
    model_id: String,
    credential: Credential,
}

impl<H: ModelHub> Fetcher<H> {
    pub fn new(hub: H, model_id: impl Into<String>, credential: Credential) -> Self {
        Self {
            hub,
            model_id: model_id.into(),
            credential,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Downloading tokenizer and model: {}", self.model_id)?;
        out.flush()?;

        let tokenizer = self.hub.load_tokenizer(&self.model_id, &self.credential)?;
        drop(tokenizer);
        writeln!(out, "{}", TOKENIZER_DOWNLOADED)?;
        out.flush()?;

        let model = self.hub.load_causal_lm(&self.model_id, &self.credential)?;
        drop(model);
        writeln!(out, "{}", MODEL_DOWNLOADED)?;
        out.flush()?;

        tracing::info!("Model '{}' is cached and ready", self.model_id);

        Ok(())
    }
}
