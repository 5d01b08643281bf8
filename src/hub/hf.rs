use crate::config::Config;
use crate::credential::Credential;
use crate::error::{Artifact, Error, Result};
use crate::hub::artifact::{ModelArtifact, ModelConfig, TokenizerArtifact};
use crate::hub::files::{self, WeightFormat, WeightLayout};
use crate::hub::ModelHub;
use hf_hub::api::sync::{ApiBuilder, ApiError, ApiRepo};
use hf_hub::{Repo, RepoType};
use std::path::{Path, PathBuf};

/// `ModelHub` backed by the Hugging Face hub through `hf_hub::api::sync`.
pub struct HfHub {
    revision: String,
    cache_dir: Option<PathBuf>,
    progress: bool,
}

impl HfHub {
    pub fn new(config: &Config) -> Self {
        Self {
            revision: config.revision.clone(),
            cache_dir: config.cache_dir.clone(),
            progress: config.progress,
        }
    }

    fn repo(&self, model_id: &str, credential: &Credential, artifact: Artifact) -> Result<ApiRepo> {
        let mut builder = ApiBuilder::new()
            .with_token(Some(credential.expose().to_string()))
            .with_progress(self.progress);
        if let Some(cache_dir) = &self.cache_dir {
            builder = builder.with_cache_dir(cache_dir.clone());
        }

        let api = builder
            .build()
            .map_err(|e| hub_error(artifact, model_id, e))?;

        Ok(api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            self.revision.clone(),
        )))
    }

    fn list_files(repo: &ApiRepo, model_id: &str, artifact: Artifact) -> Result<Vec<String>> {
        let info = repo.info().map_err(|e| hub_error(artifact, model_id, e))?;
        let siblings: Vec<String> = info.siblings.into_iter().map(|s| s.rfilename).collect();
        tracing::debug!("{} lists {} files at {}", model_id, siblings.len(), info.sha);
        Ok(siblings)
    }

    fn fetch(repo: &ApiRepo, file: &str, model_id: &str, artifact: Artifact) -> Result<PathBuf> {
        tracing::info!("Fetching {} from {}", file, model_id);
        let path = repo.get(file).map_err(|e| hub_error(artifact, model_id, e))?;
        tracing::debug!("{} cached at {:?}", file, path);
        Ok(path)
    }

    fn fetch_weights(
        repo: &ApiRepo,
        layout: &WeightLayout,
        model_id: &str,
    ) -> Result<Vec<PathBuf>> {
        let artifact = Artifact::Model;
        match layout {
            WeightLayout::Single { file, .. } => Ok(vec![Self::fetch(repo, file, model_id, artifact)?]),
            WeightLayout::Sharded { index, .. } => {
                let index_path = Self::fetch(repo, index, model_id, artifact)?;
                let shards = files::shard_files(&std::fs::read_to_string(&index_path)?)?;
                if shards.is_empty() {
                    return Err(Error::ModelLoad(format!("{} lists no shard files", index)));
                }

                tracing::info!("Weights are split across {} shards", shards.len());
                shards
                    .iter()
                    .map(|shard| Self::fetch(repo, shard, model_id, artifact))
                    .collect()
            }
        }
    }
}

impl ModelHub for HfHub {
    type Tokenizer = TokenizerArtifact;
    type Model = ModelArtifact;

    fn load_tokenizer(&self, model_id: &str, credential: &Credential) -> Result<TokenizerArtifact> {
        let artifact = Artifact::Tokenizer;
        let repo = self.repo(model_id, credential, artifact)?;

        let siblings = Self::list_files(&repo, model_id, artifact)?;
        let wanted = files::required_tokenizer_files(&siblings, model_id)?;

        let mut paths = Vec::with_capacity(wanted.len());
        for file in &wanted {
            paths.push(Self::fetch(&repo, file, model_id, artifact)?);
        }

        let tokenizer_path = paths
            .iter()
            .find(|p| p.file_name().is_some_and(|n| n == files::TOKENIZER_JSON))
            .cloned()
            .ok_or_else(|| Error::TokenizerLoad("tokenizer.json was not downloaded".to_string()))?;

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::TokenizerLoad(e.to_string()))?;

        let loaded = TokenizerArtifact {
            snapshot_dir: snapshot_dir(&tokenizer_path)?,
            files: paths,
            tokenizer,
        };

        tracing::info!(
            "Tokenizer ready in {:?}: {} files, vocabulary of {}",
            loaded.snapshot_dir,
            loaded.files.len(),
            loaded.vocab_size()
        );

        Ok(loaded)
    }

    fn load_causal_lm(&self, model_id: &str, credential: &Credential) -> Result<ModelArtifact> {
        let artifact = Artifact::Model;
        let repo = self.repo(model_id, credential, artifact)?;
        let siblings = Self::list_files(&repo, model_id, artifact)?;

        let layout = files::required_model_layout(&siblings, model_id)?;

        let config_path = Self::fetch(&repo, files::CONFIG_JSON, model_id, artifact)?;
        let config = ModelConfig::from_json(&std::fs::read_to_string(&config_path)?)?;

        if siblings.iter().any(|s| s == files::GENERATION_CONFIG_JSON) {
            Self::fetch(&repo, files::GENERATION_CONFIG_JSON, model_id, artifact)?;
        }

        if !config.is_causal_lm() {
            tracing::warn!(
                "{} declares architectures {:?}, none of which is a causal LM",
                model_id,
                config.architectures
            );
        }

        tracing::debug!("Selected weight layout {:?}", layout);

        let weight_files = Self::fetch_weights(&repo, &layout, model_id)?;
        let tensor_count = count_tensors(layout.format(), &weight_files)?;

        let loaded = ModelArtifact {
            snapshot_dir: snapshot_dir(&config_path)?,
            config,
            layout,
            weight_files,
            tensor_count,
        };

        tracing::info!(
            "Model ready in {:?}: type {}, {} layers, hidden size {}, vocabulary {}, dtype {}",
            loaded.snapshot_dir,
            loaded.config.model_type.as_deref().unwrap_or("unknown"),
            describe(loaded.config.num_hidden_layers),
            describe(loaded.config.hidden_size),
            describe(loaded.config.vocab_size),
            loaded.config.torch_dtype.as_deref().unwrap_or("unknown"),
        );
        tracing::info!(
            "{} tensors across {} {:?} files",
            loaded.tensor_count,
            loaded.weight_files.len(),
            loaded.layout.format()
        );

        Ok(loaded)
    }
}

fn describe(value: Option<usize>) -> String {
    value.map_or_else(|| "?".to_string(), |n| n.to_string())
}

fn hub_error(artifact: Artifact, model_id: &str, source: ApiError) -> Error {
    Error::Hub {
        artifact,
        model_id: model_id.to_string(),
        source,
    }
}

fn snapshot_dir(file: &Path) -> Result<PathBuf> {
    file.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::ModelLoad(format!("Invalid cache path: {:?}", file)))
}

/// Opens the weights far enough to enumerate their tensors.
fn count_tensors(format: WeightFormat, weight_files: &[PathBuf]) -> Result<usize> {
    match format {
        WeightFormat::SafeTensors => {
            // The cache files are not modified while mapped.
            let tensors = unsafe {
                candle_core::safetensors::MmapedSafetensors::multi(weight_files)
                    .map_err(|e| Error::ModelLoad(format!("Failed to map safetensors: {}", e)))?
            };
            Ok(tensors.tensors().len())
        }
        WeightFormat::PyTorch => {
            let mut count = 0;
            for file in weight_files {
                let infos = candle_core::pickle::read_pth_tensor_info(file, false, None)
                    .map_err(|e| {
                        Error::ModelLoad(format!("Failed to read PyTorch file {:?}: {}", file, e))
                    })?;
                count += infos.len();
            }
            Ok(count)
        }
    }
}
