//! Offline view of what the hub cache already holds for a model.

use crate::config::Config;
use crate::error::Result;
use crate::hub::files::{self, WeightLayout};
use hf_hub::{Cache, CacheRepo, Repo, RepoType};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightStatus {
    Missing,
    Partial {
        layout: WeightLayout,
        cached: usize,
        total: usize,
    },
    Complete {
        layout: WeightLayout,
        files: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub model_id: String,
    pub revision: String,
    pub snapshot_dir: Option<PathBuf>,
    pub tokenizer: bool,
    pub config: bool,
    pub weights: WeightStatus,
}

impl CacheStatus {
    pub fn is_complete(&self) -> bool {
        self.tokenizer && self.config && matches!(self.weights, WeightStatus::Complete { .. })
    }
}

pub fn cache_status(config: &Config) -> Result<CacheStatus> {
    let cache = match &config.cache_dir {
        Some(dir) => Cache::new(dir.clone()),
        None => Cache::default(),
    };
    let repo = cache.repo(Repo::with_revision(
        config.model_id.clone(),
        RepoType::Model,
        config.revision.clone(),
    ));

    let tokenizer = repo.get(files::TOKENIZER_JSON);
    let model_config = repo.get(files::CONFIG_JSON);
    let snapshot_dir = tokenizer
        .as_ref()
        .or(model_config.as_ref())
        .and_then(|path| path.parent())
        .map(|dir| dir.to_path_buf());

    Ok(CacheStatus {
        model_id: config.model_id.clone(),
        revision: config.revision.clone(),
        snapshot_dir,
        tokenizer: tokenizer.is_some(),
        config: model_config.is_some(),
        weights: weight_status(&repo)?,
    })
}

fn weight_status(repo: &CacheRepo) -> Result<WeightStatus> {
    for layout in files::known_layouts() {
        match &layout {
            WeightLayout::Single { file, .. } => {
                if repo.get(file).is_some() {
                    return Ok(WeightStatus::Complete { layout, files: 1 });
                }
            }
            WeightLayout::Sharded { index, .. } => {
                let Some(index_path) = repo.get(index) else {
                    continue;
                };
                let shards = files::shard_files(&std::fs::read_to_string(&index_path)?)?;
                let cached = shards.iter().filter(|s| repo.get(s).is_some()).count();
                let total = shards.len();

                return Ok(if cached == total && total > 0 {
                    WeightStatus::Complete {
                        layout,
                        files: total,
                    }
                } else {
                    WeightStatus::Partial {
                        layout,
                        cached,
                        total,
                    }
                });
            }
        }
    }

    Ok(WeightStatus::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::files::WeightFormat;
    use std::fs;
    use std::path::Path;

    const COMMIT: &str = "e1945c40cd546c78e41f1151f4db032b271faeaa";

    // Lays out `<cache>/models--owner--name/{refs/main, snapshots/<commit>/...}`.
    fn seed_cache(root: &Path, model_id: &str, files: &[(&str, &str)]) {
        let repo_dir = root.join(format!("models--{}", model_id.replace('/', "--")));
        fs::create_dir_all(repo_dir.join("refs")).unwrap();
        fs::write(repo_dir.join("refs").join("main"), COMMIT).unwrap();

        let snapshot = repo_dir.join("snapshots").join(COMMIT);
        for (name, content) in files {
            let path = snapshot.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }

    fn config_for(root: &Path, model_id: &str) -> Config {
        Config {
            model_id: model_id.to_string(),
            cache_dir: Some(root.to_path_buf()),
            ..Config::default()
        }
    }

    const INDEX: &str = r#"{"weight_map": {
        "a": "model-00001-of-00002.safetensors",
        "b": "model-00002-of-00002.safetensors"
    }}"#;

    #[test]
    fn test_empty_cache_reports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let status = cache_status(&config_for(dir.path(), "meta-llama/Meta-Llama-3-8B-Instruct")).unwrap();

        assert!(!status.tokenizer);
        assert!(!status.config);
        assert_eq!(status.weights, WeightStatus::Missing);
        assert!(status.snapshot_dir.is_none());
        assert!(!status.is_complete());
    }

    #[test]
    fn test_complete_sharded_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let model_id = "meta-llama/Meta-Llama-3-8B-Instruct";
        seed_cache(
            dir.path(),
            model_id,
            &[
                ("tokenizer.json", "{}"),
                ("config.json", "{}"),
                ("model.safetensors.index.json", INDEX),
                ("model-00001-of-00002.safetensors", ""),
                ("model-00002-of-00002.safetensors", ""),
            ],
        );

        let status = cache_status(&config_for(dir.path(), model_id)).unwrap();

        assert!(status.is_complete());
        assert_eq!(
            status.weights,
            WeightStatus::Complete {
                layout: WeightLayout::Sharded {
                    format: WeightFormat::SafeTensors,
                    index: "model.safetensors.index.json".to_string(),
                },
                files: 2,
            }
        );
        assert!(status.snapshot_dir.unwrap().ends_with(COMMIT));
    }

    #[test]
    fn test_partial_shards_after_interrupted_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let model_id = "meta-llama/Meta-Llama-3-8B-Instruct";
        seed_cache(
            dir.path(),
            model_id,
            &[
                ("tokenizer.json", "{}"),
                ("model.safetensors.index.json", INDEX),
                ("model-00001-of-00002.safetensors", ""),
            ],
        );

        let status = cache_status(&config_for(dir.path(), model_id)).unwrap();

        assert!(status.tokenizer);
        assert!(!status.config);
        assert!(matches!(
            status.weights,
            WeightStatus::Partial {
                cached: 1,
                total: 2,
                ..
            }
        ));
        assert!(!status.is_complete());
    }

    #[test]
    fn test_single_pytorch_file() {
        let dir = tempfile::tempdir().unwrap();
        seed_cache(
            dir.path(),
            "gpt2",
            &[("config.json", "{}"), ("pytorch_model.bin", "")],
        );

        let status = cache_status(&config_for(dir.path(), "gpt2")).unwrap();

        assert!(matches!(
            status.weights,
            WeightStatus::Complete {
                layout: WeightLayout::Single {
                    format: WeightFormat::PyTorch,
                    ..
                },
                files: 1,
            }
        ));
    }

    #[test]
    fn test_other_revision_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        seed_cache(dir.path(), "gpt2", &[("tokenizer.json", "{}")]);

        let config = Config {
            revision: "v2".to_string(),
            ..config_for(dir.path(), "gpt2")
        };
        let status = cache_status(&config).unwrap();
        assert!(!status.tokenizer);
    }
}
