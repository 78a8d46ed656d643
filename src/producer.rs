//! Batch encryption into an output directory.
//!
//! Each existing input becomes `<basename>.enc`. Missing inputs are skipped
//! with a warning and per-file failures are logged; only an empty batch is
//! fatal. Files are sealed concurrently and reported in input order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use hashbrown::HashSet;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::{FILE_EXTENSION, MANIFEST_FILE, SENTINEL_FILE};
use crate::manifest::Manifest;
use crate::processor::Processor;
use crate::secret::Password;
use crate::types::FileOutcome;
use crate::verify::create_sentinel;

/// Name of the container written for `input`.
pub fn output_name(input: &Path) -> Option<String> {
    input.file_name().map(|name| {
        let mut name = name.to_string_lossy().into_owned();
        name.push_str(FILE_EXTENSION);
        name
    })
}

pub struct Producer {
    password: Password,
    out_dir: PathBuf,
    with_check: bool,
}

impl Producer {
    /// # Errors
    ///
    /// Fails if the password is empty.
    pub fn new(password: Password, out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        ensure!(!password.is_empty(), "password cannot be empty");
        ensure!(!out_dir.as_os_str().is_empty(), "output directory cannot be empty");
        Ok(Self { password, out_dir, with_check: false })
    }

    /// Also write the sentinel container used for password verification.
    #[must_use]
    pub const fn with_check(mut self, with_check: bool) -> Self {
        self.with_check = with_check;
        self
    }

    /// Encrypts `inputs` into the output directory and writes the manifest.
    ///
    /// # Errors
    ///
    /// Fails if the output directory cannot be created, if none of the
    /// inputs exist, or if the sentinel or manifest cannot be written.
    /// Individual file failures are returned as [`FileOutcome::Failed`].
    pub async fn run(&self, inputs: &[PathBuf]) -> Result<Vec<FileOutcome>> {
        let mut outcomes: Vec<Option<FileOutcome>> = Vec::with_capacity(inputs.len());
        let mut seen = HashSet::new();
        let mut pending = Vec::new();

        for (index, input) in inputs.iter().enumerate() {
            outcomes.push(None);

            if !input.is_file() {
                warn!("missing file: {}", input.display());
                outcomes[index] = Some(FileOutcome::Skipped(input.clone()));
                continue;
            }

            let Some(name) = output_name(input) else {
                warn!("no file name: {}", input.display());
                outcomes[index] = Some(FileOutcome::Skipped(input.clone()));
                continue;
            };

            if !seen.insert(name.clone()) {
                warn!("duplicate output name {name}, skipping {}", input.display());
                outcomes[index] = Some(FileOutcome::Skipped(input.clone()));
                continue;
            }

            pending.push((index, input.clone(), self.out_dir.join(name)));
        }

        if pending.is_empty() {
            bail!("no input files found");
        }

        // Must exist before any task writes into it.
        tokio::fs::create_dir_all(&self.out_dir).await.with_context(|| format!("failed to create directory: {}", self.out_dir.display()))?;

        let mut tasks = JoinSet::new();
        for (index, input, output) in pending {
            let processor = Processor::new(self.password.clone());
            tasks.spawn(async move {
                let result = encrypt_file(&processor, &input, &output).await;
                (index, input, output, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (index, input, output, result) = joined.context("encryption task panicked")?;
            outcomes[index] = Some(match result {
                Ok(()) => {
                    info!("encrypted -> {}", output.display());
                    FileOutcome::Written(output)
                }
                Err(e) => {
                    warn!("failed to encrypt {}: {e:#}", input.display());
                    FileOutcome::Failed(input, format!("{e:#}"))
                }
            });
        }

        let outcomes: Vec<FileOutcome> = outcomes.into_iter().flatten().collect();

        if self.with_check {
            self.write_sentinel().await?;
        }
        self.write_manifest(&outcomes).await?;

        Ok(outcomes)
    }

    async fn write_sentinel(&self) -> Result<()> {
        let password = self.password.clone();
        let bytes = tokio::task::spawn_blocking(move || create_sentinel(&password)).await.context("sentinel task panicked")??;

        let path = self.out_dir.join(SENTINEL_FILE);
        tokio::fs::write(&path, bytes).await.with_context(|| format!("failed to write {}", path.display()))?;
        info!("encrypted -> {}", path.display());
        Ok(())
    }

    async fn write_manifest(&self, outcomes: &[FileOutcome]) -> Result<()> {
        let files = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                FileOutcome::Written(path) => path.file_name().map(|name| name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let path = self.out_dir.join(MANIFEST_FILE);
        tokio::fs::write(&path, Manifest::new(files).to_bytes()?).await.with_context(|| format!("failed to write {}", path.display()))
    }
}

async fn encrypt_file(processor: &Processor, input: &Path, output: &Path) -> Result<()> {
    let plaintext = tokio::fs::read(input).await.with_context(|| format!("failed to read {}", input.display()))?;
    let name = input.file_name().map(|name| name.to_string_lossy().into_owned()).context("input has no file name")?;

    let bytes = processor.encrypt_blocking(plaintext, name).await?;

    tokio::fs::write(output, bytes).await.with_context(|| format!("failed to write {}", output.display()))
}
