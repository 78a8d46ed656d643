//! The consumer side: check a password against the sentinel, then fetch,
//! open and save the protected files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::config::{DEFAULT_MIME, FILE_EXTENSION, MANIFEST_FILE, SENTINEL_FILE};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::processor::Processor;
use crate::secret::Password;
use crate::source::Source;
use crate::verify::verify_blocking;

/// A decrypted file ready to be saved.
#[derive(Debug)]
pub struct Download {
    pub file_name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

impl Download {
    /// Writes the file into `dir` and returns its path.
    pub async fn save(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.data).await?;
        Ok(path)
    }
}

/// Name to save a container under: the metadata name reduced to its last
/// path component, else the container name without `.enc`.
pub fn save_name(container: &str, metadata_name: Option<&str>) -> String {
    metadata_name
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| {
            let base = Path::new(container).file_name().map_or_else(|| container.to_owned(), |name| name.to_string_lossy().into_owned());
            base.strip_suffix(FILE_EXTENSION).map(str::to_owned).unwrap_or(base)
        })
}

pub struct Gate<S> {
    source: Arc<S>,
    sentinel: String,
}

impl<S> Clone for Gate<S> {
    fn clone(&self) -> Self {
        Self { source: Arc::clone(&self.source), sentinel: self.sentinel.clone() }
    }
}

impl<S> Gate<S>
where
    S: Source + Send + Sync + 'static,
{
    pub fn new(source: S) -> Self {
        Self { source: Arc::new(source), sentinel: SENTINEL_FILE.to_owned() }
    }

    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// True iff the sentinel can be fetched and opens to `OK` under
    /// `password`. Never fails.
    pub async fn verify(&self, password: &Password) -> bool {
        match self.source.fetch(&self.sentinel).await {
            Ok(sentinel) => verify_blocking(sentinel, password).await,
            Err(e) => {
                debug!("verify failed: {e}");
                false
            }
        }
    }

    /// Loads the published manifest.
    pub async fn manifest(&self) -> Result<Manifest> {
        Manifest::from_bytes(&self.source.fetch(MANIFEST_FILE).await?)
    }

    /// Fetches and opens one container.
    ///
    /// # Errors
    ///
    /// `Fetch`, `Format` or `Authentication`. Callers showing this to a
    /// user should collapse them into one generic failure.
    pub async fn download(&self, name: &str, password: &Password) -> Result<Download> {
        let bytes = self.source.fetch(name).await?;
        let opened = Processor::new(password.clone()).decrypt_blocking(bytes).await?;

        Ok(Download {
            file_name: save_name(name, opened.metadata.name()),
            mime: if opened.metadata.mime().is_empty() { DEFAULT_MIME.to_owned() } else { opened.metadata.mime().to_owned() },
            data: opened.plaintext,
        })
    }

    /// Downloads every name concurrently and saves each into `dir`.
    ///
    /// Results come back in the order of `names`.
    pub async fn download_all(&self, names: &[String], password: &Password, dir: &Path) -> Vec<(String, Result<(PathBuf, Download)>)> {
        let mut tasks = JoinSet::new();

        for (index, name) in names.iter().enumerate() {
            let gate = self.clone();
            let name = name.clone();
            let password = password.clone();
            let dir = dir.to_path_buf();
            tasks.spawn(async move {
                let result = async {
                    let download = gate.download(&name, &password).await?;
                    let path = download.save(&dir).await?;
                    info!("saved {name} -> {} ({})", path.display(), download.mime);
                    Ok::<_, Error>((path, download))
                }
                .await;
                (index, name, result)
            });
        }

        let mut results: Vec<Option<(String, Result<(PathBuf, Download)>)>> = names.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, name, result)) => results[index] = Some((name, result)),
                Err(e) => debug!("download task failed: {e}"),
            }
        }

        results
            .into_iter()
            .zip(names)
            .map(|(result, name)| result.unwrap_or_else(|| (name.clone(), Err(Error::fetch(name.as_str(), "download task aborted")))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DirSource;
    use crate::verify::create_sentinel;

    #[test]
    fn test_save_name() {
        assert_eq!(save_name("a.pdf.enc", Some("Chapter 1.pdf")), "Chapter 1.pdf");
        assert_eq!(save_name("a.pdf.enc", Some("../../etc/passwd")), "passwd");
        assert_eq!(save_name("a.pdf.enc", None), "a.pdf");
        assert_eq!(save_name("sub/b.pdf.enc", Some("")), "b.pdf");
        assert_eq!(save_name("a.pdf.enc", Some("..")), "a.pdf");
    }

    fn publish(dir: &Path, password: &str) {
        let password = Password::new(password);
        std::fs::write(dir.join(SENTINEL_FILE), create_sentinel(&password).unwrap()).unwrap();

        let processor = Processor::new(password);
        std::fs::write(dir.join("one.pdf.enc"), processor.encrypt(b"first", "one.pdf").unwrap()).unwrap();
        std::fs::write(dir.join("two.pdf.enc"), processor.encrypt(b"second", "two.pdf").unwrap()).unwrap();
    }

    #[tokio::test]
    async fn test_verify() {
        let dir = tempfile::tempdir().unwrap();
        publish(dir.path(), "letmein");
        let gate = Gate::new(DirSource::new(dir.path()));

        assert!(gate.verify(&Password::new("letmein")).await);
        assert!(!gate.verify(&Password::new("wrong")).await);
    }

    #[tokio::test]
    async fn test_verify_missing_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let gate = Gate::new(DirSource::new(dir.path()));

        assert!(!gate.verify(&Password::new("letmein")).await);
    }

    #[tokio::test]
    async fn test_download_all() {
        let dir = tempfile::tempdir().unwrap();
        publish(dir.path(), "letmein");
        let out = dir.path().join("out");
        let gate = Gate::new(DirSource::new(dir.path()));

        let names = vec!["one.pdf.enc".to_owned(), "missing.pdf.enc".to_owned(), "two.pdf.enc".to_owned()];
        let results = gate.download_all(&names, &Password::new("letmein"), &out).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "one.pdf.enc");
        assert!(matches!(results[1].1, Err(Error::Fetch { .. })));

        let (path, download) = results[2].1.as_ref().unwrap();
        assert_eq!(download.mime, DEFAULT_MIME);
        assert_eq!(std::fs::read(path).unwrap(), b"second");
        assert_eq!(std::fs::read(out.join("one.pdf")).unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_download_wrong_password() {
        let dir = tempfile::tempdir().unwrap();
        publish(dir.path(), "letmein");
        let gate = Gate::new(DirSource::new(dir.path()));

        assert!(matches!(gate.download("one.pdf.enc", &Password::new("nope")).await, Err(Error::Authentication)));
    }
}
