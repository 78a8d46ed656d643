use std::path::PathBuf;

use anyhow::{Context, Result, bail, ensure};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_LOG_FILTER, PASSWORD_ENV, SENTINEL_FILE};
use crate::consumer::Gate;
use crate::container::Container;
use crate::producer::Producer;
use crate::secret::Password;
use crate::source::AnySource;
use crate::types::Status;
use crate::ui::display;
use crate::ui::progress::Spinner;
use crate::ui::prompt;

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt documents into an output directory.
    Encrypt {
        #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
        password: String,

        out_dir: PathBuf,

        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Also write the password check container.
        #[arg(long)]
        with_check: bool,
    },

    /// Check a password against a published sentinel.
    Verify {
        /// Directory or http(s) URL the containers are published at.
        #[arg(short, long)]
        source: String,

        #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,

        #[arg(long, default_value = SENTINEL_FILE)]
        sentinel: String,
    },

    /// Verify a password, then decrypt every published document.
    Unlock {
        #[arg(short, long)]
        source: String,

        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,

        /// Containers to unlock instead of the manifest's list.
        #[arg(short, long = "file")]
        files: Vec<String>,

        #[arg(long)]
        sentinel: Option<String>,
    },

    /// Show a container's header without decrypting it.
    Inspect { input: PathBuf },
}

#[derive(Parser)]
#[command(name = "docgate", version = "26.1.0", about = "Password-gated document containers using AES-256-GCM and PBKDF2-SHA256.")]
pub struct App {
    #[command(subcommand)]
    command: Commands,
}

impl App {
    pub fn init() -> Result<Self> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_file(true).with_line_number(true).with_writer(std::io::stderr).finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(Self::parse())
    }

    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Encrypt { password, out_dir, inputs, with_check } => Self::encrypt(Password::from_string(password), out_dir, &inputs, with_check).await,
            Commands::Verify { source, password, sentinel } => Self::verify(&source, password, sentinel).await,
            Commands::Unlock { source, output, password, files, sentinel } => Self::unlock(&source, output, password, files, sentinel).await,
            Commands::Inspect { input } => Self::inspect(input).await,
        }
    }

    async fn encrypt(password: Password, out_dir: PathBuf, inputs: &[PathBuf], with_check: bool) -> Result<()> {
        let outcomes = Producer::new(password, out_dir)?.with_check(with_check).run(inputs).await?;
        display::show_outcomes(&outcomes);

        ensure!(outcomes.iter().any(|outcome| outcome.is_written()), "no files were encrypted");
        Ok(())
    }

    async fn verify(source: &str, password: Option<String>, sentinel: String) -> Result<()> {
        let gate = Gate::new(AnySource::parse(source)?).with_sentinel(sentinel);
        let password = Self::get_password(password)?;

        if !Self::check(&gate, &password).await {
            bail!("incorrect password");
        }

        Ok(())
    }

    async fn unlock(source: &str, output: PathBuf, password: Option<String>, files: Vec<String>, sentinel: Option<String>) -> Result<()> {
        let mut gate = Gate::new(AnySource::parse(source)?);

        let names = if files.is_empty() {
            let manifest = match gate.manifest().await {
                Ok(manifest) => manifest,
                Err(e) => {
                    display::show_status(Status::Error);
                    return Err(e).context("no manifest at source; name files with --file");
                }
            };
            gate = gate.with_sentinel(sentinel.unwrap_or(manifest.sentinel));
            manifest.files
        } else {
            gate = gate.with_sentinel(sentinel.unwrap_or_else(|| SENTINEL_FILE.to_owned()));
            files
        };

        let password = Self::get_password(password)?;
        if !Self::check(&gate, &password).await {
            bail!("incorrect password");
        }

        let mut saved = 0_usize;
        for (name, result) in gate.download_all(&names, &password, &output).await {
            match result {
                Ok((path, _)) => {
                    display::show_saved(&name, &path);
                    saved += 1;
                }
                Err(e) => {
                    debug!("{name}: {e}");
                    warn!("could not unlock {name}");
                    display::show_unavailable(&name);
                }
            }
        }

        if Status::from_unlocked(saved, names.len()) == Status::Error {
            display::show_status(Status::Error);
            bail!("no files could be unlocked");
        }

        Ok(())
    }

    async fn inspect(input: PathBuf) -> Result<()> {
        let bytes = tokio::fs::read(&input).await.with_context(|| format!("failed to read {}", input.display()))?;
        let container = Container::decode(&bytes).with_context(|| format!("not a container: {}", input.display()))?;

        display::show_inspect(&input, &container, bytes.len());
        Ok(())
    }

    async fn check(gate: &Gate<AnySource>, password: &Password) -> bool {
        let spinner = Spinner::new(&Status::Checking.to_string());
        let verified = gate.verify(password).await;
        spinner.finish();

        display::show_status(Status::from_verified(verified));
        verified
    }

    /// Password typed or passed by a consumer, without surrounding whitespace.
    fn get_password(password: Option<String>) -> Result<Password> {
        let password = match password {
            Some(password) => password,
            None => prompt::password("Password:")?.expose_secret().to_owned(),
        };

        Ok(Password::new(password.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli() {
        App::command().debug_assert();
    }

    #[test]
    fn test_parse_encrypt() {
        let app = App::try_parse_from(["docgate", "encrypt", "-p", "letmein", "public", "a.pdf", "b.pdf", "--with-check"]).unwrap();

        let Commands::Encrypt { password, out_dir, inputs, with_check } = app.command else {
            panic!("expected encrypt");
        };
        assert_eq!(password, "letmein");
        assert_eq!(out_dir, PathBuf::from("public"));
        assert_eq!(inputs.len(), 2);
        assert!(with_check);
    }

    #[test]
    fn test_encrypt_requires_inputs() {
        assert!(App::try_parse_from(["docgate", "encrypt", "--password", "letmein", "public"]).is_err());
    }

    #[test]
    fn test_password_env() {
        let command = App::command();
        for name in ["encrypt", "verify", "unlock"] {
            let subcommand = command.find_subcommand(name).unwrap();
            let password = subcommand.get_arguments().find(|arg| arg.get_id() == "password").unwrap();
            assert_eq!(password.get_env(), Some(std::ffi::OsStr::new(PASSWORD_ENV)), "{name}");
        }
    }

    #[test]
    fn test_password_trimmed() {
        let password = App::get_password(Some("  letmein \n".to_owned())).unwrap();
        assert_eq!(password.expose_secret(), "letmein");
    }

    #[tokio::test]
    async fn test_unlock_without_manifest_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().display().to_string();

        assert!(App::unlock(&source, dir.path().join("out"), Some("pw".to_owned()), Vec::new(), None).await.is_err());
    }

    #[tokio::test]
    async fn test_unlock_nothing_saved_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ch1.pdf");
        std::fs::write(&input, b"%PDF").unwrap();
        let public = dir.path().join("public");
        App::encrypt(Password::new("letmein"), public.clone(), &[input], true).await.unwrap();

        let source = public.display().to_string();
        let missing = vec!["gone.pdf.enc".to_owned()];
        assert!(App::unlock(&source, dir.path().join("out"), Some("letmein".to_owned()), missing, None).await.is_err());
    }

    #[tokio::test]
    async fn test_encrypt_then_unlock() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ch1.pdf");
        std::fs::write(&input, b"%PDF chapter").unwrap();
        let public = dir.path().join("public");
        let out = dir.path().join("out");

        App::encrypt(Password::new("letmein"), public.clone(), &[input], true).await.unwrap();

        let source = public.display().to_string();
        App::verify(&source, Some("letmein".to_owned()), SENTINEL_FILE.to_owned()).await.unwrap();
        App::verify(&source, Some("letmein ".to_owned()), SENTINEL_FILE.to_owned()).await.unwrap();
        assert!(App::verify(&source, Some("nope".to_owned()), SENTINEL_FILE.to_owned()).await.is_err());

        App::unlock(&source, out.clone(), Some("letmein".to_owned()), Vec::new(), None).await.unwrap();
        assert_eq!(std::fs::read(out.join("ch1.pdf")).unwrap(), b"%PDF chapter");
    }
}
