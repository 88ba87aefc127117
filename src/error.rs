use super::*;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("failed to load config `{}`: {source}", path.display())]
  Config {
    path: PathBuf,
    source: serde_json::Error,
  },
  #[error("invalid option: {0}")]
  InvalidOption(String),
  #[error("I/O error on `{}`: {source}", path.display())]
  Io { path: PathBuf, source: io::Error },
  #[error(
    "refusing to write patched document: {}",
    Violation::list(violations)
  )]
  Validation { violations: Vec<Violation> },
}

impl Error {
  pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
    move |source| Self::Io {
      path: path.to_owned(),
      source,
    }
  }
}
