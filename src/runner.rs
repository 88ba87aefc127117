use {
  super::*,
  owo_colors::{OwoColorize, Stream},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
  /// Copy each original to `<path><suffix>` before overwriting it.
  pub backup_suffix: Option<String>,
  pub dry_run: bool,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
  Failed {
    error: String,
  },
  Patched {
    applied: Vec<Defect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backup: Option<PathBuf>,
  },
  Rejected {
    violations: Vec<Violation>,
  },
  Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
  #[serde(flatten)]
  pub outcome: Outcome,
  pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
  pub dry_run: bool,
  /// One report per input, in input order.
  pub files: Vec<FileReport>,
}

impl Summary {
  pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
    self
      .files
      .iter()
      .filter(|file| matches!(file.outcome, Outcome::Failed { .. }))
  }

  /// Whether every file was either patched or already clean.
  #[must_use]
  pub fn is_clean(&self) -> bool {
    self.rejected().next().is_none() && self.failed().next().is_none()
  }

  #[must_use]
  pub fn modified(&self) -> usize {
    self
      .files
      .iter()
      .filter(|file| matches!(file.outcome, Outcome::Patched { .. }))
      .count()
  }

  pub fn rejected(&self) -> impl Iterator<Item = &FileReport> {
    self
      .files
      .iter()
      .filter(|file| matches!(file.outcome, Outcome::Rejected { .. }))
  }

  #[must_use]
  pub fn total(&self) -> usize {
    self.files.len()
  }
}

impl Display for Summary {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    for file in &self.files {
      let path = file.path.display();

      match &file.outcome {
        Outcome::Failed { error } => writeln!(
          f,
          "{} {path}: {error}",
          "failed".if_supports_color(Stream::Stdout, |text| text.red())
        )?,
        Outcome::Patched { applied, .. } => writeln!(
          f,
          "{} {path} ({})",
          "patched".if_supports_color(Stream::Stdout, |text| text.green()),
          applied
            .iter()
            .map(|defect| defect.name())
            .collect::<Vec<&str>>()
            .join(", ")
        )?,
        Outcome::Rejected { violations } => writeln!(
          f,
          "{} {path}: {}",
          "rejected".if_supports_color(Stream::Stdout, |text| text.yellow()),
          Violation::list(violations)
        )?,
        Outcome::Unchanged => writeln!(
          f,
          "{} {path}",
          "unchanged".if_supports_color(Stream::Stdout, |text| text.dimmed())
        )?,
      }
    }

    writeln!(f)?;

    write!(
      f,
      "{} of {} files {}",
      self.modified(),
      self.total(),
      if self.dry_run {
        "would be modified (dry run)"
      } else {
        "modified"
      }
    )?;

    for (label, files) in [
      ("rejected", self.rejected().collect::<Vec<&FileReport>>()),
      ("failed", self.failed().collect()),
    ] {
      if files.is_empty() {
        continue;
      }

      write!(f, "\n{label}:")?;

      for file in files {
        write!(f, "\n  {}", file.path.display())?;
      }
    }

    Ok(())
  }
}

/// Patches a batch of files in parallel, each on its own: a failure in one
/// file never stops the others.
pub struct Runner<'a> {
  options: RunOptions,
  patcher: &'a Patcher,
}

impl<'a> Runner<'a> {
  fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut backup = path.as_os_str().to_owned();
    backup.push(suffix);
    PathBuf::from(backup)
  }

  #[must_use]
  pub fn new(patcher: &'a Patcher, options: RunOptions) -> Self {
    Self { options, patcher }
  }

  fn patch_file(&self, path: &Path) -> Result<Outcome> {
    let html = fs::read_to_string(path).map_err(Error::io(path))?;

    let patch = self.patcher.apply(&html)?;

    if !patch.changed {
      debug!("`{}` is already clean", path.display());
      return Ok(Outcome::Unchanged);
    }

    if self.options.dry_run {
      info!("would patch `{}`", path.display());

      return Ok(Outcome::Patched {
        applied: patch.applied,
        backup: None,
      });
    }

    let backup = match &self.options.backup_suffix {
      Some(suffix) => {
        let backup = Self::backup_path(path, suffix);
        fs::write(&backup, &html).map_err(Error::io(&backup))?;
        Some(backup)
      }
      None => None,
    };

    fs::write(path, &patch.text).map_err(Error::io(path))?;

    info!("patched `{}`", path.display());

    Ok(Outcome::Patched {
      applied: patch.applied,
      backup,
    })
  }

  fn process(&self, path: &Path) -> Outcome {
    match self.patch_file(path) {
      Ok(outcome) => outcome,
      Err(Error::Validation { violations }) => {
        warn!(
          "not writing `{}`: {}",
          path.display(),
          Violation::list(&violations)
        );
        Outcome::Rejected { violations }
      }
      Err(error) => {
        warn!("{error}");
        Outcome::Failed {
          error: error.to_string(),
        }
      }
    }
  }

  #[must_use]
  pub fn run(&self, paths: &[PathBuf]) -> Summary {
    Summary {
      dry_run: self.options.dry_run,
      files: paths
        .par_iter()
        .map(|path| FileReport {
          outcome: self.process(path),
          path: path.clone(),
        })
        .collect(),
    }
  }
}
