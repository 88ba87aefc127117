use super::*;

#[derive(Parser)]
#[command(name = "htmlmend")]
#[command(
  about = "Apply idempotent structural fixes to static blog articles",
  long_about = None
)]
pub(crate) struct Arguments {
  #[arg(long, help = "Copy each original to `<PATH><SUFFIX>` before writing")]
  backup: bool,
  #[arg(
    long,
    value_name = "SUFFIX",
    default_value = ".bak",
    help = "Suffix for backup files"
  )]
  backup_suffix: String,
  #[arg(long, value_name = "FILE", help = "JSON file with patch options")]
  config: Option<PathBuf>,
  #[arg(long, help = "Report what would change without writing anything")]
  dry_run: bool,
  #[arg(
    value_name = "PATH",
    required = true,
    help = "Article files, or blog directories to search for articles"
  )]
  inputs: Vec<PathBuf>,
  #[arg(long, help = "Print the summary as JSON")]
  json: bool,
  #[arg(long, help = "Write patched files without validating them")]
  no_validate: bool,
  #[arg(
    long,
    value_enum,
    value_name = "DEFECT",
    help = "Fix only this defect (repeatable)"
  )]
  only: Vec<Defect>,
  #[arg(
    long,
    value_enum,
    value_name = "DEFECT",
    help = "Leave this defect alone (repeatable)"
  )]
  skip: Vec<Defect>,
  #[arg(
    long,
    value_enum,
    help = "How duplicate breakpoint blocks are collapsed"
  )]
  strategy: Option<DedupeStrategy>,
  #[arg(
    short,
    long,
    action = ArgAction::Count,
    help = "Log more (repeatable)"
  )]
  verbose: u8,
}

impl Arguments {
  fn options(&self) -> Result<PatchOptions> {
    let mut options = match &self.config {
      Some(path) => PatchOptions::load(path).with_context(|| {
        format!("failed to load options from `{}`", path.display())
      })?,
      None => PatchOptions::default(),
    };

    if !self.only.is_empty() {
      options.defects.retain(|defect| self.only.contains(defect));
    }

    options.defects.retain(|defect| !self.skip.contains(defect));

    if let Some(strategy) = self.strategy {
      options.dedupe_strategy = strategy;
    }

    if self.no_validate {
      options.validate = false;
    }

    Ok(options)
  }

  /// Returns whether every input was patched or already clean.
  pub(crate) fn run(self) -> Result<bool> {
    env_logger::Builder::new()
      .filter_level(match self.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
      })
      .parse_default_env()
      .init();

    let patcher =
      Patcher::new(self.options()?).context("invalid patch options")?;

    let paths = expand(&self.inputs).context("failed to collect inputs")?;

    let summary = Runner::new(
      &patcher,
      RunOptions {
        backup_suffix: self.backup.then_some(self.backup_suffix),
        dry_run: self.dry_run,
      },
    )
    .run(&paths);

    if self.json {
      println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
      println!("{summary}");
    }

    Ok(summary.is_clean())
  }
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq};

  fn options(args: &[&str]) -> PatchOptions {
    Arguments::try_parse_from(
      ["htmlmend"].iter().chain(args).chain(&["post.html"]),
    )
    .unwrap()
    .options()
    .unwrap()
  }

  #[test]
  fn only_and_skip_restrict_defects() {
    assert_eq!(
      options(&["--only", "footer-nesting", "--only", "orphaned-rules"])
        .defects,
      vec![Defect::FooterNesting, Defect::OrphanedRules]
    );

    assert_eq!(
      options(&["--skip", "placeholder-links"]).defects,
      Defect::ALL
        .into_iter()
        .filter(|defect| *defect != Defect::PlaceholderLinks)
        .collect::<Vec<Defect>>()
    );
  }

  #[test]
  fn flags_override_defaults() {
    let options = options(&["--strategy", "keep-last", "--no-validate"]);

    assert_eq!(options.dedupe_strategy, DedupeStrategy::KeepLast);
    assert!(!options.validate);
  }

  #[test]
  fn paths_are_required() {
    assert!(Arguments::try_parse_from(["htmlmend", "--dry-run"]).is_err());
  }
}
