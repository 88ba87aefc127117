use super::*;

/// A known-bad pattern the patcher can repair, in pipeline order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Defect {
  /// More than one block for the configured breakpoint.
  DuplicateMediaQuery,
  /// No semantic wrapper around the main content.
  MissingWrapper,
  /// The footer wrapper encloses the footer instead of the reverse.
  FooterNesting,
  /// Anchors pointing at the placeholder href.
  PlaceholderLinks,
  /// Indented rules and stray closers outside any block.
  OrphanedRules,
  /// Required rules absent from the breakpoint block.
  MissingMediaRules,
}

impl Defect {
  pub const ALL: [Defect; 6] = [
    Defect::DuplicateMediaQuery,
    Defect::MissingWrapper,
    Defect::FooterNesting,
    Defect::PlaceholderLinks,
    Defect::OrphanedRules,
    Defect::MissingMediaRules,
  ];

  #[must_use]
  pub fn name(self) -> &'static str {
    match self {
      Self::DuplicateMediaQuery => "duplicate-media-query",
      Self::MissingWrapper => "missing-wrapper",
      Self::FooterNesting => "footer-nesting",
      Self::PlaceholderLinks => "placeholder-links",
      Self::OrphanedRules => "orphaned-rules",
      Self::MissingMediaRules => "missing-media-rules",
    }
  }
}

impl Display for Defect {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use {super::*, clap::ValueEnum};

  #[test]
  fn names_match_serde_and_cli_spelling() {
    for defect in Defect::ALL {
      assert_eq!(
        serde_json::to_string(&defect).unwrap(),
        format!("\"{}\"", defect.name())
      );

      assert_eq!(Defect::from_str(defect.name(), false), Ok(defect));
    }
  }
}
