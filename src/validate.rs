use super::*;

static FOOTER: LazyLock<Selector> =
  LazyLock::new(|| Selector::parse("footer").unwrap());

/// A structural invariant a patched document fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Violation {
  DuplicateMediaQuery,
  FooterCount,
  FooterInsideWrapper,
  OrphanedRules,
  ParseErrors,
  UnbalancedBraces,
  UnbalancedWrapper,
}

impl Violation {
  pub(crate) fn list(violations: &[Violation]) -> String {
    violations
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<String>>()
      .join(", ")
  }
}

impl Display for Violation {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::DuplicateMediaQuery => "duplicate media query remains",
      Self::FooterCount => "footer element count changed",
      Self::FooterInsideWrapper => "footer nested inside wrapper",
      Self::OrphanedRules => "orphaned CSS rules remain",
      Self::ParseErrors => "new HTML parse errors",
      Self::UnbalancedBraces => "unbalanced braces in style element",
      Self::UnbalancedWrapper => "unbalanced wrapper tag",
    })
  }
}

#[derive(Debug, PartialEq, Eq)]
struct Structure {
  braces_balanced: bool,
  footer_count: usize,
  footer_inside_wrapper: bool,
  media_blocks: usize,
  orphaned_rules: bool,
  parse_errors: usize,
  wrapper_balanced: bool,
}

impl Structure {
  fn inspect(html: &str, patterns: &Patterns) -> Self {
    let parsed = Html::parse_document(html);

    Self {
      braces_balanced: css::braces_balanced(html),
      footer_count: parsed.select(&FOOTER).count(),
      footer_inside_wrapper: patterns.footer_in_wrapper.is_match(html),
      media_blocks: css::blocks_in_styles(html, &patterns.media_query).len(),
      orphaned_rules: css::style_ranges(html)
        .into_iter()
        .any(|css| !css::orphans(&html[css]).is_empty()),
      parse_errors: parsed.errors.len(),
      wrapper_balanced: patterns.wrapper_open.find_iter(html).count()
        == patterns.wrapper_close.find_iter(html).count(),
    }
  }
}

/// Invariants `output` breaks that `input` kept, plus the postconditions of
/// enabled stages that still fail on `output`.
pub(crate) fn violations(
  input: &str,
  output: &str,
  options: &PatchOptions,
  patterns: &Patterns,
) -> Vec<Violation> {
  let (before, after) = (
    Structure::inspect(input, patterns),
    Structure::inspect(output, patterns),
  );

  let fails = |holds_after: bool, holds_before: bool, stage: Option<Defect>| {
    !holds_after
      && (holds_before || stage.is_some_and(|stage| options.enables(stage)))
  };

  let mut violations = Vec::new();

  if fails(
    after.media_blocks <= 1,
    before.media_blocks <= 1,
    Some(Defect::DuplicateMediaQuery),
  ) {
    violations.push(Violation::DuplicateMediaQuery);
  }

  if after.footer_count != before.footer_count {
    violations.push(Violation::FooterCount);
  }

  if fails(
    !after.footer_inside_wrapper,
    !before.footer_inside_wrapper,
    Some(Defect::FooterNesting),
  ) {
    violations.push(Violation::FooterInsideWrapper);
  }

  if fails(
    !after.orphaned_rules,
    !before.orphaned_rules,
    Some(Defect::OrphanedRules),
  ) {
    violations.push(Violation::OrphanedRules);
  }

  if after.parse_errors > before.parse_errors {
    violations.push(Violation::ParseErrors);
  }

  if fails(after.braces_balanced, before.braces_balanced, None) {
    violations.push(Violation::UnbalancedBraces);
  }

  if fails(after.wrapper_balanced, before.wrapper_balanced, None) {
    violations.push(Violation::UnbalancedWrapper);
  }

  for violation in &violations {
    debug!("validation failed: {violation}");
  }

  violations
}
