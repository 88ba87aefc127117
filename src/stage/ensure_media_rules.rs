use super::*;

/// Adds configured rules the breakpoint block is missing. Declarations a
/// present rule lacks are appended to it; whole rules go at the block's top.
pub(crate) struct EnsureMediaRulesStage;

impl Stage for EnsureMediaRulesStage {
  fn defect(&self) -> Defect {
    Defect::MissingMediaRules
  }

  fn run(&mut self, context: &mut Context<'_>) -> Result {
    let patterns = context.patterns();

    if patterns.required_rules.is_empty() {
      return Ok(());
    }

    let mut document = context.document();

    let Some(block) = document.media_blocks(&patterns.media_query).pop() else {
      debug!("no breakpoint block to extend");
      return Ok(());
    };

    let body = &document.as_str()[block.body.clone()];

    let located = css::located_rules(body);

    let present = css::merge_rules([located
      .iter()
      .map(|(_, rule)| rule.clone())
      .collect::<Vec<Rule>>()]);

    let missing = css::merge_rules([patterns
      .required_rules
      .iter()
      .filter_map(|rule| rule.missing_from(&present))
      .collect::<Vec<Rule>>()]);

    if missing.is_empty() {
      return Ok(());
    }

    let (_, inner) = document.block_indentation(&block);

    let mut edits = Vec::new();
    let mut prepended = String::new();

    for rule in &missing {
      let existing = located.iter().rev().find(|(_, existing)| {
        existing.selector == rule.selector
          && matches!(existing.body, css::RuleBody::Declarations(_))
      });

      match (existing, &rule.body) {
        (Some((span, _)), css::RuleBody::Declarations(declarations)) => {
          debug!("extending `{}` in breakpoint block", rule.selector);

          edits.push(Self::extend(
            body,
            block.body.start,
            span,
            declarations,
          ));
        }
        _ => prepended.push_str(&format!("\n{inner}{rule}")),
      }
    }

    if !prepended.is_empty() {
      edits.push(Edit::insert(block.body.start, prepended));
    }

    document.apply(edits);

    Ok(())
  }
}

impl EnsureMediaRulesStage {
  /// Appends `declarations` after the last one already in `rule`.
  fn extend(
    body: &str,
    offset: usize,
    rule: &Block,
    declarations: &[css::Declaration],
  ) -> Edit {
    let current = body[rule.body.clone()].trim_end();

    let separator = if current.trim().is_empty() || current.ends_with(';') {
      ""
    } else {
      ";"
    };

    let added = declarations
      .iter()
      .map(|declaration| {
        format!(" {}: {};", declaration.property, declaration.value)
      })
      .collect::<String>();

    Edit::insert(
      offset + rule.body.start + current.len(),
      format!("{separator}{added}"),
    )
  }
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq};

  fn options() -> PatchOptions {
    PatchOptions::builder()
      .required_media_rules([
        ".hamburger { display: block; }",
        ".nav-r.active { transform: translateY(0); opacity: 1; }",
      ])
      .build()
  }

  #[test]
  fn prepends_missing_rules_and_extends_present_ones() {
    assert_eq!(
      run_stage(
        EnsureMediaRulesStage,
        concat!(
          "<style>\n",
          "@media (max-width: 768px) {\n",
          "  .nav-r.active { opacity: 1; }\n",
          "}\n",
          "</style>",
        ),
        &options(),
      ),
      concat!(
        "<style>\n",
        "@media (max-width: 768px) {\n",
        "  .hamburger { display: block; }\n",
        "  .nav-r.active { opacity: 1; transform: translateY(0); }\n",
        "}\n",
        "</style>",
      )
    );
  }

  #[test]
  fn declarations_join_the_last_matching_rule() {
    assert_eq!(
      run_stage(
        EnsureMediaRulesStage,
        concat!(
          "<style>\n",
          "@media (max-width: 768px) {\n",
          "  .hamburger { display: block; }\n",
          "  .nav-r.active { opacity: 1 }\n",
          "  .nav-r.active {\n",
          "    visibility: visible\n",
          "  }\n",
          "}\n",
          "</style>",
        ),
        &options(),
      ),
      concat!(
        "<style>\n",
        "@media (max-width: 768px) {\n",
        "  .hamburger { display: block; }\n",
        "  .nav-r.active { opacity: 1 }\n",
        "  .nav-r.active {\n",
        "    visibility: visible; transform: translateY(0);\n",
        "  }\n",
        "}\n",
        "</style>",
      )
    );
  }

  #[test]
  fn complete_block_is_left_alone() {
    let html = concat!(
      "<style>\n",
      "@media (max-width: 768px) {\n",
      "  .hamburger { display: block; }\n",
      "  .nav-r.active { transform: none; opacity: 0.5; }\n",
      "}\n",
      "</style>",
    );

    assert_eq!(run_stage(EnsureMediaRulesStage, html, &options()), html);
  }

  #[test]
  fn without_breakpoint_block_nothing_is_added() {
    let html = "<style>\nbody { margin: 0; }\n</style>";

    assert_eq!(run_stage(EnsureMediaRulesStage, html, &options()), html);
  }

  #[test]
  fn no_required_rules_by_default() {
    let html = "<style>\n@media (max-width: 768px) {\n}\n</style>";

    assert_eq!(
      run_stage(EnsureMediaRulesStage, html, &PatchOptions::default()),
      html
    );
  }
}
