use super::*;

/// Applies every enabled stage to a document, then checks the result before
/// handing it back.
///
/// A `Patcher` compiles its options once and can be shared across threads.
#[derive(Debug)]
pub struct Patcher {
  options: PatchOptions,
  patterns: Patterns,
}

impl Patcher {
  /// Patches `html`, returning [`Error::Validation`] when the result breaks a
  /// structural invariant that held before.
  pub fn apply(&self, html: &str) -> Result<Patch> {
    let mut text = html.to_owned();

    let applied = Pipeline::with_default_stages(Context::new(
      &mut text,
      &self.options,
      &self.patterns,
    ))
    .run()?
    .applied();

    let changed = text != html;

    if changed && self.options.validate {
      let violations =
        validate::violations(html, &text, &self.options, &self.patterns);

      if !violations.is_empty() {
        return Err(Error::Validation { violations });
      }
    }

    Ok(Patch {
      applied,
      changed,
      text,
    })
  }

  pub fn new(options: PatchOptions) -> Result<Self> {
    let patterns = Patterns::compile(&options)?;

    Ok(Self { options, patterns })
  }

  #[must_use]
  pub fn options(&self) -> &PatchOptions {
    &self.options
  }
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq};

  #[test]
  fn clean_document_is_unchanged() {
    let html = concat!(
      "<style>\n",
      "@media (max-width: 768px) {\n",
      "  .w { padding: 0; }\n",
      "}\n",
      "</style>\n",
      "<nav></nav>\n",
      "<main>x</main>\n",
      "<footer><div class=\"w\">y</div></footer>\n",
    );

    let patch = Patcher::new(PatchOptions::default())
      .unwrap()
      .apply(html)
      .unwrap();

    assert_eq!(
      patch,
      Patch {
        applied: Vec::new(),
        changed: false,
        text: html.to_owned(),
      }
    );
  }

  #[test]
  fn records_defects_in_pipeline_order() {
    let patch = Patcher::new(PatchOptions::default())
      .unwrap()
      .apply(concat!(
        "<nav></nav>\n",
        "<p><a href=\"#\">Docs</a></p>\n",
        "<div class=\"w\"><footer>y</footer></div>\n",
      ))
      .unwrap();

    assert!(patch.changed);
    assert_eq!(
      patch.applied,
      vec![
        Defect::MissingWrapper,
        Defect::FooterNesting,
        Defect::PlaceholderLinks
      ]
    );
    assert_eq!(
      patch.text,
      concat!(
        "<nav></nav>\n",
        "\n",
        "<main>\n",
        "<p><a href=\"https://kept.work/docs/\">Docs</a></p>\n",
        "</main>\n",
        "\n",
        "<footer><div class=\"w\">y</div></footer>\n",
      )
    );
  }

  #[test]
  fn disabled_defects_are_skipped() {
    let html = "<p><a href=\"#\">Docs</a></p>\n";

    let patch = Patcher::new(
      PatchOptions::builder()
        .defects([Defect::FooterNesting])
        .build(),
    )
    .unwrap()
    .apply(html)
    .unwrap();

    assert!(!patch.changed);
    assert_eq!(patch.text, html);
  }

  #[test]
  fn invalid_options_fail_early() {
    assert!(matches!(
      Patcher::new(PatchOptions::builder().media_query("").build()),
      Err(Error::InvalidOption(_))
    ));
  }
}
