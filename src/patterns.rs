use super::*;

/// Everything in [`PatchOptions`] that needs compiling, compiled once per
/// patcher and shared by every document it patches.
#[derive(Debug)]
pub(crate) struct Patterns {
  pub(crate) footer_close_in_wrapper: Regex,
  pub(crate) footer_in_wrapper: Regex,
  pub(crate) footer_wrapper_close: String,
  pub(crate) media_query: Regex,
  pub(crate) required_rules: Vec<Rule>,
  pub(crate) wrapper_close: Regex,
  pub(crate) wrapper_open: Regex,
}

impl Patterns {
  pub(crate) fn compile(options: &PatchOptions) -> Result<Self> {
    let footer_wrapper = options.footer_wrapper.trim();

    let footer_wrapper_tag = re::START_TAG
      .captures(footer_wrapper)
      .map(|captures| captures["name"].to_owned())
      .ok_or_else(|| {
        Error::InvalidOption(format!(
          "footer wrapper `{footer_wrapper}` is not a start tag"
        ))
      })?;

    if !re::TAG_NAME.is_match(&options.wrapper_tag) {
      return Err(Error::InvalidOption(format!(
        "wrapper tag `{}` is not an element name",
        options.wrapper_tag
      )));
    }

    let required_rules = options
      .required_media_rules
      .iter()
      .map(|rule| match css::parse_rules(rule).as_slice() {
        [rule] => Ok(rule.clone()),
        _ => Err(Error::InvalidOption(format!(
          "required media rule `{rule}` is not a single rule"
        ))),
      })
      .collect::<Result<Vec<Rule>>>()?;

    Ok(Self {
      footer_close_in_wrapper: Self::regex(&format!(
        r"(?i)</footer\s*>(?P<gap>\s*)</{footer_wrapper_tag}\s*>"
      ))?,
      footer_in_wrapper: Self::regex(&format!(
        r"{}(?P<gap>\s*)(?P<footer><(?i:footer)(?:\s[^>]*)?>)",
        regex::escape(footer_wrapper)
      ))?,
      footer_wrapper_close: format!("</{footer_wrapper_tag}>"),
      media_query: css::media_query_pattern(&options.media_query)?,
      required_rules,
      wrapper_close: Self::regex(&format!(
        r"(?i)</{}\s*>",
        options.wrapper_tag
      ))?,
      wrapper_open: Self::regex(&format!(
        r"(?i)<{}(?:\s[^>]*)?>",
        options.wrapper_tag
      ))?,
    })
  }

  fn regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|error| Error::InvalidOption(error.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn footer_patterns_follow_configured_wrapper() {
    let patterns = Patterns::compile(
      &PatchOptions::builder()
        .footer_wrapper(r#"<section id="end">"#)
        .build(),
    )
    .unwrap();

    assert!(
      patterns
        .footer_in_wrapper
        .is_match("<section id=\"end\">\n  <footer class=\"f\">")
    );
    assert!(
      patterns
        .footer_close_in_wrapper
        .is_match("</footer>\n</section>")
    );
    assert_eq!(patterns.footer_wrapper_close, "</section>");
  }

  #[test]
  fn wrapper_patterns_match_attributes_but_not_prefixes() {
    let patterns = Patterns::compile(&PatchOptions::default()).unwrap();

    assert!(patterns.wrapper_open.is_match(r#"<main id="content">"#));
    assert!(patterns.wrapper_open.is_match("<MAIN>"));
    assert!(!patterns.wrapper_open.is_match("<mainly>"));
    assert!(patterns.wrapper_close.is_match("</main >"));
  }

  #[test]
  fn rejects_malformed_options() {
    for options in [
      PatchOptions::builder().footer_wrapper("div.w").build(),
      PatchOptions::builder().wrapper_tag("main>").build(),
      PatchOptions::builder()
        .required_media_rules([".a { b: c; } .d { e: f; }"])
        .build(),
    ] {
      assert!(matches!(
        Patterns::compile(&options),
        Err(Error::InvalidOption(_))
      ));
    }
  }
}
