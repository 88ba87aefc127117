use super::*;

/// Points placeholder anchors at their real destinations, keyed by the exact
/// anchor text. Placeholder anchors with any other text are left alone.
pub(crate) struct RewritePlaceholderLinksStage;

impl Stage for RewritePlaceholderLinksStage {
  fn defect(&self) -> Defect {
    Defect::PlaceholderLinks
  }

  fn run(&mut self, context: &mut Context<'_>) -> Result {
    let options = context.options();

    let html = context.html();

    let mut edits = Vec::new();

    for anchor in re::ANCHOR_ELEMENT.captures_iter(html) {
      let Some(target) = options
        .link_targets
        .iter()
        .find(|target| target.text == anchor["text"])
      else {
        continue;
      };

      let Some(attrs) = anchor.name("attrs") else {
        continue;
      };

      let Some(href) = re::HREF_ATTRIBUTE
        .captures(attrs.as_str())
        .and_then(|captures| {
          captures.name("double").or_else(|| captures.name("single"))
        })
      else {
        continue;
      };

      if href.as_str() != options.placeholder_href {
        continue;
      }

      debug!("pointing `{}` link at {}", target.text, target.href);

      edits.push(Edit::replace(
        attrs.start() + href.start()..attrs.start() + href.end(),
        target.href.as_str(),
      ));
    }

    if !edits.is_empty() {
      context.document().apply(edits);
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq};

  fn run(html: &str) -> String {
    run_stage(RewritePlaceholderLinksStage, html, &PatchOptions::default())
  }

  #[test]
  fn maps_known_link_texts() {
    assert_eq!(
      run(concat!(
        r##"<a href="#">GitHub</a>"##,
        r##"<a class="f" href="#" rel="x">Docs</a>"##,
        r##"<a href='#'>Privacy</a>"##,
      )),
      concat!(
        r#"<a href="https://github.com/hoarhouse/KP5D">GitHub</a>"#,
        r#"<a class="f" href="https://kept.work/docs/" rel="x">Docs</a>"#,
        r#"<a href='https://kept.work/privacy/'>Privacy</a>"#,
      )
    );
  }

  #[test]
  fn unknown_text_keeps_placeholder() {
    let html = r##"<a href="#">Changelog</a> <a href="#"> Docs</a>"##;

    assert_eq!(run(html), html);
  }

  #[test]
  fn real_links_are_not_repointed() {
    let html = r#"<a href="/docs/">Docs</a>"#;

    assert_eq!(run(html), html);
  }

  #[test]
  fn custom_targets_and_placeholder() {
    let options = PatchOptions::builder()
      .placeholder_href("javascript:void(0)")
      .link_targets([LinkTarget::new("Blog", "/blog/")])
      .build();

    assert_eq!(
      run_stage(
        RewritePlaceholderLinksStage,
        r##"<a href="javascript:void(0)">Blog</a><a href="#">GitHub</a>"##,
        &options,
      ),
      r##"<a href="/blog/">Blog</a><a href="#">GitHub</a>"##
    );
  }
}
