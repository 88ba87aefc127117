use super::*;

/// Wraps the content between the navigation and the footer in the semantic
/// wrapper element when the document has none.
pub(crate) struct InsertContentWrapperStage;

impl Stage for InsertContentWrapperStage {
  fn defect(&self) -> Defect {
    Defect::MissingWrapper
  }

  fn run(&mut self, context: &mut Context<'_>) -> Result {
    let (options, patterns) = (context.options(), context.patterns());

    let html = context.html();

    if patterns.wrapper_open.is_match(html) {
      return Ok(());
    }

    let Some(after_nav) = html
      .find(&options.nav_close_marker)
      .map(|index| index + options.nav_close_marker.len())
    else {
      debug!("no `{}` marker, skipping wrapper", options.nav_close_marker);
      return Ok(());
    };

    let Some(footer) = Self::footer_marker(&html[after_nav..], patterns)
      .map(|offset| after_nav + offset)
    else {
      debug!(
        "no footer after `{}`, skipping wrapper",
        options.nav_close_marker
      );
      return Ok(());
    };

    let tag = &options.wrapper_tag;

    context.document().apply(vec![
      Edit::insert(after_nav, format!("\n\n<{tag}>")),
      Edit::insert(footer, format!("</{tag}>\n\n")),
    ]);

    Ok(())
  }
}

impl InsertContentWrapperStage {
  fn footer_marker(html: &str, patterns: &Patterns) -> Option<usize> {
    patterns
      .footer_in_wrapper
      .find(html)
      .or_else(|| re::LINE_START_FOOTER.find(html))
      .map(|found| found.start())
  }
}
