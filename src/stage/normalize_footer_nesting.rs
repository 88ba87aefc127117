use super::*;

/// Swaps `<div class="w"><footer>...</footer></div>` into
/// `<footer><div class="w">...</div></footer>`, leaving whatever sits between
/// the tags untouched.
pub(crate) struct NormalizeFooterNestingStage;

impl Stage for NormalizeFooterNestingStage {
  fn defect(&self) -> Defect {
    Defect::FooterNesting
  }

  fn run(&mut self, context: &mut Context<'_>) -> Result {
    let (options, patterns) = (context.options(), context.patterns());

    let html = context.html();

    let mut edits = Vec::new();
    let mut cursor = 0;

    while let Some(open) = patterns.footer_in_wrapper.captures_at(html, cursor)
    {
      let Some(opening) = open.get(0) else {
        break;
      };

      let Some(close) = patterns
        .footer_close_in_wrapper
        .captures_at(html, opening.end())
      else {
        warn!(
          "footer wrapper at byte {} is never closed, leaving it",
          opening.start()
        );
        cursor = opening.end();
        continue;
      };

      let Some(closing) = close.get(0) else {
        break;
      };

      edits.push(Edit::replace(
        opening.range(),
        format!(
          "{}{}{}",
          &open["footer"],
          &open["gap"],
          options.footer_wrapper.trim()
        ),
      ));

      edits.push(Edit::replace(
        closing.range(),
        format!(
          "{}{}</footer>",
          patterns.footer_wrapper_close, &close["gap"]
        ),
      ));

      cursor = closing.end();
    }

    if !edits.is_empty() {
      context.document().apply(edits);
    }

    Ok(())
  }
}
