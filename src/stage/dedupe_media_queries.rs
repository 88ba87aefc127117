use super::*;

/// Collapses every block for the configured breakpoint into one, placed where
/// the last of them stood.
pub(crate) struct DedupeMediaQueriesStage;

impl Stage for DedupeMediaQueriesStage {
  fn defect(&self) -> Defect {
    Defect::DuplicateMediaQuery
  }

  fn run(&mut self, context: &mut Context<'_>) -> Result {
    let (options, patterns) = (context.options(), context.patterns());

    let mut document = context.document();

    let blocks = document.media_blocks(&patterns.media_query);

    let Some((last, earlier)) = blocks.split_last() else {
      return Ok(());
    };

    if earlier.is_empty() {
      return Ok(());
    }

    debug!(
      "collapsing {} `@media {}` blocks ({:?})",
      blocks.len(),
      options.media_query,
      options.dedupe_strategy
    );

    let mut edits = earlier
      .iter()
      .map(|block| Edit::delete(document.line_extent(block.span.clone())))
      .collect::<Vec<Edit>>();

    if options.dedupe_strategy == DedupeStrategy::Merge {
      edits.push(Edit::replace(
        last.span.clone(),
        Self::merged_block(&document, &blocks, last),
      ));
    }

    document.apply(edits);

    Ok(())
  }
}

impl DedupeMediaQueriesStage {
  fn merged_block(
    document: &Document<'_>,
    blocks: &[Block],
    last: &Block,
  ) -> String {
    let html = document.as_str();

    let (outer, inner) = document.block_indentation(last);

    let rules = css::merge_rules(
      blocks
        .iter()
        .map(|block| css::parse_rules(&html[block.body.clone()])),
    );

    let prelude = html[last.span.start..last.body.start].trim_end();

    let mut merged = format!("{prelude}\n");

    for rule in rules {
      merged.push_str(&format!("{inner}{rule}\n"));
    }

    merged.push_str(&outer);
    merged.push('}');

    merged
  }
}
