use super::*;

/// Moves indented rules stranded outside any block into the breakpoint block,
/// dropping those it already declares, and removes stray closing braces.
pub(crate) struct RelocateOrphanedRulesStage;

impl Stage for RelocateOrphanedRulesStage {
  fn defect(&self) -> Defect {
    Defect::OrphanedRules
  }

  fn run(&mut self, context: &mut Context<'_>) -> Result {
    let (options, patterns) = (context.options(), context.patterns());

    let mut document = context.document();

    let orphans = Self::orphans(document.as_str());

    let Some(first) = orphans.first() else {
      return Ok(());
    };

    let target = document.media_blocks(&patterns.media_query).pop();

    let mut present = target
      .as_ref()
      .map(|block| {
        css::merge_rules([css::parse_rules(
          &document.as_str()[block.body.clone()],
        )])
      })
      .unwrap_or_default();

    let mut relocated = Vec::new();
    let mut edits = Vec::new();

    for orphan in &orphans {
      edits.push(Edit::delete(orphan.span.clone()));

      match &orphan.kind {
        OrphanKind::Rules(rules) => {
          for rule in rules {
            let Some(missing) = rule.missing_from(&present) else {
              debug!("dropping duplicate orphaned rule `{}`", rule.selector);
              continue;
            };

            debug!("relocating orphaned rule `{}`", missing.selector);

            present = css::merge_rules([present, vec![missing.clone()]]);
            relocated = css::merge_rules([relocated, vec![missing]]);
          }
        }
        OrphanKind::Declaration => warn!(
          "dropping declaration outside any rule: `{}`",
          document.as_str()[orphan.span.clone()].trim()
        ),
        OrphanKind::StrayCloser => debug!("dropping stray closing brace"),
      }
    }

    if !relocated.is_empty() {
      edits.push(match &target {
        Some(block) => Self::append_to_block(&document, block, &relocated),
        None => Self::new_block(&document, first, &relocated, options),
      });
    }

    document.apply(edits);

    Ok(())
  }
}

impl RelocateOrphanedRulesStage {
  fn append_to_block(
    document: &Document<'_>,
    block: &Block,
    rules: &[Rule],
  ) -> Edit {
    let html = document.as_str();

    let (outer, inner) = document.block_indentation(block);

    let lines = rules
      .iter()
      .map(|rule| format!("{inner}{rule}\n"))
      .collect::<String>();

    let close = block.span.end - 1;
    let line_start = document.line_start(close);

    if html[line_start..close].trim().is_empty() {
      Edit::insert(line_start, lines)
    } else {
      Edit::insert(close, format!("\n{lines}{outer}"))
    }
  }

  fn new_block(
    document: &Document<'_>,
    first: &Orphan,
    rules: &[Rule],
    options: &PatchOptions,
  ) -> Edit {
    let inner = css::indentation(&document.as_str()[first.span.clone()]);

    debug!("no breakpoint block, creating one for relocated rules");

    let mut block = format!("@media {} {{\n", options.media_query.trim());

    for rule in rules {
      block.push_str(&format!("{inner}{rule}\n"));
    }

    block.push_str("}\n");

    Edit::insert(first.span.start, block)
  }

  fn orphans(html: &str) -> Vec<Orphan> {
    css::style_ranges(html)
      .into_iter()
      .flat_map(|css| {
        let offset = css.start;

        css::orphans(&html[css]).into_iter().map(move |orphan| Orphan {
          span: offset + orphan.span.start..offset + orphan.span.end,
          ..orphan
        })
      })
      .collect()
  }
}
