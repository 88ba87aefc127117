use super::*;

mod dedupe_media_queries;
mod ensure_media_rules;
mod insert_content_wrapper;
mod normalize_footer_nesting;
mod relocate_orphaned_rules;
mod rewrite_placeholder_links;

pub(crate) use {
  dedupe_media_queries::DedupeMediaQueriesStage,
  ensure_media_rules::EnsureMediaRulesStage,
  insert_content_wrapper::InsertContentWrapperStage,
  normalize_footer_nesting::NormalizeFooterNestingStage,
  relocate_orphaned_rules::RelocateOrphanedRulesStage,
  rewrite_placeholder_links::RewritePlaceholderLinksStage,
};

pub(crate) trait Stage {
  fn defect(&self) -> Defect;

  fn run(&mut self, context: &mut Context<'_>) -> Result;
}

pub(crate) fn for_defect(defect: Defect) -> Box<dyn Stage> {
  match defect {
    Defect::DuplicateMediaQuery => Box::new(DedupeMediaQueriesStage),
    Defect::MissingWrapper => Box::new(InsertContentWrapperStage),
    Defect::FooterNesting => Box::new(NormalizeFooterNestingStage),
    Defect::PlaceholderLinks => Box::new(RewritePlaceholderLinksStage),
    Defect::OrphanedRules => Box::new(RelocateOrphanedRulesStage),
    Defect::MissingMediaRules => Box::new(EnsureMediaRulesStage),
  }
}

#[cfg(test)]
pub(crate) fn run_stage(
  mut stage: impl Stage,
  html: &str,
  options: &PatchOptions,
) -> String {
  let patterns = Patterns::compile(options).unwrap();

  let mut html = html.to_owned();

  let mut context = Context::new(&mut html, options, &patterns);

  stage.run(&mut context).unwrap();

  html
}
