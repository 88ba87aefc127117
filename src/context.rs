use super::*;

pub(crate) struct Context<'a> {
  applied: Vec<Defect>,
  html: &'a mut String,
  options: &'a PatchOptions,
  patterns: &'a Patterns,
}

impl<'a> Context<'a> {
  pub(crate) fn applied(&mut self) -> Vec<Defect> {
    mem::take(&mut self.applied)
  }

  pub(crate) fn document(&mut self) -> Document<'_> {
    Document::new(&mut *self.html)
  }

  pub(crate) fn html(&self) -> &str {
    self.html.as_str()
  }

  pub(crate) fn new(
    html: &'a mut String,
    options: &'a PatchOptions,
    patterns: &'a Patterns,
  ) -> Self {
    Self {
      applied: Vec::new(),
      html,
      options,
      patterns,
    }
  }

  pub(crate) fn options(&self) -> &'a PatchOptions {
    self.options
  }

  pub(crate) fn patterns(&self) -> &'a Patterns {
    self.patterns
  }

  pub(crate) fn record(&mut self, defect: Defect) {
    self.applied.push(defect);
  }
}
