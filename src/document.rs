use super::*;

/// A replacement of `range` with `text`, applied against the document as it
/// was when the edit was computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
  pub(crate) range: Range<usize>,
  pub(crate) text: String,
}

impl Edit {
  pub(crate) fn delete(range: Range<usize>) -> Self {
    Self {
      range,
      text: String::new(),
    }
  }

  pub(crate) fn insert(at: usize, text: impl Into<String>) -> Self {
    Self {
      range: at..at,
      text: text.into(),
    }
  }

  pub(crate) fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
    Self {
      range,
      text: text.into(),
    }
  }
}

pub(crate) struct Document<'a> {
  html: &'a mut String,
}

impl<'a> Document<'a> {
  /// Applies non-overlapping edits, back to front so earlier offsets stay
  /// valid.
  pub(crate) fn apply(&mut self, mut edits: Vec<Edit>) {
    edits.sort_by(|a, b| {
      b.range
        .start
        .cmp(&a.range.start)
        .then(b.range.end.cmp(&a.range.end))
    });

    for edit in edits {
      self.html.replace_range(edit.range, &edit.text);
    }
  }

  pub(crate) fn as_str(&self) -> &str {
    self.html.as_str()
  }

  /// Indentation of the line opening `block`, and of its first non-blank
  /// body line (one level deeper than the opener when the body is empty).
  pub(crate) fn block_indentation(&self, block: &Block) -> (String, String) {
    let html = self.as_str();

    let outer =
      css::indentation(&html[self.line_start(block.span.start)..]).to_owned();

    let inner = html[block.body.clone()]
      .lines()
      .find(|line| !line.trim().is_empty())
      .map_or_else(
        || format!("{outer}  "),
        |line| css::indentation(line).to_owned(),
      );

    (outer, inner)
  }

  /// Widens `range` to the full lines it covers when nothing but blanks
  /// share those lines with it.
  pub(crate) fn line_extent(&self, range: Range<usize>) -> Range<usize> {
    let html = self.html.as_str();

    let line_start = html[..range.start].rfind('\n').map_or(0, |i| i + 1);

    let line_end = html[range.end..]
      .find('\n')
      .map_or(html.len(), |i| range.end + i + 1);

    if html[line_start..range.start].trim().is_empty()
      && html[range.end..line_end].trim().is_empty()
    {
      line_start..line_end
    } else {
      range
    }
  }

  pub(crate) fn line_start(&self, index: usize) -> usize {
    self.html[..index].rfind('\n').map_or(0, |i| i + 1)
  }

  pub(crate) fn media_blocks(&self, pattern: &Regex) -> Vec<Block> {
    css::blocks_in_styles(self.html.as_str(), pattern)
  }

  pub(crate) fn new(html: &'a mut String) -> Self {
    Document { html }
  }
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq};

  #[test]
  fn applies_edits_in_any_order() {
    let mut html = "<p>one</p><p>two</p>".to_string();

    Document::new(&mut html).apply(vec![
      Edit::insert(0, "<main>"),
      Edit::replace(13..16, "2"),
      Edit::delete(3..6),
      Edit::insert(20, "</main>"),
    ]);

    assert_eq!(html, "<main><p></p><p>2</p></main>");
  }

  #[test]
  fn block_indentation_reads_opener_and_body() {
    let mut html =
      "<style>\n  @media x {\n      .a { b: c; }\n  }\n</style>".to_string();

    let pattern = Regex::new(r"@media x \{").unwrap();

    let document = Document::new(&mut html);

    let block = document.media_blocks(&pattern).remove(0);

    assert_eq!(
      document.block_indentation(&block),
      ("  ".to_string(), "      ".to_string())
    );
  }

  #[test]
  fn block_indentation_defaults_inner_one_level_deeper() {
    let mut html = "<style>\n\t@media x {}\n</style>".to_string();

    let pattern = Regex::new(r"@media x \{").unwrap();

    let document = Document::new(&mut html);

    let block = document.media_blocks(&pattern).remove(0);

    assert_eq!(
      document.block_indentation(&block),
      ("\t".to_string(), "\t  ".to_string())
    );
  }

  #[test]
  fn line_extent_covers_whole_lines_only() {
    let mut html = "a\n  @media x { }  \nb { }\n".to_string();

    let document = Document::new(&mut html);

    assert_eq!(document.line_extent(4..16), 2..19);
    assert_eq!(document.line_extent(19..20), 19..20);
  }
}
