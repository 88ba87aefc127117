//! Just enough CSS scanning to find blocks, split rules, and spot lines that
//! sit outside any block. Comments and quoted strings are skipped everywhere
//! braces are counted.

use super::*;

/// A brace-delimited block located in some larger text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
  /// Between the braces, exclusive of both.
  pub(crate) body: Range<usize>,
  /// From the first byte of the prelude through the closing brace.
  pub(crate) span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration {
  pub(crate) property: String,
  pub(crate) value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rule {
  pub(crate) body: RuleBody,
  pub(crate) selector: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RuleBody {
  Declarations(Vec<Declaration>),
  /// A body holding nested blocks, kept verbatim.
  Opaque(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Orphan {
  pub(crate) kind: OrphanKind,
  /// Whole lines, including the trailing newline.
  pub(crate) span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OrphanKind {
  Declaration,
  Rules(Vec<Rule>),
  StrayCloser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LineProfile {
  depth_after: usize,
  depth_before: usize,
  /// The last significant byte before the line, outside comments.
  follows: Option<u8>,
  span: Range<usize>,
  starts_in_comment: bool,
  stray_closers: usize,
}

impl Declaration {
  fn is_for(&self, property: &str) -> bool {
    self.property.eq_ignore_ascii_case(property)
  }
}

impl Rule {
  fn absorb(&mut self, incoming: Rule) {
    match (&mut self.body, incoming.body) {
      (RuleBody::Declarations(current), RuleBody::Declarations(incoming)) => {
        for declaration in incoming {
          match current
            .iter_mut()
            .find(|existing| existing.is_for(&declaration.property))
          {
            Some(existing) => existing.value = declaration.value,
            None => current.push(declaration),
          }
        }
      }
      (body, incoming) => *body = incoming,
    }
  }

  /// The part of `self` that `rules` does not already declare, if any.
  pub(crate) fn missing_from(&self, rules: &[Rule]) -> Option<Rule> {
    let Some(existing) =
      rules.iter().find(|rule| rule.selector == self.selector)
    else {
      return Some(self.clone());
    };

    let (RuleBody::Declarations(present), RuleBody::Declarations(wanted)) =
      (&existing.body, &self.body)
    else {
      return None;
    };

    let missing = wanted
      .iter()
      .filter(|declaration| {
        !present.iter().any(|other| other.is_for(&declaration.property))
      })
      .cloned()
      .collect::<Vec<Declaration>>();

    (!missing.is_empty()).then(|| Rule {
      body: RuleBody::Declarations(missing),
      selector: self.selector.clone(),
    })
  }
}

impl Display for Rule {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &self.body {
      RuleBody::Declarations(declarations) if declarations.is_empty() => {
        write!(f, "{} {{ }}", self.selector)
      }
      RuleBody::Declarations(declarations) => {
        write!(f, "{} {{", self.selector)?;

        for declaration in declarations {
          write!(f, " {}: {};", declaration.property, declaration.value)?;
        }

        write!(f, " }}")
      }
      RuleBody::Opaque(body) => write!(f, "{} {{ {body} }}", self.selector),
    }
  }
}

/// Finds every block whose prelude matches `pattern` inside the `<style>`
/// elements of `html`. The pattern must end at the opening brace.
pub(crate) fn blocks_in_styles(html: &str, pattern: &Regex) -> Vec<Block> {
  let mut blocks = Vec::new();

  for css in style_ranges(html) {
    let text = &html[css.clone()];
    let comments = comment_ranges(text);
    let mut cursor = 0;

    while let Some(found) = pattern.find_at(text, cursor) {
      if let Some(comment) = comments
        .iter()
        .find(|comment| comment.contains(&found.start()))
      {
        cursor = comment.end;
        continue;
      }

      let open = found.end() - 1;

      let Some(close) = matching_brace(text, open) else {
        warn!("unterminated block `{}`", found.as_str().trim());
        break;
      };

      blocks.push(Block {
        body: css.start + open + 1..css.start + close,
        span: css.start + found.start()..css.start + close + 1,
      });

      cursor = close + 1;
    }
  }

  blocks
}

/// Whether every `<style>` element in `html` closes exactly the blocks it
/// opens.
pub(crate) fn braces_balanced(html: &str) -> bool {
  style_ranges(html).into_iter().all(|css| {
    let profiles = line_profiles(&html[css]);

    profiles.iter().all(|profile| profile.stray_closers == 0)
      && profiles.last().is_none_or(|profile| profile.depth_after == 0)
  })
}

fn comment_ranges(css: &str) -> Vec<Range<usize>> {
  let bytes = css.as_bytes();

  let mut ranges = Vec::new();
  let mut index = 0;

  while index < bytes.len() {
    match bytes[index] {
      b'/' if bytes.get(index + 1) == Some(&b'*') => {
        let end = css[index + 2..]
          .find("*/")
          .map_or(bytes.len(), |offset| index + offset + 4);

        ranges.push(index..end);
        index = end;
      }
      quote @ (b'"' | b'\'') => index = skip_string(bytes, index, quote),
      _ => index += 1,
    }
  }

  ranges
}

pub(crate) fn indentation(line: &str) -> &str {
  &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

fn line_profiles(css: &str) -> Vec<LineProfile> {
  let bytes = css.as_bytes();

  let mut profiles = Vec::new();
  let mut depth = 0usize;
  let mut in_comment = false;
  let mut last = None;
  let mut start = 0;

  while start < bytes.len() {
    let end = css[start..]
      .find('\n')
      .map_or(bytes.len(), |offset| start + offset + 1);

    let mut profile = LineProfile {
      depth_after: depth,
      depth_before: depth,
      follows: last,
      span: start..end,
      starts_in_comment: in_comment,
      stray_closers: 0,
    };

    let mut quote = None;
    let mut index = start;

    while index < end {
      let byte = bytes[index];

      if in_comment {
        if byte == b'*' && bytes.get(index + 1) == Some(&b'/') {
          in_comment = false;
          index += 2;
          continue;
        }
      } else if let Some(open) = quote {
        last = Some(byte);

        if byte == b'\\' {
          index += 2;
          continue;
        }

        if byte == open {
          quote = None;
        }
      } else {
        match byte {
          b'/' if bytes.get(index + 1) == Some(&b'*') => {
            in_comment = true;
            index += 2;
            continue;
          }
          b'"' | b'\'' => quote = Some(byte),
          b'{' => depth += 1,
          b'}' if depth == 0 => profile.stray_closers += 1,
          b'}' => depth -= 1,
          _ => {}
        }

        if !byte.is_ascii_whitespace() {
          last = Some(byte);
        }
      }

      index += 1;
    }

    profile.depth_after = depth;
    profiles.push(profile);
    start = end;
  }

  profiles
}

/// Index of the brace closing the block opened at `open`.
pub(crate) fn matching_brace(text: &str, open: usize) -> Option<usize> {
  let bytes = text.as_bytes();

  let mut depth = 0usize;
  let mut index = open;

  while index < bytes.len() {
    match bytes[index] {
      b'/' if bytes.get(index + 1) == Some(&b'*') => {
        index += text[index + 2..].find("*/")? + 4;
        continue;
      }
      quote @ (b'"' | b'\'') => {
        index = skip_string(bytes, index, quote);
        continue;
      }
      b'{' => depth += 1,
      b'}' => {
        depth = depth.checked_sub(1)?;

        if depth == 0 {
          return Some(index);
        }
      }
      _ => {}
    }

    index += 1;
  }

  None
}

/// Builds a pattern matching `@media <query> {` with flexible whitespace.
pub(crate) fn media_query_pattern(query: &str) -> Result<Regex> {
  let mut tokens = Vec::new();
  let mut word = String::new();

  for ch in query.chars() {
    if ch.is_whitespace() || matches!(ch, '(' | ')' | ':' | ',') {
      if !word.is_empty() {
        tokens.push(regex::escape(&mem::take(&mut word)));
      }

      if !ch.is_whitespace() {
        tokens.push(regex::escape(&ch.to_string()));
      }
    } else {
      word.push(ch);
    }
  }

  if !word.is_empty() {
    tokens.push(regex::escape(&word));
  }

  if tokens.is_empty() {
    return Err(Error::InvalidOption("media query is empty".into()));
  }

  Regex::new(&format!(r"(?i)@media\s*{}\s*\{{", tokens.join(r"\s*")))
    .map_err(|error| Error::InvalidOption(error.to_string()))
}

pub(crate) fn merge_rules<I>(groups: I) -> Vec<Rule>
where
  I: IntoIterator<Item = Vec<Rule>>,
{
  let mut merged: Vec<Rule> = Vec::new();

  for rule in groups.into_iter().flatten() {
    match merged
      .iter_mut()
      .find(|existing| existing.selector == rule.selector)
    {
      Some(existing) => existing.absorb(rule),
      None => merged.push(rule),
    }
  }

  merged
}

fn normalize_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Lines of `css` that sit at depth zero but belong inside a block.
///
/// The first non-blank line sets the base indentation. A statement indented
/// deeper while no block is open is orphaned, as is a lone `}` closing
/// nothing. An orphaned rule may span several lines; a line continuing an
/// unfinished statement, such as a selector list, is not an orphan.
pub(crate) fn orphans(css: &str) -> Vec<Orphan> {
  let profiles = line_profiles(css);

  let base = profiles
    .iter()
    .map(|profile| &css[profile.span.clone()])
    .find(|line| !line.trim().is_empty())
    .map_or(0, |line| indentation(line).len());

  let mut orphans = Vec::new();
  let mut index = 0;

  while index < profiles.len() {
    let profile = &profiles[index];

    index += 1;

    if profile.depth_before != 0 || profile.starts_in_comment {
      continue;
    }

    let line = &css[profile.span.clone()];
    let trimmed = line.trim();

    if trimmed.is_empty() {
      continue;
    }

    if profile.stray_closers > 0 {
      if trimmed.bytes().all(|byte| byte == b'}') {
        orphans.push(Orphan {
          kind: OrphanKind::StrayCloser,
          span: profile.span.clone(),
        });
      }

      continue;
    }

    if indentation(line).len() <= base
      || trimmed.starts_with("/*")
      || trimmed.starts_with('@')
      || !matches!(profile.follows, None | Some(b'}' | b';'))
    {
      continue;
    }

    if profile.depth_after == 0 {
      let kind = if trimmed.contains('{') {
        OrphanKind::Rules(parse_rules(trimmed))
      } else {
        OrphanKind::Declaration
      };

      orphans.push(Orphan {
        kind,
        span: profile.span.clone(),
      });

      continue;
    }

    let Some(offset) = profiles[index..]
      .iter()
      .position(|later| later.depth_after == 0)
    else {
      continue;
    };

    let last = &profiles[index + offset];

    if last.stray_closers > 0 {
      continue;
    }

    let span = profile.span.start..last.span.end;

    orphans.push(Orphan {
      kind: OrphanKind::Rules(parse_rules(&css[span.clone()])),
      span,
    });

    index += offset + 1;
  }

  orphans
}

fn parse_body(body: &str) -> RuleBody {
  if find_unquoted(body, 0, b"{").is_some() {
    return RuleBody::Opaque(body.trim().to_owned());
  }

  RuleBody::Declarations(parse_declarations(&strip_comments(body)))
}

fn parse_declarations(body: &str) -> Vec<Declaration> {
  let mut declarations = Vec::new();
  let mut cursor = 0;

  while cursor < body.len() {
    let end = find_unquoted(body, cursor, b";").unwrap_or(body.len());

    if let Some((property, value)) = body[cursor..end].split_once(':') {
      let (property, value) = (property.trim(), value.trim());

      if !property.is_empty() && !value.is_empty() {
        declarations.push(Declaration {
          property: property.to_owned(),
          value: value.to_owned(),
        });
      }
    }

    cursor = end + 1;
  }

  declarations
}

/// Splits a sequence of rules. Statements ending in `;` and stray closers
/// between rules are skipped.
pub(crate) fn parse_rules(css: &str) -> Vec<Rule> {
  located_rules(css).into_iter().map(|(_, rule)| rule).collect()
}

/// Like `parse_rules`, but pairs each rule with where it sits in `css`.
pub(crate) fn located_rules(css: &str) -> Vec<(Block, Rule)> {
  let mut rules = Vec::new();
  let mut cursor = 0;

  while let Some(index) = find_unquoted(css, cursor, b"{;}") {
    if css.as_bytes()[index] != b'{' {
      cursor = index + 1;
      continue;
    }

    let Some(close) = matching_brace(css, index) else {
      break;
    };

    let selector = normalize_whitespace(&strip_comments(&css[cursor..index]));

    if !selector.is_empty() {
      rules.push((
        Block {
          body: index + 1..close,
          span: cursor..close + 1,
        },
        Rule {
          body: parse_body(&css[index + 1..close]),
          selector,
        },
      ));
    }

    cursor = close + 1;
  }

  rules
}

fn find_unquoted(text: &str, from: usize, targets: &[u8]) -> Option<usize> {
  let bytes = text.as_bytes();

  let mut parens = 0usize;
  let mut index = from;

  while index < bytes.len() {
    match bytes[index] {
      b'/' if bytes.get(index + 1) == Some(&b'*') => {
        index += text[index + 2..].find("*/")? + 4;
        continue;
      }
      quote @ (b'"' | b'\'') => {
        index = skip_string(bytes, index, quote);
        continue;
      }
      b'(' => parens += 1,
      b')' => parens = parens.saturating_sub(1),
      byte if parens == 0 && targets.contains(&byte) => return Some(index),
      _ => {}
    }

    index += 1;
  }

  None
}

fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
  let mut index = start + 1;

  while index < bytes.len() {
    match bytes[index] {
      b'\\' => index += 2,
      b'\n' => return index,
      byte if byte == quote => return index + 1,
      _ => index += 1,
    }
  }

  bytes.len()
}

fn strip_comments(text: &str) -> String {
  let mut stripped = String::with_capacity(text.len());
  let mut rest = text;

  while let Some(start) = rest.find("/*") {
    stripped.push_str(&rest[..start]);

    match rest[start + 2..].find("*/") {
      Some(end) => rest = &rest[start + 2 + end + 2..],
      None => rest = "",
    }
  }

  stripped.push_str(rest);
  stripped
}

pub(crate) fn style_ranges(html: &str) -> Vec<Range<usize>> {
  re::STYLE_ELEMENT
    .captures_iter(html)
    .filter_map(|captures| captures.name("css").map(|css| css.range()))
    .collect()
}
