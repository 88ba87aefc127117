use super::*;

pub(crate) static ANCHOR_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<a(?P<attrs>\s[^>]*)>(?P<text>[^<]*)</a\s*>").unwrap()
});

pub(crate) static HREF_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?i)\shref\s*=\s*(?:"(?P<double>[^"]*)"|'(?P<single>[^']*)')"#)
    .unwrap()
});

pub(crate) static LINE_START_FOOTER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?mi)^[ \t]*<footer(?:\s[^>]*)?>").unwrap());

pub(crate) static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^<(?P<name>[A-Za-z][A-Za-z0-9-]*)(?:\s[^<>]*)?>$").unwrap()
});

pub(crate) static STYLE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<style(?:\s[^>]*)?>(?P<css>.*?)</style\s*>").unwrap()
});

pub(crate) static TAG_NAME: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap());

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn anchor_element_captures_attributes_and_text() {
    let captures = ANCHOR_ELEMENT
      .captures(r##"<a class="f" href="#">GitHub</a>"##)
      .expect("anchor should match");

    assert_eq!(&captures["attrs"], r##" class="f" href="#""##);
    assert_eq!(&captures["text"], "GitHub");
  }

  #[test]
  fn anchor_element_skips_anchors_with_markup_inside() {
    assert!(!ANCHOR_ELEMENT.is_match(r##"<a href="#"><b>Docs</b></a>"##));
  }

  #[test]
  fn href_attribute_accepts_both_quote_styles() {
    let double = HREF_ATTRIBUTE.captures(r##" href="#""##).unwrap();
    let single = HREF_ATTRIBUTE.captures(" href='#'").unwrap();

    assert_eq!(double.name("double").unwrap().as_str(), "#");
    assert_eq!(single.name("single").unwrap().as_str(), "#");
  }

  #[test]
  fn href_attribute_ignores_data_href() {
    assert!(!HREF_ATTRIBUTE.is_match(r##" data-href="#""##));
  }

  #[test]
  fn line_start_footer_requires_only_indentation_before_tag() {
    assert!(LINE_START_FOOTER.is_match("<p>x</p>\n  <footer>\n"));
    assert!(!LINE_START_FOOTER.is_match("<p>x</p><footer>"));
  }

  #[test]
  fn start_tag_extracts_element_name() {
    let captures = START_TAG.captures(r#"<div class="w">"#).unwrap();

    assert_eq!(&captures["name"], "div");
    assert!(!START_TAG.is_match("div"));
    assert!(!START_TAG.is_match("</div>"));
  }

  #[test]
  fn style_element_captures_css_lazily() {
    let html = "<style>a{}</style><p></p><style media=\"x\">b{}</style>";

    let bodies = STYLE_ELEMENT
      .captures_iter(html)
      .map(|captures| captures["css"].to_owned())
      .collect::<Vec<String>>();

    assert_eq!(bodies, vec!["a{}", "b{}"]);
  }
}
