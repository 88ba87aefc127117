use super::*;

/// How duplicate breakpoint blocks are collapsed.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DedupeStrategy {
  /// Keep only the last block; unique rules in earlier blocks are lost.
  KeepLast,
  /// Union every block, later declarations winning.
  #[default]
  Merge,
}

/// A placeholder anchor text and the href it should point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
  pub href: String,
  pub text: String,
}

impl LinkTarget {
  pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
    Self {
      href: href.into(),
      text: text.into(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatchOptions {
  pub dedupe_strategy: DedupeStrategy,
  pub defects: Vec<Defect>,
  pub footer_wrapper: String,
  pub link_targets: Vec<LinkTarget>,
  pub media_query: String,
  pub nav_close_marker: String,
  pub placeholder_href: String,
  pub required_media_rules: Vec<String>,
  pub validate: bool,
  pub wrapper_tag: String,
}

impl Default for PatchOptions {
  fn default() -> Self {
    Self {
      dedupe_strategy: DedupeStrategy::Merge,
      defects: Defect::ALL.to_vec(),
      footer_wrapper: r#"<div class="w">"#.to_string(),
      link_targets: vec![
        LinkTarget::new("GitHub", "https://github.com/hoarhouse/KP5D"),
        LinkTarget::new("Docs", "https://kept.work/docs/"),
        LinkTarget::new("Privacy", "https://kept.work/privacy/"),
      ],
      media_query: "(max-width: 768px)".to_string(),
      nav_close_marker: "</nav>".to_string(),
      placeholder_href: "#".to_string(),
      required_media_rules: Vec::new(),
      validate: true,
      wrapper_tag: "main".to_string(),
    }
  }
}

impl PatchOptions {
  #[must_use]
  pub fn builder() -> PatchOptionsBuilder {
    PatchOptionsBuilder::default()
  }

  #[must_use]
  pub fn enables(&self, defect: Defect) -> bool {
    self.defects.contains(&defect)
  }

  /// Reads options from a JSON file; omitted fields keep their defaults.
  pub fn load(path: &Path) -> Result<Self> {
    let json = fs::read_to_string(path).map_err(Error::io(path))?;

    serde_json::from_str(&json).map_err(|source| Error::Config {
      path: path.to_owned(),
      source,
    })
  }
}

#[derive(Default)]
pub struct PatchOptionsBuilder {
  inner: PatchOptions,
}

impl PatchOptionsBuilder {
  #[must_use]
  pub fn build(self) -> PatchOptions {
    self.inner
  }

  #[must_use]
  pub fn dedupe_strategy(self, dedupe_strategy: DedupeStrategy) -> Self {
    Self {
      inner: PatchOptions {
        dedupe_strategy,
        ..self.inner
      },
    }
  }

  #[must_use]
  pub fn defects<I>(self, defects: I) -> Self
  where
    I: IntoIterator<Item = Defect>,
  {
    Self {
      inner: PatchOptions {
        defects: defects.into_iter().collect(),
        ..self.inner
      },
    }
  }

  #[must_use]
  pub fn footer_wrapper(self, footer_wrapper: impl Into<String>) -> Self {
    Self {
      inner: PatchOptions {
        footer_wrapper: footer_wrapper.into(),
        ..self.inner
      },
    }
  }

  #[must_use]
  pub fn link_targets<I>(self, link_targets: I) -> Self
  where
    I: IntoIterator<Item = LinkTarget>,
  {
    Self {
      inner: PatchOptions {
        link_targets: link_targets.into_iter().collect(),
        ..self.inner
      },
    }
  }

  #[must_use]
  pub fn media_query(self, media_query: impl Into<String>) -> Self {
    Self {
      inner: PatchOptions {
        media_query: media_query.into(),
        ..self.inner
      },
    }
  }

  #[must_use]
  pub fn nav_close_marker(self, nav_close_marker: impl Into<String>) -> Self {
    Self {
      inner: PatchOptions {
        nav_close_marker: nav_close_marker.into(),
        ..self.inner
      },
    }
  }

  #[must_use]
  pub fn placeholder_href(self, placeholder_href: impl Into<String>) -> Self {
    Self {
      inner: PatchOptions {
        placeholder_href: placeholder_href.into(),
        ..self.inner
      },
    }
  }

  #[must_use]
  pub fn required_media_rules<I, S>(self, rules: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      inner: PatchOptions {
        required_media_rules: rules.into_iter().map(Into::into).collect(),
        ..self.inner
      },
    }
  }

  #[must_use]
  pub fn validate(self, validate: bool) -> Self {
    Self {
      inner: PatchOptions {
        validate,
        ..self.inner
      },
    }
  }

  #[must_use]
  pub fn wrapper_tag(self, wrapper_tag: impl Into<String>) -> Self {
    Self {
      inner: PatchOptions {
        wrapper_tag: wrapper_tag.into(),
        ..self.inner
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq};

  #[test]
  fn partial_json_keeps_defaults() {
    let options: PatchOptions = serde_json::from_str(
      r#"{ "dedupe_strategy": "keep-last", "defects": ["placeholder-links"] }"#,
    )
    .unwrap();

    assert_eq!(
      options,
      PatchOptions::builder()
        .dedupe_strategy(DedupeStrategy::KeepLast)
        .defects([Defect::PlaceholderLinks])
        .build()
    );
  }

  #[test]
  fn unknown_fields_are_rejected() {
    assert!(
      serde_json::from_str::<PatchOptions>(r#"{ "wraper": "x" }"#).is_err()
    );
  }

  #[test]
  fn defaults_enable_every_defect() {
    let options = PatchOptions::default();

    assert!(Defect::ALL.into_iter().all(|defect| options.enables(defect)));
    assert_eq!(options.link_targets.len(), 3);
  }
}
