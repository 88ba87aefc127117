use {
  context::Context,
  css::{Block, Orphan, OrphanKind, Rule},
  document::{Document, Edit},
  log::{debug, info, warn},
  patterns::Patterns,
  pipeline::Pipeline,
  rayon::prelude::*,
  regex::Regex,
  scraper::{Html, Selector},
  serde::{Deserialize, Serialize},
  stage::Stage,
  std::{
    collections::HashSet,
    fmt::{self, Display, Formatter},
    fs, io, mem,
    ops::Range,
    path::{Path, PathBuf},
    sync::LazyLock,
  },
  walkdir::WalkDir,
};

pub use crate::{
  defect::Defect,
  discover::{discover, expand},
  error::Error,
  options::{DedupeStrategy, LinkTarget, PatchOptions, PatchOptionsBuilder},
  patch::Patch,
  patcher::Patcher,
  runner::{FileReport, Outcome, RunOptions, Runner, Summary},
  validate::Violation,
};

mod context;
mod css;
mod defect;
mod discover;
mod document;
mod error;
mod options;
mod patch;
mod patcher;
mod patterns;
mod pipeline;
mod re;
mod runner;
mod stage;
mod validate;

pub type Result<T = (), E = Error> = std::result::Result<T, E>;
