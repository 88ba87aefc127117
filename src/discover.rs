use super::*;

/// Finds the articles under a blog directory: `dir/<slug>.html` and
/// `dir/<slug>/index.html`, never the blog's own `dir/index.html`. Sorted by
/// path.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
  let mut paths = Vec::new();

  for entry in WalkDir::new(dir).min_depth(1).max_depth(2) {
    let entry = entry.map_err(|error| Error::Io {
      path: error.path().unwrap_or(dir).to_owned(),
      source: error.into(),
    })?;

    if !entry.file_type().is_file() {
      continue;
    }

    let name = entry.file_name().to_string_lossy();

    let article = match entry.depth() {
      1 => name.ends_with(".html") && name != "index.html",
      _ => name == "index.html",
    };

    if article {
      paths.push(entry.into_path());
    }
  }

  paths.sort();

  debug!("discovered {} articles in `{}`", paths.len(), dir.display());

  Ok(paths)
}

/// Replaces every directory in `inputs` with the articles it contains and
/// drops paths naming a file already listed, keeping first occurrences in
/// order. Paths are compared after canonicalization, so `dir/./a.html` and
/// `dir/sub/../a.html` both repeat `dir/a.html`.
pub fn expand(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
  let mut seen = HashSet::new();
  let mut paths = Vec::new();

  for input in inputs {
    let found = if input.is_dir() {
      discover(input)?
    } else {
      vec![input.clone()]
    };

    for path in found {
      let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());

      if seen.insert(key) {
        paths.push(path);
      }
    }
  }

  Ok(paths)
}
