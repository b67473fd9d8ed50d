use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{glob, Pattern};

pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs"];
pub const DEFAULT_IGNORE: &[&str] = &["**/node_modules/**"];

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.trim_start_matches('.') == e))
}

fn is_ignored(path: &Path, ignore: &[Pattern]) -> bool {
    let p = path.to_string_lossy().replace('\\', "/");
    ignore.iter().any(|pat| pat.matches(&p))
}

fn to_glob(dir: &Path) -> String {
    let root = dir.to_string_lossy().replace('\\', "/");
    format!("{}/**/*", Pattern::escape(root.trim_end_matches('/')))
}

/// Expands files, directories and glob patterns into the sorted list of
/// source files to transform. Explicit files are taken whatever their
/// extension; directories and globs only yield files with `extensions`.
pub fn collect_inputs(inputs: &[String], extensions: &[String], ignore: &[String]) -> Result<Vec<PathBuf>> {
    let ignore: Vec<Pattern> = ignore
        .iter()
        .map(|g| Pattern::new(g).with_context(|| format!("bad ignore pattern: {}", g)))
        .collect::<Result<_>>()?;
    let mut out: BTreeSet<PathBuf> = BTreeSet::new();
    for raw in inputs {
        let path = Path::new(raw);
        if path.is_file() {
            out.insert(path.to_path_buf());
            continue;
        }
        let pattern = if path.is_dir() { to_glob(path) } else { raw.clone() };
        for found in glob(&pattern)
            .with_context(|| format!("bad glob pattern: {}", pattern))?
            .flatten()
        {
            if found.is_file() && has_extension(&found, extensions) && !is_ignored(&found, &ignore) {
                out.insert(found);
            }
        }
    }
    Ok(out.into_iter().collect())
}
