//! Undeclared file scan
//!
//! Walks the project tree and reports C/C++ files that the manifest does not
//! declare, to help keep the manifest in sync with the library.

use amalgam_core::Config;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Extensions of implementation files
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

const SKIPPED_DIRS: &[&str] = &["build", "target", "node_modules"];

/// List header and source files under the project root that are not declared
///
/// Paths are relative to the project root and sorted.
pub fn scan_undeclared(config: &Config) -> Vec<PathBuf> {
    let root = config.project_root.as_path();
    let output_dir = config.output_dir();

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped(e, &output_dir))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_candidate(config, e.path()))
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .filter(|rel| !config.manifest.declares(rel))
        .collect();

    found.sort();
    debug!("Found {} undeclared files under {}", found.len(), root.display());
    found
}

fn is_skipped(entry: &DirEntry, output_dir: &Path) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    if entry.path() == output_dir {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)
}

fn is_candidate(config: &Config, path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => config.is_header_extension(ext) || SOURCE_EXTENSIONS.contains(&ext),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amalgam_core::{Manifest, Unit};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_undeclared() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("include")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("amalgamated")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();

        fs::write(root.join("include/api.h"), "").unwrap();
        fs::write(root.join("src/api.cpp"), "").unwrap();
        fs::write(root.join("src/extra.hpp"), "").unwrap();
        fs::write(root.join("src/legacy.c"), "").unwrap();
        fs::write(root.join("src/notes.txt"), "").unwrap();
        fs::write(root.join("amalgamated/catboost.h"), "").unwrap();
        fs::write(root.join(".git/hook.c"), "").unwrap();

        let config = Config {
            project_root: root.to_path_buf(),
            manifest: Manifest::new(vec![
                Unit::header("include/api.h"),
                Unit::source("src/api.cpp"),
            ]),
            ..Config::default()
        };

        let found = scan_undeclared(&config);
        assert_eq!(
            found,
            vec![PathBuf::from("src/extra.hpp"), PathBuf::from("src/legacy.c")]
        );
    }
}
