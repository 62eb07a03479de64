//! Amalgam Merge
//!
//! Merges the declared units of a C/C++ library into one public header and
//! one implementation file.
//!
//! ## Modules
//!
//! - `registry` - Set of inlined file names used to suppress includes
//! - `rewriter` - Per-line include suppression and `#pragma once` stripping
//! - `processor` - Per-unit provenance markers and language-linkage guards
//! - `pipeline` - Rendering and atomic writing of both artifacts
//! - `scan` - Detection of library files missing from the manifest

pub mod pipeline;
pub mod processor;
pub mod registry;
pub mod rewriter;
pub mod scan;

pub use pipeline::{Artifact, CheckReport, EmitReport, Pipeline};
pub use processor::{UnitProcessor, UnitStats, UnmatchedInclude};
pub use registry::IncludeRegistry;
pub use rewriter::{LineAction, LineRewriter};
pub use scan::scan_undeclared;

use amalgam_core::{Config, Result};

/// Amalgamate the library described by `config`
pub fn amalgamate(config: &Config) -> Result<EmitReport> {
    Pipeline::new(config).emit()
}
