//! Unit Processor
//!
//! Turns one unit's file content into its contribution to an artifact:
//! provenance marker, rewritten lines and the language-linkage guard for
//! C++-only units.

use crate::registry::IncludeRegistry;
use crate::rewriter::{comment_out, LineAction, LineRewriter};
use amalgam_core::{Config, Error, Result, Unit, Variant};
use serde::Serialize;
use tracing::{debug, warn};

/// Opening line of a C++-only region
pub const CPLUSPLUS_BEGIN: &str = "#ifdef __cplusplus\n";
/// Closing line of a C++-only region
pub const CPLUSPLUS_END: &str = "#endif // __cplusplus\n";

/// Provenance marker emitted before each unit
pub fn provenance_marker(unit: &Unit) -> String {
    format!("// FILE: {}\n", unit.display_path())
}

/// A quoted include whose target is not part of the amalgamation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedInclude {
    pub unit: String,
    /// 1-based line number
    pub line: usize,
    pub target: String,
}

/// Per-unit processing statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnitStats {
    pub path: String,
    pub lines: usize,
    pub suppressed: usize,
    pub external: usize,
    pub pragmas_stripped: usize,
    pub unmatched: Vec<UnmatchedInclude>,
}

/// Byte-order mark some editors put at the start of a file
const BOM: char = '\u{feff}';

/// Read a unit's content from the project tree
pub fn read_unit(config: &Config, unit: &Unit) -> Result<String> {
    let full = config.resolve(unit.path());
    let bytes = match std::fs::read(&full) {
        Ok(bytes) => bytes,
        Err(source) => return Err(Error::MissingInput { path: full, source }),
    };
    String::from_utf8(bytes).map_err(|source| Error::InvalidEncoding { path: full, source })
}

/// Processes units into artifact text
pub struct UnitProcessor<'a> {
    registry: &'a IncludeRegistry,
    rewriter: &'a LineRewriter,
}

impl<'a> UnitProcessor<'a> {
    pub fn new(registry: &'a IncludeRegistry, rewriter: &'a LineRewriter) -> Self {
        Self { registry, rewriter }
    }

    /// Append the processed unit to `out`
    pub fn process(&self, unit: &Unit, content: &str, out: &mut String) -> UnitStats {
        let guarded = unit.variant() == Variant::LanguageGuarded;

        if guarded {
            out.push_str(CPLUSPLUS_BEGIN);
        }
        out.push_str(&provenance_marker(unit));

        let stats = self.rewrite(unit, content, out);

        if guarded {
            out.push_str(CPLUSPLUS_END);
        }

        debug!(
            "Processed {}: {} lines, {} suppressed, {} external",
            stats.path, stats.lines, stats.suppressed, stats.external
        );
        stats
    }

    fn rewrite(&self, unit: &Unit, content: &str, out: &mut String) -> UnitStats {
        let mut stats = UnitStats {
            path: unit.display_path(),
            ..UnitStats::default()
        };
        let content = content.strip_prefix(BOM).unwrap_or(content);

        for (idx, line) in content.split_inclusive('\n').enumerate() {
            stats.lines += 1;

            match self.rewriter.classify(line, self.registry) {
                LineAction::Keep => out.push_str(line),
                LineAction::Strip => stats.pragmas_stripped += 1,
                LineAction::Suppress { target } => {
                    debug!("{}:{}: suppressed include of {}", stats.path, idx + 1, target);
                    stats.suppressed += 1;
                    out.push_str(&comment_out(line));
                }
                LineAction::External { target, quoted } => {
                    stats.external += 1;
                    if quoted {
                        warn!(
                            "{}:{}: local include \"{}\" is not part of the amalgamation",
                            stats.path,
                            idx + 1,
                            target
                        );
                        stats.unmatched.push(UnmatchedInclude {
                            unit: stats.path.clone(),
                            line: idx + 1,
                            target: target.to_string(),
                        });
                    }
                    out.push_str(line);
                }
            }
        }

        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }

        stats
    }
}
