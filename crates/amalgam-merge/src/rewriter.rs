//! Line Rewriter
//!
//! Per-line rules applied while inlining a unit: `#pragma once` markers are
//! dropped and include directives naming an inlined file are commented out.

use crate::registry::IncludeRegistry;
use regex::Regex;

/// What happens to one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction<'a> {
    /// Copy the line verbatim
    Keep,
    /// Drop the line (compile-once marker)
    Strip,
    /// Render the line as an inert comment, its target is inlined
    Suppress { target: &'a str },
    /// Include of a file outside the amalgamation, copied verbatim
    External { target: &'a str, quoted: bool },
}

/// Include/pragma line rewriter
pub struct LineRewriter {
    include: Regex,
    pragma_once: Regex,
}

impl LineRewriter {
    /// Create a new rewriter
    pub fn new() -> Self {
        Self {
            include: Regex::new(r#"^\s*#\s*include\s*([<"])([^">]*)[">]"#).unwrap(),
            pragma_once: Regex::new(r"^\s*#\s*pragma\s+once\s*(?://.*|/\*.*)?$").unwrap(),
        }
    }

    /// Classify a line (with or without its line terminator)
    pub fn classify<'a>(&self, line: &'a str, registry: &IncludeRegistry) -> LineAction<'a> {
        let body = line.trim_end_matches(['\n', '\r']);

        if let Some(caps) = self.include.captures(body) {
            let quoted = &caps[1] == "\"";
            let target = caps.get(2).map_or("", |m| m.as_str());

            return if registry.contains(basename(target)) {
                LineAction::Suppress { target }
            } else {
                LineAction::External { target, quoted }
            };
        }

        if self.pragma_once.is_match(body) {
            return LineAction::Strip;
        }

        LineAction::Keep
    }
}

impl Default for LineRewriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Rendering of a suppressed directive
pub fn comment_out(line: &str) -> String {
    format!("// {}", line)
}

/// File name part of an include target
pub fn basename(target: &str) -> &str {
    target.rsplit(['/', '\\']).next().unwrap_or(target)
}
