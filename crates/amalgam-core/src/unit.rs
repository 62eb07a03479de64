//! Amalgamation units
//!
//! A unit is one input file of the library together with the output stream
//! it belongs to and the way it is wrapped when emitted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which output artifact a unit is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Public header, goes into the generated header
    Header,
    /// Implementation unit, goes into the generated source file
    Source,
}

/// How a unit's processed content is wrapped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Provenance marker followed by the content
    #[default]
    Plain,
    /// Content only visible to a C++ compiler (`#ifdef __cplusplus`)
    LanguageGuarded,
}

/// One input file of the amalgamation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Path relative to the project root
    path: PathBuf,
    role: Role,
    #[serde(default)]
    variant: Variant,
}

impl Unit {
    /// Create a unit
    pub fn new(path: impl Into<PathBuf>, role: Role, variant: Variant) -> Self {
        Self {
            path: path.into(),
            role,
            variant,
        }
    }

    /// Plain header unit
    pub fn header(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Role::Header, Variant::Plain)
    }

    /// Header unit wrapped in a C++-only region
    pub fn guarded_header(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Role::Header, Variant::LanguageGuarded)
    }

    /// Plain source unit
    pub fn source(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Role::Source, Variant::Plain)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// File name without its directory, as used by include directives
    pub fn basename(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// File extension, if any
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    /// Path rendered with forward slashes, for provenance markers
    pub fn display_path(&self) -> String {
        self.path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Ordered list of declared units
///
/// Declared order is the only thing that decides output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl Manifest {
    /// Create a manifest from an ordered unit list
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units }
    }

    /// The layout of the catboost evaluation library
    pub fn builtin() -> Self {
        Self::new(vec![
            Unit::guarded_header("include/catboost.hpp"),
            Unit::header("include/cb.h"),
            Unit::source("src/vec4.hpp"),
            Unit::source("src/json.hpp"),
            Unit::source("src/catboost.cpp"),
            Unit::source("src/cb.cpp"),
        ])
    }

    /// Header units in declared order
    pub fn headers(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.role == Role::Header)
    }

    /// Source units in declared order
    pub fn sources(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.role == Role::Source)
    }

    /// Whether a path (relative to the project root) is declared
    pub fn declares(&self, path: &Path) -> bool {
        self.units.iter().any(|u| u.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }
}
