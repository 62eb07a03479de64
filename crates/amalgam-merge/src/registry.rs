//! Include Registry
//!
//! The set of file names whose content is physically inlined into the
//! amalgamation. Include directives naming one of them are suppressed.

use amalgam_core::{Config, Role, Unit};
use std::collections::HashSet;
use tracing::debug;

/// Basenames of every inlined file
///
/// Membership test only. Output order never depends on this set.
#[derive(Debug, Clone, Default)]
pub struct IncludeRegistry {
    names: HashSet<String>,
}

impl IncludeRegistry {
    /// Build the registry from the full declared unit list
    ///
    /// Header units are always registered. Source units are registered only
    /// when their extension is header-style (internal headers being inlined).
    pub fn build<'a>(
        units: impl IntoIterator<Item = &'a Unit>,
        header_extensions: &[String],
    ) -> Self {
        let mut names = HashSet::new();

        for unit in units {
            let registered = match unit.role() {
                Role::Header => true,
                Role::Source => unit
                    .extension()
                    .map(|ext| header_extensions.iter().any(|h| h == ext))
                    .unwrap_or(false),
            };

            if !registered {
                continue;
            }

            if let Some(name) = unit.basename() {
                debug!("Registered {} from {}", name, unit.display_path());
                names.insert(name.to_string());
            }
        }

        Self { names }
    }

    /// Build the registry for a configuration's manifest
    pub fn from_config(config: &Config) -> Self {
        Self::build(&config.manifest.units, &config.header_extensions)
    }

    /// Whether a basename is inlined
    pub fn contains(&self, basename: &str) -> bool {
        self.names.contains(basename)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered names in sorted order, for diagnostics
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
