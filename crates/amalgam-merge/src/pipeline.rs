//! Emission Pipeline
//!
//! Builds the include registry, renders the public header and the
//! implementation file from the declared units, and writes both artifacts.
//!
//! Both artifacts are rendered in memory before anything touches the
//! destination, and each one is written to a temporary file that is renamed
//! over the final name only once it is complete.

use crate::processor::{read_unit, UnitProcessor, UnitStats, UnmatchedInclude};
use crate::registry::IncludeRegistry;
use crate::rewriter::LineRewriter;
use amalgam_core::{Config, Error, Result, Unit};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Single-inclusion guard at the top of the public header
pub const PRAGMA_ONCE: &str = "#pragma once\n";

/// Disclaimer banner opening both artifacts
pub fn banner(generator: &str) -> String {
    format!("// This file is generated by {}. Do not edit.\n", generator)
}

/// A fully rendered output file
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
    pub units: Vec<UnitStats>,
}

impl Artifact {
    /// Write the artifact, replacing any previous version atomically
    pub fn write(&self) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let output_err = |source| Error::OutputWrite {
            path: self.path.clone(),
            source,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(output_err)?;
        tmp.write_all(self.content.as_bytes()).map_err(output_err)?;
        let perms = self.permissions(tmp.as_file()).map_err(output_err)?;
        tmp.as_file().set_permissions(perms).map_err(output_err)?;
        tmp.as_file().sync_all().map_err(output_err)?;
        tmp.persist(&self.path).map_err(|e| output_err(e.error))?;

        info!("Wrote {} ({} bytes)", self.path.display(), self.content.len());
        Ok(())
    }

    /// Permissions for the written file
    ///
    /// A replaced artifact keeps its mode; a new one is created 0644 on unix,
    /// never the owner-only mode of the temporary file.
    fn permissions(&self, tmp: &std::fs::File) -> std::io::Result<std::fs::Permissions> {
        if let Ok(meta) = std::fs::metadata(&self.path) {
            return Ok(meta.permissions());
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = tmp;
            Ok(std::fs::Permissions::from_mode(0o644))
        }

        #[cfg(not(unix))]
        {
            Ok(tmp.metadata()?.permissions())
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct EmitReport {
    pub header: PathBuf,
    pub source: PathBuf,
    pub registry_size: usize,
    pub header_units: Vec<UnitStats>,
    pub source_units: Vec<UnitStats>,
}

impl EmitReport {
    pub fn suppressed(&self) -> usize {
        self.all_units().map(|u| u.suppressed).sum()
    }

    pub fn pragmas_stripped(&self) -> usize {
        self.all_units().map(|u| u.pragmas_stripped).sum()
    }

    pub fn unmatched(&self) -> Vec<&UnmatchedInclude> {
        self.all_units().flat_map(|u| u.unmatched.iter()).collect()
    }

    fn all_units(&self) -> impl Iterator<Item = &UnitStats> {
        self.header_units.iter().chain(self.source_units.iter())
    }
}

/// Result of a dry run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub registry: Vec<String>,
    pub missing: Vec<PathBuf>,
    /// Units that exist but are not valid UTF-8
    pub invalid: Vec<PathBuf>,
    pub units: Vec<UnitStats>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    pub fn unmatched(&self) -> Vec<&UnmatchedInclude> {
        self.units.iter().flat_map(|u| u.unmatched.iter()).collect()
    }
}

/// Amalgamation pipeline over one configuration
pub struct Pipeline<'a> {
    config: &'a Config,
    rewriter: LineRewriter,
}

impl<'a> Pipeline<'a> {
    /// Create a new pipeline
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            rewriter: LineRewriter::new(),
        }
    }

    /// Build the registry from every declared unit
    pub fn registry(&self) -> IncludeRegistry {
        IncludeRegistry::from_config(self.config)
    }

    /// Render the public header
    pub fn render_header(&self, registry: &IncludeRegistry) -> Result<Artifact> {
        let mut content = String::new();
        content.push_str(PRAGMA_ONCE);
        content.push_str(&banner(&self.config.output.generator));

        let units = self.render_units(self.config.manifest.headers(), registry, &mut content)?;

        Ok(Artifact {
            path: self.config.header_path(),
            content,
            units,
        })
    }

    /// Render the implementation file
    pub fn render_source(&self, registry: &IncludeRegistry) -> Result<Artifact> {
        let mut content = String::new();
        content.push_str(&banner(&self.config.output.generator));
        content.push_str(&format!("#include \"{}\"\n", self.config.output.header_name));

        let units = self.render_units(self.config.manifest.sources(), registry, &mut content)?;

        Ok(Artifact {
            path: self.config.source_path(),
            content,
            units,
        })
    }

    fn render_units<'u>(
        &self,
        units: impl Iterator<Item = &'u Unit>,
        registry: &IncludeRegistry,
        out: &mut String,
    ) -> Result<Vec<UnitStats>> {
        let processor = UnitProcessor::new(registry, &self.rewriter);
        let mut stats = Vec::new();

        for unit in units {
            let content = read_unit(self.config, unit)?;
            stats.push(processor.process(unit, &content, out));
        }

        Ok(stats)
    }

    /// Run the whole amalgamation
    pub fn emit(&self) -> Result<EmitReport> {
        let registry = self.registry();
        debug!("Include registry has {} entries", registry.len());

        let header = self.render_header(&registry)?;
        let source = self.render_source(&registry)?;

        let dir = self.config.output_dir();
        std::fs::create_dir_all(&dir).map_err(|source| Error::OutputWrite {
            path: dir.clone(),
            source,
        })?;

        header.write()?;
        source.write()?;

        Ok(EmitReport {
            header: header.path,
            source: source.path,
            registry_size: registry.len(),
            header_units: header.units,
            source_units: source.units,
        })
    }

    /// Process every unit without writing anything
    ///
    /// Unlike [`Pipeline::emit`], missing and non-UTF-8 inputs are collected
    /// instead of aborting at the first one.
    pub fn check(&self) -> CheckReport {
        let registry = self.registry();
        let processor = UnitProcessor::new(&registry, &self.rewriter);
        let mut report = CheckReport {
            registry: registry.sorted_names().into_iter().map(String::from).collect(),
            ..CheckReport::default()
        };

        let ordered = self
            .config
            .manifest
            .headers()
            .chain(self.config.manifest.sources());

        for unit in ordered {
            match read_unit(self.config, unit) {
                Ok(content) => {
                    let mut sink = String::new();
                    report.units.push(processor.process(unit, &content, &mut sink));
                }
                Err(e @ Error::InvalidEncoding { .. }) => {
                    debug!("Check failed for {}: {}", unit.display_path(), e);
                    report.invalid.push(unit.path().to_path_buf());
                }
                Err(e) => {
                    debug!("Check failed for {}: {}", unit.display_path(), e);
                    report.missing.push(unit.path().to_path_buf());
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner() {
        assert_eq!(
            banner("amalgamate"),
            "// This file is generated by amalgamate. Do not edit.\n"
        );
    }

    #[test]
    fn test_empty_manifest() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = Config {
            project_root: temp.path().to_path_buf(),
            ..Config::default()
        };

        let report = Pipeline::new(&config).emit().unwrap();
        let header = std::fs::read_to_string(&report.header).unwrap();
        let source = std::fs::read_to_string(&report.source).unwrap();

        assert_eq!(
            header,
            "#pragma once\n// This file is generated by amalgamate. Do not edit.\n"
        );
        assert_eq!(
            source,
            "// This file is generated by amalgamate. Do not edit.\n#include \"catboost.h\"\n"
        );
    }
}
