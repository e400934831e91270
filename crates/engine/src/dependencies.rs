// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency Installer (C3, spec §4.3).
//!
//! Resolves an Application's declared libraries into a per-app read-only
//! directory (`applications/dependencies/<appId>/`) mounted into the
//! container at Start time. Installation is best-effort per declared
//! dependency, but a Start fails overall if any *declared* dependency
//! fails to resolve.

use std::path::{Path, PathBuf};

use vea_core::app::AppId;
use vea_core::dependency::{Dependency, DependencyDecl, Ecosystem, InstallStatus};
use vea_storage::Catalog;

/// Installs one dependency into `target_dir`. Implementations are
/// pluggable per ecosystem; `PipInstaller` is the only one shipped since
/// the spec's worked example (`print('hi')`) is Python-shaped.
pub trait EcosystemInstaller: Send + Sync {
    fn ecosystem(&self) -> Ecosystem;

    /// Installs `name` (optionally pinned to `version`) into `target_dir`.
    fn install(&self, target_dir: &Path, name: &str, version: Option<&str>) -> Result<(), String>;
}

/// Shells out to `pip install --target <dir> <name>[==<version>]`.
pub struct PipInstaller;

impl EcosystemInstaller for PipInstaller {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pip
    }

    fn install(&self, target_dir: &Path, name: &str, version: Option<&str>) -> Result<(), String> {
        let spec = match version {
            Some(v) => format!("{name}=={v}"),
            None => name.to_string(),
        };
        let output = std::process::Command::new("pip")
            .args(["install", "--target"])
            .arg(target_dir)
            .arg(&spec)
            .output()
            .map_err(|e| format!("failed to spawn pip: {e}"))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
        }
    }
}

/// Resolves declared dependencies for an Application, recording each
/// outcome in the catalog. Returns the first failure's message if any
/// *declared* dependency failed (spec §4.3 policy: overall Start fails).
pub struct DependencyInstaller {
    installers: Vec<Box<dyn EcosystemInstaller>>,
}

impl Default for DependencyInstaller {
    fn default() -> Self {
        Self { installers: vec![Box::new(PipInstaller)] }
    }
}

impl DependencyInstaller {
    pub fn new(installers: Vec<Box<dyn EcosystemInstaller>>) -> Self {
        Self { installers }
    }

    fn installer_for(&self, ecosystem: &Ecosystem) -> Option<&dyn EcosystemInstaller> {
        self.installers.iter().find(|i| &i.ecosystem() == ecosystem).map(|b| b.as_ref())
    }

    /// Materializes every declared dependency of `app_id` into
    /// `target_dir`, writes a manifest, and records each outcome via
    /// `catalog.upsert_dependency`. Returns `Err` with the first failing
    /// dependency's name/message if any declared dependency failed.
    pub fn install_declared(
        &self,
        catalog: &Catalog,
        app_id: AppId,
        target_dir: &Path,
        declared: &[DependencyDecl],
    ) -> Result<(), (String, String)> {
        std::fs::create_dir_all(target_dir).ok();
        self.write_manifest(target_dir, declared);

        let mut first_failure = None;
        for decl in declared {
            let outcome = match self.installer_for(&decl.ecosystem) {
                Some(installer) => installer.install(target_dir, &decl.name, decl.version.as_deref()),
                None => Err(format!("no installer registered for ecosystem {}", decl.ecosystem)),
            };

            let (status, error) = match &outcome {
                Ok(()) => (InstallStatus::Installed, None),
                Err(msg) => (InstallStatus::Failed, Some(msg.clone())),
            };
            let _ = catalog.upsert_dependency(Dependency {
                app_id,
                ecosystem: decl.ecosystem.clone(),
                name: decl.name.clone(),
                version: decl.version.clone(),
                status,
                error: error.clone(),
            });

            if let Err(msg) = outcome {
                if first_failure.is_none() {
                    first_failure = Some((decl.name.clone(), msg));
                }
            }
        }

        match first_failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    /// Best-effort fallback: scans script source for recognized imports
    /// and installs any common packages it finds. Never a substitute for
    /// declared dependencies (spec §4.3) — failures here are swallowed.
    pub fn auto_detect_and_install(&self, target_dir: &Path, source: &str) {
        for package in detect_common_imports(source) {
            if let Some(installer) = self.installer_for(&Ecosystem::Pip) {
                let _ = installer.install(target_dir, &package, None);
            }
        }
    }

    fn write_manifest(&self, target_dir: &Path, declared: &[DependencyDecl]) {
        let manifest: Vec<String> = declared
            .iter()
            .map(|d| match &d.version {
                Some(v) => format!("{}:{}=={}", d.ecosystem, d.name, v),
                None => format!("{}:{}", d.ecosystem, d.name),
            })
            .collect();
        let _ = std::fs::write(manifest_path(target_dir), manifest.join("\n"));
    }
}

fn manifest_path(target_dir: &Path) -> PathBuf {
    target_dir.join("MANIFEST")
}

/// Recognizes a small set of commonly-imported packages whose module name
/// differs from the module name used in `import` statements.
const KNOWN_IMPORTS: &[(&str, &str)] =
    &[("requests", "requests"), ("numpy", "numpy"), ("pandas", "pandas"), ("yaml", "pyyaml")];

fn detect_common_imports(source: &str) -> Vec<String> {
    let mut found = Vec::new();
    for line in source.lines() {
        let trimmed = line.trim();
        let module = trimmed
            .strip_prefix("import ")
            .or_else(|| trimmed.strip_prefix("from "))
            .and_then(|rest| rest.split_whitespace().next())
            .map(|m| m.split('.').next().unwrap_or(m));
        if let Some(module) = module {
            if let Some((_, package)) = KNOWN_IMPORTS.iter().find(|(name, _)| *name == module) {
                if !found.iter().any(|p: &String| p == package) {
                    found.push(package.to_string());
                }
            }
        }
    }
    found
}

#[cfg(test)]
#[path = "dependencies_tests.rs"]
mod tests;
