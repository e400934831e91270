// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vea_core::app::AppId;
use vea_core::dependency::InstallStatus;

struct AlwaysOk;
impl EcosystemInstaller for AlwaysOk {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pip
    }
    fn install(&self, target_dir: &Path, name: &str, _version: Option<&str>) -> Result<(), String> {
        std::fs::write(target_dir.join(format!("{name}.marker")), b"ok").map_err(|e| e.to_string())
    }
}

struct AlwaysFails;
impl EcosystemInstaller for AlwaysFails {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }
    fn install(&self, _target_dir: &Path, _name: &str, _version: Option<&str>) -> Result<(), String> {
        Err("boom".to_string())
    }
}

fn app_id() -> AppId {
    AppId::from_string("app-deptest0000000000000")
}

#[test]
fn successful_declared_dependency_installs_and_records_catalog_row() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path().join("catalog"), None).unwrap();
    let installer = DependencyInstaller::new(vec![Box::new(AlwaysOk)]);
    let target = dir.path().join("deps");

    let declared = vec![DependencyDecl { ecosystem: Ecosystem::Pip, name: "flask".to_string(), version: None }];
    let result = installer.install_declared(&catalog, app_id(), &target, &declared);

    assert!(result.is_ok());
    assert!(target.join("flask.marker").exists());
    let rows = catalog.list_dependencies(app_id());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, InstallStatus::Installed);
}

#[test]
fn failed_declared_dependency_fails_overall_and_records_error() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path().join("catalog"), None).unwrap();
    let installer = DependencyInstaller::new(vec![Box::new(AlwaysFails)]);
    let target = dir.path().join("deps");

    let declared = vec![DependencyDecl { ecosystem: Ecosystem::Npm, name: "left-pad".to_string(), version: None }];
    let result = installer.install_declared(&catalog, app_id(), &target, &declared);

    assert_eq!(result, Err(("left-pad".to_string(), "boom".to_string())));
    let rows = catalog.list_dependencies(app_id());
    assert_eq!(rows[0].status, InstallStatus::Failed);
    assert_eq!(rows[0].error.as_deref(), Some("boom"));
}

#[test]
fn unrecognized_ecosystem_fails_without_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path().join("catalog"), None).unwrap();
    let installer = DependencyInstaller::new(vec![]);
    let target = dir.path().join("deps");

    let declared =
        vec![DependencyDecl { ecosystem: Ecosystem::Other("cargo".to_string()), name: "serde".to_string(), version: None }];
    let result = installer.install_declared(&catalog, app_id(), &target, &declared);
    assert!(result.is_err());
}

#[test]
fn auto_detect_never_overrides_declared_failure_policy() {
    let dir = tempfile::tempdir().unwrap();
    let installer = DependencyInstaller::new(vec![Box::new(AlwaysOk)]);
    let target = dir.path().join("deps");
    std::fs::create_dir_all(&target).unwrap();

    installer.auto_detect_and_install(&target, "import requests\nprint('hi')\n");
    assert!(target.join("requests.marker").exists());
}
