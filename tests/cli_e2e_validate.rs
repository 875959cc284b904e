//! End-to-end tests for the `validate` command
//!
//! These tests invoke the actual CLI binary and validate its behavior
//! from a user's perspective.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Test that --help flag shows help information
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_help() {
    let mut cmd = cargo_bin_cmd!("mta-resolve");

    cmd.arg("validate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Validate a deployment descriptor"));
}

/// Test that a missing descriptor file produces an error
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_missing_descriptor() {
    let mut cmd = cargo_bin_cmd!("mta-resolve");

    cmd.arg("validate")
        .arg("--descriptor")
        .arg("/nonexistent/mtad.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Descriptor file not found"));
}

/// Test that a valid descriptor passes validation
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_valid_descriptor() {
    let temp = assert_fs::TempDir::new().unwrap();
    let descriptor = temp.child("mtad.yaml");
    descriptor
        .write_str(
            r#"
id: com.example.shop
version: 1.0.0
modules:
  - name: web
    type: nodejs
    requires:
      - db
resources:
  - name: db
    type: hdi-container
"#,
        )
        .unwrap();

    let mut cmd = cargo_bin_cmd!("mta-resolve");

    cmd.arg("validate")
        .arg("--descriptor")
        .arg(descriptor.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Descriptor is valid"));
}

/// Test that an unresolvable required dependency is reported
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_reports_missing_dependency() {
    let temp = assert_fs::TempDir::new().unwrap();
    let descriptor = temp.child("mtad.yaml");
    descriptor
        .write_str(
            r#"
id: com.example.shop
version: 1.0.0
modules:
  - name: web
    type: nodejs
    requires:
      - ghost
"#,
        )
        .unwrap();

    let mut cmd = cargo_bin_cmd!("mta-resolve");

    cmd.arg("validate")
        .arg("--descriptor")
        .arg(descriptor.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("ghost"));
}

/// Test that duplicate resource names fail parsing
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_reports_duplicate_resources() {
    let temp = assert_fs::TempDir::new().unwrap();
    let descriptor = temp.child("mtad.yaml");
    descriptor
        .write_str(
            r#"
id: com.example.shop
version: 1.0.0
resources:
  - name: db
  - name: db
"#,
        )
        .unwrap();

    let mut cmd = cargo_bin_cmd!("mta-resolve");

    cmd.arg("validate")
        .arg("--descriptor")
        .arg(descriptor.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Duplicate resource name"));
}

/// Test that a zero-downtime module without a bound container is reported
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_reports_unbound_zdm_module() {
    let temp = assert_fs::TempDir::new().unwrap();
    let descriptor = temp.child("mtad.yaml");
    descriptor
        .write_str(
            r#"
id: com.example.shop
version: 1.0.0
modules:
  - name: shop-db
    type: hdi
    properties:
      zdm-mode: true
"#,
        )
        .unwrap();

    let mut cmd = cargo_bin_cmd!("mta-resolve");

    cmd.arg("validate")
        .arg("--descriptor")
        .arg(descriptor.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("bound to 0 containers"));
}
