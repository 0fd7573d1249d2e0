//! Unit tests - runs cargo test on each crate with its std feature
//!
//! Everything runs on the host against the simulated registers and
//! interrupt controller; no board is needed.

use anyhow::{Context, Result, bail};

use crate::cli::Package;

pub fn run(only: Option<Package>, verbose_dispatch: bool) -> Result<()> {
    println!("=== Unit Tests ===\n");

    let packages = match only {
        Some(package) => vec![package],
        None => Package::ALL.to_vec(),
    };

    for package in packages {
        let name = package.crate_name();
        println!("Running {name} tests...");

        let mut features = Vec::new();
        if package.has_std_feature() {
            features.push("std");
        }
        if verbose_dispatch && matches!(package, Package::Timer) {
            features.push("verbose-dispatch");
        }

        let mut cmd = crate::util::repo::cargo()?;
        cmd.args(["test", "-p", name]);
        if !features.is_empty() {
            cmd.args(["--features", &features.join(",")]);
        }

        let status = cmd.status().with_context(|| format!("Failed to run {name} tests"))?;
        if !status.success() {
            bail!("{name} tests failed");
        }
        println!();
    }

    println!("All unit tests passed\n");
    Ok(())
}
