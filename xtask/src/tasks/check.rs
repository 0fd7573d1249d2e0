//! Cross-build of the driver crates for the board.
//!
//! Catches anything that only compiles with std, plus the target-only
//! interrupt masking path.

use anyhow::{Context, Result, bail};

use crate::cli::Package;

pub fn run(target: &str, release: bool) -> Result<()> {
    println!("=== Firmware check ({target}) ===\n");

    for package in Package::ALL {
        let name = package.crate_name();
        let mut cmd = crate::util::repo::cargo()?;
        cmd.args(["build", "-p", name, "--target", target]);
        if release {
            cmd.arg("--release");
        }

        let status = cmd.status().with_context(|| format!("Failed to build {name}"))?;
        if !status.success() {
            bail!("{name} does not build for {target}");
        }
        println!("[OK] {name}");
    }

    println!("\nFirmware crates build for {target}\n");
    Ok(())
}
