use anyhow::{Context, Result, bail};
use std::process::Command;

use crate::cli::FIRMWARE_TARGET;

pub fn run() -> Result<()> {
    let mut ok = true;

    let rustc = Command::new("rustc")
        .arg("--version")
        .output()
        .context("Failed to run rustc")?;
    if rustc.status.success() {
        eprintln!("[OK] {}", String::from_utf8_lossy(&rustc.stdout).trim());
    } else {
        eprintln!("[FAIL] rustc --version");
        ok = false;
    }

    match Command::new("rustup").args(["target", "list", "--installed"]).output() {
        Ok(out)
            if String::from_utf8_lossy(&out.stdout)
                .lines()
                .any(|t| t.trim() == FIRMWARE_TARGET) =>
        {
            eprintln!("[OK] target {FIRMWARE_TARGET}");
        }
        Ok(_) => {
            eprintln!("[FAIL] missing target: rustup target add {FIRMWARE_TARGET}");
            ok = false;
        }
        Err(_) => eprintln!("[SKIP] rustup not found; cannot list installed targets"),
    }

    if !ok {
        bail!("doctor checks failed");
    }
    Ok(())
}
