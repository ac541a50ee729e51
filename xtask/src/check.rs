use anyhow::Result;
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

use crate::{cargo, TARGET};

/// Crates that must stay `no_std` on the target.
const CORE_CRATES: [&str; 3] = ["platform", "timebase", "sequencer"];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    cargo(
        "Hardware target (STM32G431)",
        &["check", "-p", "firmware", "--target", TARGET, "--features", "hardware"],
    )?;
    cargo(
        "Emulator target (host)",
        &["check", "-p", "firmware", "--features", "emulator", "--examples"],
    )?;
    for krate in CORE_CRATES {
        cargo(
            &format!("{krate} (no_std)"),
            &["check", "-p", krate, "--target", TARGET, "--features", "defmt"],
        )?;
    }
    println!();

    // Lints and formatting are reported, not fatal.
    println!("{}", "  Running clippy lints...".cyan());
    let clippy = Command::new("cargo")
        .args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
        .output()?;
    if clippy.status.success() {
        println!("{}", "  ✓ Clippy passed".green());
    } else {
        eprintln!("{}", "  ⚠ Clippy warnings found".yellow().bold());
        eprintln!("{}", String::from_utf8_lossy(&clippy.stderr));
    }

    let fmt = Command::new("cargo").args(["fmt", "--all", "--check"]).output()?;
    if fmt.status.success() {
        println!("{}", "  ✓ Formatting check passed".green());
    } else {
        eprintln!("{}", "  ⚠ Formatting issues found".yellow().bold());
        eprintln!("     Run 'cargo fmt --all' to fix");
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
