use anyhow::Result;
use colored::Colorize;

use crate::cargo;

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    let mut args = vec!["doc", "--workspace", "--no-deps", "--document-private-items"];
    if open {
        args.push("--open");
    }
    cargo("Documentation", &args)?;

    if !open {
        println!();
        println!(
            "   {}",
            "Open target/doc/firmware/index.html in your browser".dimmed()
        );
    }
    println!();

    Ok(())
}
