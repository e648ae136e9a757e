//! The `lettura init` command.

use anyhow::Result;

use lettura_providers::config::STARTER_CONFIG;

pub fn execute() -> Result<()> {
    if std::path::Path::new("lettura.toml").exists() {
        println!("lettura.toml already exists, skipping.");
        return Ok(());
    }

    std::fs::write("lettura.toml", STARTER_CONFIG)?;
    println!("Created lettura.toml");

    println!("\nNext steps:");
    println!("  1. Pick a translator in lettura.toml (google or libretranslate)");
    println!("  2. Run: lettura study --user <name>");
    println!("  3. Run: lettura history --user <name>");

    Ok(())
}
