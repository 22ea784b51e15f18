//! Config command handler.

use noteport::config::NoteportConfig;

/// Config command.
pub fn cmd_config(config: &NoteportConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !show {
        println!("Use --show to display the current configuration.");
        return Ok(());
    }

    println!("Current Configuration");
    println!("=====================");
    println!();

    println!("Config Files Loaded:");
    if config.config_sources.is_empty() {
        println!("  (none - using defaults)");
    } else {
        for source in &config.config_sources {
            println!("  - {}", source.display());
        }
    }
    println!();

    print!("{config}");
    Ok(())
}
