use anyhow::{Context, Result};

use tagger_infrastructure::ConfigService;

pub fn run(config_service: &ConfigService) -> Result<()> {
    let path = config_service.path();
    config_service
        .write_template()
        .with_context(|| format!("Failed to write config template to {}", path.display()))?;

    println!("✅ Wrote config template to {}", path.display());
    println!("\n💡 Next steps:");
    println!("  1. Replace the YOUR_* placeholders with your Zotero and Gemini keys");
    println!("  2. Put the taxonomy CSV at the [paths] taxonomy location");
    println!("  3. Run: tagger fetch");
    println!("  4. Run: tagger-review");

    Ok(())
}
