//! `threadgpt onboard` — First-time setup.

use threadgpt_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();

    println!("🧵 ThreadGPT — First-Time Setup");
    println!("===============================\n");

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    AppConfig::write_default(&config_path)?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Add api_key (or set OPENAI_API_KEY)");
    println!("   2. Add discord.bot_token (or set DISCORD_BOT_TOKEN) to answer threads");
    println!("   3. Run: threadgpt doctor\n");

    println!("🎉 Setup complete! Run `threadgpt chat` to try the relay locally.\n");

    Ok(())
}
