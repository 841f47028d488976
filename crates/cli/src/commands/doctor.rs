//! `threadgpt doctor` — Diagnose configuration and connectivity.

use threadgpt_config::AppConfig;
use threadgpt_core::provider::Provider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 ThreadGPT Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if !config_path.exists() {
        println!("  ⚠️  No config file — run `threadgpt onboard` (using defaults)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            println!("\n  ⚠️  1 blocking issue found.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key configured — add api_key or set OPENAI_API_KEY");
        issues += 1;
    }

    if config.discord.bot_token.is_some() {
        println!("  ✅ Discord bot token configured");
    } else {
        println!("  ⚠️  No Discord bot token — `threadgpt reply` will not work");
        issues += 1;
    }

    if config.has_api_key() {
        let provider = threadgpt_providers::build_from_config(&config);
        match provider.health_check().await {
            Ok(true) => println!("  ✅ Completion API reachable at {}", config.api_url),
            Ok(false) => {
                println!("  ⚠️  Completion API at {} answered with an error", config.api_url);
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Completion API unreachable: {e}");
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
