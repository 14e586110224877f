// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for layercfg.
//!
//! This example demonstrates:
//! - Layering in-memory defaults, environment variables and command-line arguments
//! - Reading values and sections with case-insensitive keys
//! - Converting values with defaults for missing keys
//! - Printing which provider supplied each value
//!
//! To run this example:
//! ```bash
//! export APP_SERVER__PORT="9090"
//! cargo run --example basic_usage -- --logging:level=debug
//! ```

use layercfg::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== layercfg: Basic Usage ===\n");

    let root = ConfigBuilder::new()
        .with_in_memory([
            ("Server:Host", "localhost"),
            ("Server:Port", "8080"),
            ("Logging:Level", "info"),
            ("Features:Metrics", "false"),
        ])
        .with_env_prefix("APP_")
        .add(CommandLineSource::from_env_args())
        .build()?;

    println!("--- Values ---");
    let host = root.get("server:host").unwrap_or_default();
    let port = root.get_value_or("SERVER:PORT", 80u16)?;
    println!("Server: {}:{}", host, port);

    let level = root.get("logging:level").unwrap_or_else(|| "warn".to_string());
    println!("Log level: {}", level);

    let metrics = root.get_value_or("features:metrics", false)?;
    println!("Metrics enabled: {}", metrics);

    println!("\n--- Sections ---");
    let server = root.section("Server");
    for child in server.children() {
        println!(
            "  {} = {}",
            child.path(),
            child.value().unwrap_or_else(|| "<section>".to_string())
        );
    }

    match root.required_section("database") {
        Ok(section) => println!("Database configured at {}", section.path()),
        Err(e) => println!("No database section: {}", e),
    }

    println!("\n--- Winning providers ---");
    print!("{}", root.debug_view());

    Ok(())
}
