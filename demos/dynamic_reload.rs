// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamic configuration reload example.
//!
//! This example demonstrates:
//! - Reloading a YAML file when it changes on disk
//! - Following every reload with `on_change`
//! - Re-binding a typed view after each change
//!
//! To run this example:
//! ```bash
//! cargo run --example dynamic_reload --features yaml,reload
//!
//! # In another terminal, modify the config file printed at startup:
//! echo "app:
//!   name: UpdatedApp
//!   port: 9000" > /path/printed/above
//! ```

#[cfg(all(feature = "reload", feature = "yaml"))]
use layercfg::prelude::*;
#[cfg(all(feature = "reload", feature = "yaml"))]
use std::thread;
#[cfg(all(feature = "reload", feature = "yaml"))]
use std::time::Duration;

#[cfg(all(feature = "reload", feature = "yaml"))]
#[derive(Debug, Default)]
struct App {
    name: String,
    port: u16,
    environment: String,
}

#[cfg(all(feature = "reload", feature = "yaml"))]
bind_object!(App {
    "Name" => name,
    "Port" => port,
    "Environment" => environment,
});

#[cfg(all(feature = "reload", feature = "yaml"))]
fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== layercfg: Dynamic Reload Example ===\n");

    let yaml_content = r#"
app:
  name: "InitialApp"
  port: 8080
  environment: "development"
"#;

    let temp_file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    std::fs::write(temp_file.path(), yaml_content)?;
    println!("Created config file at: {:?}", temp_file.path());

    let root = ConfigBuilder::new()
        .with_in_memory([("app:environment", "unset")])
        .add(
            YamlFileSource::new(temp_file.path())
                .reload_on_change(true)
                .reload_delay(Duration::from_millis(500)),
        )
        .build()?;

    println!("\n=== Initial Configuration ===");
    print_app(&root);

    let producer = root.clone();
    let observer = root.clone();
    let _subscription = on_change(
        move || producer.reload_token(),
        move || {
            println!("\nConfiguration changed");
            print_app(&observer);
        },
    );

    println!("\nTry modifying the configuration file in another terminal:");
    println!("  echo 'app:");
    println!("    name: UpdatedApp");
    println!("    port: 9000' > {:?}", temp_file.path());
    println!("\nApplication is running for one minute. Press Ctrl+C to exit.\n");

    for _ in 0..30 {
        thread::sleep(Duration::from_secs(2));
    }

    println!("\nExample complete.");
    Ok(())
}

#[cfg(all(feature = "reload", feature = "yaml"))]
fn print_app(root: &ConfigRoot) {
    match root.section("app").get_as::<App>() {
        Ok(Some(app)) => println!(
            "  name={} port={} environment={}",
            app.name, app.port, app.environment
        ),
        Ok(None) => println!("  <no app section>"),
        Err(e) => eprintln!("  Error binding app section: {}", e),
    }
}

#[cfg(not(all(feature = "reload", feature = "yaml")))]
fn main() {
    eprintln!("Error: This example requires the 'reload' and 'yaml' features.");
    eprintln!("Run with: cargo run --example dynamic_reload --features yaml,reload");
    std::process::exit(1);
}
