// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed binding example.
//!
//! This example demonstrates:
//! - Describing structs with `bind_object!` and with a hand-written descriptor
//! - Binding nested objects, optional members, lists and maps
//! - Converting durations, socket addresses and hex integers
//! - Rejecting unknown keys with `BinderOptions`
//!
//! To run this example:
//! ```bash
//! cargo run --example binding
//! ```

use layercfg::prelude::*;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Default)]
struct Tls {
    certificate: String,
    key: String,
}

bind_object!(Tls {
    "Certificate" => certificate,
    "Key" => key,
});

#[derive(Debug, Default)]
struct Listener {
    address: Option<SocketAddr>,
    backlog: u32,
    tls: Option<Tls>,
}

bind_object!(Listener {
    "Address" => address,
    "Backlog" => backlog,
    "Tls" => tls,
});

#[derive(Debug, Default)]
struct Server {
    name: String,
    timeout: Duration,
    flags: u32,
    listeners: Vec<Listener>,
    limits: BTreeMap<String, u64>,
    secret: String,
}

impl Server {
    fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }
}

impl BindObject for Server {
    fn descriptor() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .constructor(Server::default)
            .field("Name", |s: &mut Server| &mut s.name)
            .accessors(
                "TimeoutSeconds",
                |s: &Server| s.timeout_secs(),
                |s: &mut Server, secs: u64| s.timeout = Duration::from_secs(secs),
            )
            .field("Timeout", |s: &mut Server| &mut s.timeout)
            .field("Flags", |s: &mut Server| &mut s.flags)
            .field("Listeners", |s: &mut Server| &mut s.listeners)
            .field("Limits", |s: &mut Server| &mut s.limits)
            .field("Secret", |s: &mut Server| &mut s.secret)
            .non_public()
    }
}

bind_object!(Server);

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== layercfg: Binding ===\n");

    let root = ConfigBuilder::new()
        .with_in_memory([
            ("server:name", "edge-1"),
            ("server:timeout", "1m 30s"),
            ("server:flags", "0x1F"),
            ("server:listeners:0:address", "127.0.0.1:8080"),
            ("server:listeners:0:backlog", "128"),
            ("server:listeners:1:address", "[::1]:8443"),
            ("server:listeners:1:tls:certificate", "/etc/tls/cert.pem"),
            ("server:listeners:1:tls:key", "/etc/tls/key.pem"),
            ("server:limits:connections", "1000"),
            ("server:limits:requests", "50000"),
            ("server:secret", "hunter2"),
        ])
        .build()?;

    let section = root.section("server");

    println!("--- Default options ---");
    let server: Server = section.get_as()?.unwrap_or_default();
    print_server(&server);

    println!("\n--- Binding non-public members ---");
    let options = BinderOptions::default().with_bind_non_public_properties(true);
    let mut server = Server::default();
    section.bind_with(&mut server, &options)?;
    println!("Secret bound: {}", !server.secret.is_empty());

    println!("\n--- Unknown keys ---");
    root.set("server:colour", Some("blue"))?;
    let strict = BinderOptions::default().with_error_on_unknown_configuration(true);
    match section.get_as_with::<Server>(&strict) {
        Ok(_) => println!("Bound without complaint"),
        Err(e) => println!("Rejected: {}", e),
    }

    println!("\n--- Single values ---");
    let backlog = root.get_value_or("server:listeners:1:backlog", 64u32)?;
    println!("Second listener backlog: {} (default)", backlog);

    Ok(())
}

fn print_server(server: &Server) {
    println!("Name: {}", server.name);
    println!("Timeout: {:?}", server.timeout);
    println!("Flags: {:#b}", server.flags);
    for (index, listener) in server.listeners.iter().enumerate() {
        println!(
            "Listener {}: {:?} backlog={} tls={}",
            index,
            listener.address,
            listener.backlog,
            listener
                .tls
                .as_ref()
                .map(|tls| format!("{} / {}", tls.certificate, tls.key))
                .unwrap_or_else(|| "off".to_string())
        );
    }
    for (name, limit) in &server.limits {
        println!("Limit {}: {}", name, limit);
    }
    println!("Secret bound: {}", !server.secret.is_empty());
}
