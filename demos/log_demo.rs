//! Example: drive a running Log4MCP server through the full method set.
//!
//! # Run
//! ```bash
//! LOG4MCP_PORT=3000 cargo run --example log_demo
//! ```
//!
//! The endpoint comes from `LOG4MCP_HOST` / `LOG4MCP_PORT` (default
//! `localhost:3000`). Wire traffic is printed to stderr, or written to
//! `<dir>/client.log` with `--log-dir <dir>`.

use anyhow::{bail, Context, Result};
use log4mcp_client::{logging, ClientConfig, Log4McpClient, LogLevel};
use std::path::PathBuf;

fn main() -> Result<()> {
    let log_dir = parse_log_dir(std::env::args().skip(1))?;
    let config = ClientConfig::from_env()?.with_verbose(true);
    match &log_dir {
        Some(dir) => logging::init_file_logging(dir, config.verbose)?,
        None => logging::init_logging(config.verbose)?,
    }

    println!("Log4MCP Rust Client Example (TCP Mode)");
    println!("{}", "=".repeat(50));
    println!("Note: Ensure the Log4MCP server is running on {}", config.addr());
    println!();

    let addr = config.addr();
    let mut client = Log4McpClient::connect(config)
        .with_context(|| format!("Could not connect to Log4MCP server on {}", addr))?;

    // The client closes its connection on drop, so an early `?` still releases it.
    run(&mut client)?;
    client.close();

    println!();
    println!("{}", "=".repeat(50));
    println!("All steps completed successfully!");
    if let Some(dir) = log_dir {
        println!("Wire log: {}", logging::log_file_path(&dir).display());
    }
    Ok(())
}

fn parse_log_dir(mut args: impl Iterator<Item = String>) -> Result<Option<PathBuf>> {
    let mut log_dir = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--log-dir" => {
                let dir = args.next().context("--log-dir requires a directory")?;
                log_dir = Some(PathBuf::from(dir));
            }
            other => bail!("Unknown argument: {}", other),
        }
    }
    Ok(log_dir)
}

fn run(client: &mut Log4McpClient) -> Result<()> {
    println!("\n1. Logging messages...");
    client.log_message("myapp", LogLevel::Info, "Application started")?;
    client.log_message("myapp", LogLevel::Debug, "Debug message")?;
    client.log_message("myapp", LogLevel::Warn, "Warning message")?;
    client.log_message("myapp", LogLevel::Error, "Error occurred")?;

    println!("\n2. Getting all entries...");
    let response = client.get_all_entries("myapp")?;
    if let Some(entries) = response.entries() {
        println!("   Found {} entries", entries.len());
    }

    println!("\n3. Getting error entries only...");
    let response = client.get_entries("myapp", Some(LogLevel::Error))?;
    if let Some(entries) = response.entries() {
        println!("   Found {} error entries", entries.len());
    }

    println!("\n4. Setting log level to WARN...");
    client.set_log_level("myapp", LogLevel::Warn)?;

    println!("\n5. Getting system capabilities...");
    let response = client.get_capabilities()?;
    println!("   Response: {}", serde_json::to_string(&response)?);

    println!("\n6. Clearing logs...");
    client.clear_logs("myapp")?;

    Ok(())
}
