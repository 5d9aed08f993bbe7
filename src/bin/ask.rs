//! Cooking Agent Instruction Utility
//!
//! A clean, simple tool for sending instructions to a running cooking-agent
//! service. Perfect for experimentation without reaching for curl.
//!
//! ## Usage
//!
//! ```bash
//! # Simple question
//! ask --instruction "How do I boil an egg?"
//!
//! # Against a non-default host
//! ask --url http://agent.internal:8080 --instruction "What is blanching?"
//! ```

use clap::Parser;
use serde_json::{json, Value};
use std::process;
use std::time::Duration;

// Standalone implementation - talks to the service over its wire contract only

#[derive(Parser)]
#[command(
    name = "ask",
    about = "Send an instruction to a running cooking-agent service"
)]
struct Args {
    /// Base URL of the running service
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,

    /// Instruction to send
    #[arg(long, required = true)]
    instruction: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "120")]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {e}");
            process::exit(1);
        }
    };

    let endpoint = format!("{}/agent/", args.url.trim_end_matches('/'));
    let payload = json!({ "instruction": args.instruction });

    let response = match client.post(&endpoint).json(&payload).send().await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Request to {endpoint} failed: {e}");
            process::exit(1);
        }
    };

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        eprintln!("Agent returned {status}:");
        eprintln!("{body}");
        process::exit(1);
    }

    match serde_json::from_str::<Value>(&body) {
        Ok(parsed) => match parsed.get("response").and_then(Value::as_str) {
            Some(answer) => println!("{answer}"),
            None => {
                eprintln!("Unexpected response shape: {body}");
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Failed to parse response body: {e}");
            process::exit(1);
        }
    }
}
