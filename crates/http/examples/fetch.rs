//! Fetches one resource and prints the outcome.
//!
//! ```text
//! cargo run -p raw-http --example fetch -- example.com 80 /
//! ```

use std::env;

use raw_http::builder::HeaderOptions;
use raw_http::client::{HttpClient, HTTP_PORT};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut args = env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "example.com".to_owned());
    let port = args.next().and_then(|port| port.parse().ok()).unwrap_or(HTTP_PORT);
    let resource = args.next().unwrap_or_else(|| "/".to_owned());

    info!(%host, port, %resource, "fetching");
    let client = HttpClient::new();

    let result = match client.get(&host, port, &resource, &HeaderOptions::new()).await {
        Ok(result) => result,
        Err(e) => {
            error!(cause = %e, "request failed");
            return;
        }
    };

    println!("status: {}", result.status());
    for line in result.headers().unwrap_or_default() {
        println!("{line}");
    }
    for (name, value) in result.new_cookies() {
        info!(%name, %value, "cookie");
    }
    if let Some(body) = result.body_as_text() {
        println!();
        println!("{body}");
    }
}
