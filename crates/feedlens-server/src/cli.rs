//! Command-line interface

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "feedlens-server")]
#[command(about = "Feedlens feedback analysis API", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "feedlens.yaml")]
    pub config: String,

    /// Inference account id (falls back to CLOUDFLARE_ACCOUNT_ID)
    #[arg(long)]
    pub account_id: Option<String>,

    /// Inference API token (falls back to CLOUDFLARE_API_TOKEN)
    #[arg(long)]
    pub api_token: Option<String>,

    /// Outbound call ceiling per batch request
    #[arg(long)]
    pub call_ceiling: Option<usize>,

    /// Deployment environment (development allows any CORS origin)
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Listen address
    #[arg(short = 'l', long, default_value = "0.0.0.0")]
    pub listen: String,

    /// Listen port
    #[arg(short = 'P', long, default_value = "8787")]
    pub port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
