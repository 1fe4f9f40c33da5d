use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable detailed debug logging (global)
    #[arg(long, default_value_t = false, global = true)]
    pub debug: bool,

    /// Enable verbose logging (global)
    #[arg(long, default_value_t = false, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Fetch one or more pages and grade their security posture
    Scan {
        /// Target URL (e.g. https://example.com) or path to file with newline-delimited URLs
        target: String,

        /// Output directory
        #[arg(short = 'o', long, default_value = "./results")]
        out: String,

        /// Number of pages fetched in parallel
        #[arg(short = 'c', long, default_value_t = 20_u16)]
        concurrency: u16,

        /// Request timeout in seconds (default: 10)
        #[arg(long, default_value_t = 10_u64)]
        timeout: u64,

        /// Number of retries (default: 3, max: 10)
        #[arg(short = 'r', long, default_value_t = 3_u8)]
        retries: u8,

        /// User-Agent sent with every request and recorded in the results
        #[arg(long)]
        user_agent: Option<String>,

        /// JSON file with analyzer settings (weights, HSTS threshold, identifiers)
        #[arg(long, value_name = "FILE")]
        config: Option<String>,

        /// Save detailed report to file (JSON or TXT format)
        #[arg(long, value_name = "FILE")]
        report: Option<String>,
    },

    /// Analyze a saved response without touching the network
    Inspect {
        /// URL the response was served from
        url: String,

        /// File holding the response body
        #[arg(long, value_name = "FILE")]
        body: String,

        /// File holding raw `Name: value` header lines
        #[arg(long, value_name = "FILE")]
        headers: Option<String>,

        /// User-Agent to record in the result metadata
        #[arg(long)]
        user_agent: Option<String>,

        /// JSON file with analyzer settings
        #[arg(long, value_name = "FILE")]
        config: Option<String>,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
