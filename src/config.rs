use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "contigq")]
#[command(about = "Chromosome-name tolerant feature query server")]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "CONTIGQ_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "CONTIGQ_PORT", default_value = "8080")]
    pub port: u16,

    /// Directory containing feature files and their tabix indexes
    #[arg(long, env = "CONTIGQ_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Base URL of remote feature files; replaces the data directory when set
    #[arg(long, env = "CONTIGQ_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Directory for cached remote downloads
    #[arg(long, env = "CONTIGQ_CACHE_DIR", default_value = "./cache")]
    pub cache_dir: PathBuf,

    /// Enable CORS for all origins
    #[arg(long, env = "CONTIGQ_CORS", default_value = "true")]
    pub cors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
