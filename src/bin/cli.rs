use clap::Parser;
use log::{LevelFilter, error, info};
use std::path::PathBuf;
use ytved::config::ServiceConfig;
use ytved::serve;

#[derive(Parser, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Path of the config file, defaults to `<config dir>/ytved/config.toml`
    #[arg(long = "config", short)]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long = "port", short)]
    pub port: Option<u16>,

    /// Directory downloaded files are written to
    #[arg(long = "download-dir", short)]
    pub download_dir: Option<PathBuf>,

    /// Path of the yt-dlp executable, looked up on the PATH if it does not exist
    #[arg(long = "yt-dlp")]
    pub yt_dlp_path: Option<PathBuf>,

    /// Path of the ffmpeg executable handed to yt-dlp
    #[arg(long = "ffmpeg")]
    pub ffmpeg_path: Option<PathBuf>,

    /// Kill yt-dlp after this many seconds
    #[arg(long = "timeout")]
    pub timeout_secs: Option<u64>,

    /// Give every download its own subdirectory
    #[arg(long = "isolate-downloads", action = clap::ArgAction::SetTrue)]
    pub isolate_downloads: bool,

    /// Log level of the service
    #[arg(
        long = "verbosity",
        short,
        default_value = "info",
        value_parser = clap::builder::PossibleValuesParser::new([
            "info", "debug", "error", "none", "full"
        ])
    )]
    pub verbosity: String,
}

impl Cli {
    fn apply(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(download_dir) = self.download_dir {
            config.download_dir = download_dir;
        }
        if let Some(yt_dlp_path) = self.yt_dlp_path {
            config.yt_dlp_path = yt_dlp_path;
        }
        if let Some(ffmpeg_path) = self.ffmpeg_path {
            config.ffmpeg_path = ffmpeg_path;
        }
        if self.timeout_secs.is_some() {
            config.timeout_secs = self.timeout_secs;
        }
        if self.isolate_downloads {
            config.isolate_downloads = true;
        }
        config
    }
}

fn init_logger(verbosity: &str) {
    let (own, others) = match verbosity {
        "none" => (LevelFilter::Off, LevelFilter::Off),
        "error" => (LevelFilter::Error, LevelFilter::Error),
        "debug" => (LevelFilter::Debug, LevelFilter::Warn),
        "full" => (LevelFilter::Trace, LevelFilter::Trace),
        _ => (LevelFilter::Info, LevelFilter::Warn),
    };

    env_logger::Builder::new()
        .filter_level(others)
        .filter_module("ytved", own)
        .filter_module("ytved_core", own)
        .filter_module("tower_http", own)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Cli::parse();
    init_logger(&args.verbosity);

    let config_path = args.config.clone().or_else(ServiceConfig::default_path);
    let config = match &config_path {
        Some(path) => {
            info!("Reading config from {}", path.display());
            ServiceConfig::load(path).inspect_err(|e| error!("{}", e))?
        }
        None => ServiceConfig::default(),
    };

    serve(args.apply(config)).await
}
