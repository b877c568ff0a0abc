use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "novaapp-server",
    about = "NovaApp Adapter - OpenAI-compatible gateway for NovaApp",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
pub struct Cli {
    #[arg(long, env = "NOVAAPP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "NGINX_PORT", default_value = "8088")]
    pub port: u16,

    #[arg(short, long, env = "NOVAAPP_CONFIG", help = "Path to a JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "NOVAAPP_STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,

    #[arg(long, env = "NOVAAPP_LOG_DIR", default_value = "./logs")]
    pub log_dir: PathBuf,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["novaapp-server"]).expect("defaults parse");
        assert_eq!(cli.port, 8088);
        assert_eq!(cli.static_dir, PathBuf::from("./static"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "novaapp-server",
            "--host",
            "127.0.0.1",
            "-p",
            "9000",
            "--config",
            "/etc/novaapp.json",
        ])
        .expect("args parse");
        assert_eq!(cli.host, "127.0.0.1");
        assert_eq!(cli.port, 9000);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/novaapp.json")));
    }
}
