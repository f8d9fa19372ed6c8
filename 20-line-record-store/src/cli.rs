use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the record store over TCP.
    Server(ServerArgs),
    /// Connect to a server and send commands typed on stdin.
    Client(ClientArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Socket address the server should bind to. Use port 0 for an ephemeral port.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// Store file. Created empty at startup, replacing any previous content.
    #[arg(long, default_value = "records.txt")]
    pub store: PathBuf,

    /// Simulated processing time every store operation spends under its lock.
    #[arg(long, default_value_t = 4000)]
    pub latency_ms: u64,
}

impl ServerArgs {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Address of the server to connect to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub server: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults() {
        let cli = Cli::try_parse_from(["line_record_store", "server"]).expect("parse");
        let Command::Server(args) = cli.command else {
            panic!("expected server subcommand");
        };
        assert_eq!(args.listen, "127.0.0.1:8080".parse::<SocketAddr>().expect("addr"));
        assert_eq!(args.store, PathBuf::from("records.txt"));
        assert_eq!(args.latency(), Duration::from_secs(4));
    }

    #[test]
    fn server_overrides() {
        let cli = Cli::try_parse_from([
            "line_record_store",
            "server",
            "--listen",
            "127.0.0.1:0",
            "--store",
            "/tmp/other.txt",
            "--latency-ms",
            "0",
        ])
        .expect("parse");
        let Command::Server(args) = cli.command else {
            panic!("expected server subcommand");
        };
        assert_eq!(args.listen.port(), 0);
        assert_eq!(args.store, PathBuf::from("/tmp/other.txt"));
        assert!(args.latency().is_zero());
    }
}
