use std::path::PathBuf;

use clap::Parser;
use eyre::WrapErr;
use netc::{ClientConfig, NetClient, Network};
use tracing_subscriber::EnvFilter;

const DEFAULT_MESSAGE: &str = "The quick brown fox jumps over the lazy dog";

/// Send words to a stream socket one at a time and print what comes back
///
/// Pair with an echo peer, for example:
/// `socat UNIX-LISTEN:/tmp/mysocket,fork exec:'/bin/cat'`
#[derive(Debug, Parser)]
struct Args {
    /// TOML file with `network`, `address` and `max_read_bytes`
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Network family (tcp, tcp4, tcp6, unix)
    #[clap(short, long)]
    network: Option<String>,

    /// Address or socket path to connect to
    #[clap(short, long)]
    address: Option<String>,

    /// Maximum number of bytes per read
    #[clap(short, long, allow_negative_numbers = true)]
    max_read_bytes: Option<i64>,

    /// Close and connect again, then send the words a second time
    #[clap(long)]
    reconnect: bool,

    /// Words to send, defaults to a pangram
    words: Vec<String>,
}

impl Args {
    fn client_config(&self) -> eyre::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)
                .wrap_err_with(|| format!("loading configuration from {}", path.display()))?,
            None => ClientConfig::default(),
        };
        if let Some(network) = &self.network {
            config.network = Network::from(network.as_str());
        }
        if let Some(address) = &self.address {
            config.address = address.clone();
        }
        if let Some(max_read_bytes) = self.max_read_bytes {
            config.max_read_bytes = max_read_bytes;
        }
        Ok(config)
    }

    fn words(&self) -> Vec<String> {
        if self.words.is_empty() {
            DEFAULT_MESSAGE.split(' ').map(str::to_string).collect()
        } else {
            self.words.clone()
        }
    }
}

fn exchange(client: &mut NetClient, words: &[String]) -> eyre::Result<()> {
    for word in words {
        tracing::info!(%word, "client data sent");

        let mut failure = None;
        client
            .write_and_listen(word.as_bytes(), |resp, err, done| {
                match err {
                    None => {
                        tracing::info!(data = %String::from_utf8_lossy(resp), "client data received");
                        println!("{}", String::from_utf8_lossy(resp));
                    }
                    Some(e) => failure = Some(e),
                }
                done.done();
            })
            .wrap_err("writing to socket")?;

        if let Some(e) = failure {
            return Err(e).wrap_err("reading from socket");
        }
    }
    Ok(())
}

fn main() -> eyre::Result<()> {
    color_eyre::install().context("installing color_eyre")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "parsed command line arguments");

    let config = args.client_config()?;
    let words = args.words();
    let mut client = NetClient::from_config(&config);

    client
        .connect()
        .wrap_err("unable to communicate with socket")?;
    exchange(&mut client, &words)?;
    client.close().wrap_err("closing connection")?;

    if args.reconnect {
        tracing::info!("reconnecting");
        client
            .connect()
            .wrap_err("unable to communicate with socket")?;
        exchange(&mut client, &words)?;
        client.close().wrap_err("closing connection")?;
    }

    Ok(())
}
