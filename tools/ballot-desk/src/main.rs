use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};
use tracing_subscriber::EnvFilter;
use voting_client::devnet::{Devnet, DevnetSeed};
use voting_client::{Address, ClientConfig, VotingClient};

mod repl;
mod views;

#[derive(Parser, Debug)]
#[command(about = "Terminal desk for an on-chain election", author, version)]
struct Args {
    /// Voting contract address (defaults to the devnet seed's)
    #[arg(long, env = "BALLOT_VOTING_CONTRACT")]
    voting_contract: Option<Address>,
    /// JSON file describing the local devnet
    #[arg(long, env = "BALLOT_DEVNET_SEED")]
    devnet_seed: Option<PathBuf>,
    /// Wallet account selected at start-up
    #[arg(long)]
    account: Option<Address>,
    /// Read commands from a file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_seed(path: Option<&PathBuf>) -> anyhow::Result<DevnetSeed> {
    let Some(path) = path else {
        return Ok(DevnetSeed::default());
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading devnet seed {}", path.display()))?;
    DevnetSeed::from_json(&json).with_context(|| format!("parsing devnet seed {}", path.display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut seed = load_seed(args.devnet_seed.as_ref()).await?;
    let voting_contract = args.voting_contract.unwrap_or(seed.voting_contract);
    seed.voting_contract = voting_contract;
    let net = Devnet::from_seed(seed).context("invalid devnet seed")?;
    if let Some(account) = args.account {
        net.switch_account(account);
    }

    let config = ClientConfig {
        voting_contract,
        ..ClientConfig::default()
    };
    let mut client = VotingClient::new(Some(net.clone()), config);
    client.init().await;

    let (input, prompt): (Box<dyn AsyncBufRead + Unpin>, bool) = match &args.script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening script {}", path.display()))?;
            (Box::new(BufReader::new(file)), false)
        }
        None => (Box::new(BufReader::new(tokio::io::stdin())), true),
    };

    let mut desk = repl::Desk::new(client, net, std::io::stdout());
    desk.run(input, prompt).await?;

    let (mut client, _) = desk.into_parts();
    client.shutdown();
    Ok(())
}
