use std::io::Write;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;
use voting_client::devnet::Devnet;
use voting_client::{Address, Gender, TxOutcome, VotingClient};

use crate::views;

/// One line typed at the desk.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Ask the wallet for account access
    Connect,
    /// Print the dashboards
    Show,
    /// Re-read the election state
    Refresh,
    /// Register a candidate (commissioner)
    RegisterCandidate {
        name: String,
        party: String,
        age: u32,
        #[arg(default_value_t = Gender::Male)]
        gender: Gender,
    },
    /// Open the voting window, offsets in seconds (commissioner)
    SetPeriod { start: u64, end: u64 },
    /// Stop voting now (commissioner)
    Stop,
    /// Publish the result (commissioner)
    Announce,
    /// Send voting tokens to a voter (commissioner)
    Distribute {
        to: Address,
        #[arg(default_value = "1")]
        amount: String,
    },
    /// Register the active account as a voter
    RegisterVoter {
        name: String,
        age: u32,
        #[arg(default_value_t = Gender::Male)]
        gender: Gender,
    },
    /// Vote for a candidate
    Vote { candidate_id: u64 },
    /// Token balance of the active account
    Balance,
    /// Forget the connected account
    Disconnect,
    /// Wallet: select another account
    SwitchAccount { account: Address },
    /// Wallet: revoke this site's access
    Lock,
    /// Wallet: move to another chain
    SwitchChain { chain_id: u64 },
    /// Wallet: decline the next prompt or transaction
    RejectNext,
    /// Devnet: move the clock forward
    Advance { seconds: u64 },
    /// Leave the desk
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Splits on whitespace; double quotes group words.
fn split_words(line: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if quoted {
        return Err(anyhow!("unterminated quote"));
    }
    if pending {
        words.push(current);
    }
    Ok(words)
}

/// The terminal front-end: one client, the devnet standing in for the
/// wallet, and somewhere to print.
pub struct Desk<W: Write> {
    client: VotingClient<Devnet>,
    net: Devnet,
    out: W,
}

impl<W: Write> Desk<W> {
    pub fn new(client: VotingClient<Devnet>, net: Devnet, out: W) -> Self {
        Desk { client, net, out }
    }

    pub fn into_parts(self) -> (VotingClient<Devnet>, W) {
        (self.client, self.out)
    }

    fn report(&mut self, outcome: TxOutcome) -> anyhow::Result<()> {
        let tag = if outcome.success { "ok" } else { "error" };
        writeln!(self.out, "{tag}: {}", outcome.message)?;
        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        self.client.process_wallet_events().await;
        let words = match split_words(line) {
            Ok(words) if words.is_empty() => return Ok(Flow::Continue),
            Ok(words) => words,
            Err(e) => {
                writeln!(self.out, "error: {e}")?;
                return Ok(Flow::Continue);
            }
        };
        let command = match Line::try_parse_from(&words) {
            Ok(line) => line.command,
            Err(e) => {
                write!(self.out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "desk command");

        if self.client.state().loading {
            writeln!(self.out, "error: a transaction is still in progress")?;
            return Ok(Flow::Continue);
        }

        match command {
            Command::Connect => match self.client.connect().await {
                Ok(account) => writeln!(self.out, "ok: connected as {account}")?,
                Err(e) => writeln!(self.out, "error: {} ({e})", self.client.state().error)?,
            },
            Command::Show => {
                let screen = views::render(self.client.state(), self.net.now());
                writeln!(self.out, "{screen}")?;
            }
            Command::Refresh => {
                self.client.refresh().await;
                writeln!(self.out, "ok: refreshed")?;
            }
            Command::RegisterCandidate { name, party, age, gender } => {
                let outcome = self.client.register_candidate(&name, &party, age, gender).await;
                self.report(outcome)?;
            }
            Command::SetPeriod { start, end } => {
                let outcome = self.client.set_voting_period(start, end).await;
                self.report(outcome)?;
            }
            Command::Stop => {
                let outcome = self.client.emergency_stop().await;
                self.report(outcome)?;
            }
            Command::Announce => {
                let outcome = self.client.announce_result().await;
                self.report(outcome)?;
            }
            Command::Distribute { to, amount } => {
                let outcome = self.client.distribute_tokens(to, &amount).await;
                self.report(outcome)?;
            }
            Command::RegisterVoter { name, age, gender } => {
                let outcome = self.client.register_voter(&name, age, gender).await;
                self.report(outcome)?;
            }
            Command::Vote { candidate_id } => {
                let outcome = self.client.vote(candidate_id).await;
                self.report(outcome)?;
            }
            Command::Balance => match self.client.token_balance().await {
                Some(units) => {
                    let config = self.client.config();
                    let amount = voting_client::units::format_units(units, config.token_decimals);
                    writeln!(self.out, "{amount} {}", config.token_symbol)?;
                }
                None => writeln!(self.out, "error: balance unavailable")?,
            },
            Command::Disconnect => {
                self.client.disconnect();
                writeln!(self.out, "ok: disconnected")?;
            }
            Command::SwitchAccount { account } => {
                self.net.switch_account(account);
                self.client.process_wallet_events().await;
                writeln!(self.out, "ok: wallet on {account}")?;
            }
            Command::Lock => {
                self.net.lock_wallet();
                self.client.process_wallet_events().await;
                writeln!(self.out, "ok: wallet locked")?;
            }
            Command::SwitchChain { chain_id } => {
                self.net.switch_chain(chain_id);
                self.client.process_wallet_events().await;
                writeln!(self.out, "ok: wallet on chain {chain_id}")?;
            }
            Command::RejectNext => {
                self.net.reject_next();
                writeln!(self.out, "ok: next request will be declined")?;
            }
            Command::Advance { seconds } => {
                self.net.advance(seconds);
                self.client.refresh().await;
                writeln!(self.out, "ok: clock at {}", self.net.now())?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Feeds every line of `input` to [`Desk::handle_line`] until EOF or `quit`.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R, prompt: bool) -> anyhow::Result<()> {
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if self.handle_line(&line).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voting_client::ClientConfig;

    fn desk() -> (Desk<Vec<u8>>, Devnet) {
        let net = Devnet::default();
        let client = VotingClient::new(Some(net.clone()), ClientConfig::default());
        (Desk::new(client, net.clone(), Vec::new()), net)
    }

    fn output(desk: Desk<Vec<u8>>) -> String {
        let (_, out) = desk.into_parts();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn words_respect_quotes() {
        assert_eq!(
            split_words(r#"register-candidate "Ada Lovelace" Blue 40"#).unwrap(),
            vec!["register-candidate", "Ada Lovelace", "Blue", "40"]
        );
        assert_eq!(split_words("  ").unwrap(), Vec::<String>::new());
        assert_eq!(split_words(r#"x """#).unwrap(), vec!["x", ""]);
        assert!(split_words(r#"vote "1"#).is_err());
    }

    #[test]
    fn commands_parse() {
        let line = Line::try_parse_from(["register-voter", "Bo", "30", "female"]).unwrap();
        assert_eq!(
            line.command,
            Command::RegisterVoter {
                name: "Bo".to_string(),
                age: 30,
                gender: Gender::Female
            }
        );
        let line = Line::try_parse_from(["exit"]).unwrap();
        assert_eq!(line.command, Command::Quit);
        assert!(Line::try_parse_from(["vote", "abc"]).is_err());
    }

    #[tokio::test]
    async fn scripted_session() {
        let (mut desk, net) = desk();
        let voter = net.accounts()[1];
        let script = format!(
            "connect\n\
             register-candidate \"Ada Lovelace\" Blue 40 female\n\
             set-period 60 7200\n\
             distribute {voter} 2\n\
             switch-account {voter}\n\
             register-voter Bo 30\n\
             advance 61\n\
             vote 1\n\
             balance\n\
             show\n\
             quit\n\
             show\n"
        );
        desk.run(script.as_bytes(), false).await.unwrap();
        let (client, out) = desk.into_parts();
        assert_eq!(client.state().candidates[0].votes, 1);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("ok: Candidate registered successfully!"));
        assert!(out.contains(&format!("ok: Sent 2 GLD to {voter}")));
        assert!(out.contains("ok: Voter registered!"));
        assert!(out.contains("ok: Vote cast successfully!"));
        assert!(out.contains("2 GLD"));
        assert!(out.contains("#1 Ada Lovelace (Blue) | Age: 40 | Gender: FEMALE | Votes: 1"));
        // Nothing after `quit` runs.
        assert_eq!(out.matches("== Decentralized Voting ==").count(), 1);
    }

    #[tokio::test]
    async fn failures_are_printed_not_fatal() {
        let (mut desk, _net) = desk();
        assert_eq!(desk.handle_line("vote 1").await.unwrap(), Flow::Continue);
        assert_eq!(desk.handle_line("frobnicate").await.unwrap(), Flow::Continue);
        desk.handle_line("connect").await.unwrap();
        desk.handle_line("reject-next").await.unwrap();
        desk.handle_line("stop").await.unwrap();
        let out = output(desk);
        assert!(out.contains("error: You are not registered to vote!"));
        assert!(out.contains("error: User rejected transaction"));
    }
}
