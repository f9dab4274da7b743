use voting_client::devnet::{Devnet, DevnetSeed};
use voting_client::{ClientConfig, ClientError, Gender, Phase, TimeWindow, TxOutcome, VotingClient, VotingStatus};

const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

async fn connected(net: &Devnet) -> VotingClient<Devnet> {
    let mut client = VotingClient::new(Some(net.clone()), ClientConfig::default());
    client.connect().await.unwrap();
    client
}

/// Commissioner registers one candidate and opens a one-hour-plus window
/// starting in 60 seconds.
async fn scheduled_election(net: &Devnet) -> VotingClient<Devnet> {
    let mut client = connected(net).await;
    assert!(client.register_candidate("Ada", "Blue", 40, Gender::Female).await.success);
    assert!(client.set_voting_period(60, 7200).await.success);
    client
}

#[tokio::test]
async fn connect_without_provider_fails() {
    let mut client: VotingClient<Devnet> = VotingClient::new(None, ClientConfig::default());
    assert_eq!(client.connect().await, Err(ClientError::WalletUnavailable));
    assert_eq!(client.state().error, "Wallet provider is not installed!");
    assert_eq!(client.state().account, None);
}

#[tokio::test]
async fn declined_prompt_is_user_rejected() {
    let net = Devnet::default();
    net.reject_next();
    let mut client = VotingClient::new(Some(net.clone()), ClientConfig::default());
    assert_eq!(client.connect().await, Err(ClientError::UserRejected));
    assert_eq!(client.state().error, "Failed to connect wallet.");
    assert!(!client.state().loading);

    // Retrying works.
    assert_eq!(client.connect().await, Ok(net.commissioner()));
    assert_eq!(client.state().error, "");
}

#[tokio::test]
async fn connect_loads_role_and_token() {
    let net = Devnet::default();
    let mut client = connected(&net).await;
    let state = client.state();
    assert_eq!(state.account, Some(net.commissioner()));
    assert_eq!(state.chain_id, Some(31337));
    assert!(state.is_commissioner);
    assert_eq!(state.voting_status, VotingStatus::NotStarted);
    assert_eq!(state.syncs, 1);
    assert!(!state.loading);
    assert!(client.session().is_some_and(|s| s.has_token()));
    assert!(client.has_positive_token_balance().await);
}

#[tokio::test]
async fn init_adopts_authorized_account_only() {
    let net = Devnet::default();
    let mut client = VotingClient::new(Some(net.clone()), ClientConfig::default());
    client.init().await;
    assert_eq!(client.state().account, None);
    assert_eq!(client.state().chain_id, Some(31337));

    net.authorize();
    let mut client = VotingClient::new(Some(net.clone()), ClientConfig::default());
    client.init().await;
    assert_eq!(client.state().account, Some(net.commissioner()));
    assert!(client.state().is_commissioner);
}

#[tokio::test]
async fn init_failure_sets_error_slot() {
    let net = Devnet::default();
    net.authorize();
    net.fail_read("eth_accounts");
    let mut client = VotingClient::new(Some(net.clone()), ClientConfig::default());
    client.init().await;
    assert_eq!(client.state().error, "Failed to initialize wallet connection.");
    assert_eq!(client.state().account, None);
    assert!(client.session().is_none());
}

#[tokio::test]
async fn connect_without_accounts_fails() {
    let seed = DevnetSeed {
        accounts: Vec::new(),
        ..DevnetSeed::default()
    };
    let net = Devnet::from_seed(seed).unwrap();
    let mut client = VotingClient::new(Some(net.clone()), ClientConfig::default());
    assert_eq!(client.connect().await, Err(ClientError::NoAccounts));
    assert_eq!(client.state().error, "Failed to connect wallet.");
    assert!(!client.state().loading);
    assert!(client.session().is_none());
}

#[tokio::test]
async fn actions_follow_an_account_switch() {
    let net = Devnet::default();
    let mut client = connected(&net).await;
    let voter = net.accounts()[1];
    net.switch_account(voter);

    // No explicit event drain: the action itself picks up the new account.
    let outcome = client.register_candidate("Ada", "Blue", 40, Gender::Female).await;
    assert_eq!(outcome, TxOutcome::failed("Only the election commission can do this"));
    let state = client.state();
    assert_eq!(state.account, Some(voter));
    assert!(!state.is_commissioner);
    assert!(state.candidates.is_empty());
    assert!(client.session().is_some_and(|s| s.account() == voter));

    net.switch_account(net.commissioner());
    assert!(client.has_positive_token_balance().await);
    assert!(client.state().is_commissioner);
}

#[tokio::test]
async fn full_election_round() {
    let net = Devnet::default();
    let mut client = scheduled_election(&net).await;
    let start = net.now() + 60;
    assert_eq!(client.state().window, TimeWindow { start, end: start + 7200 });
    assert_eq!(client.state().candidates.len(), 1);

    let voter = net.accounts()[1];
    let sent = client.distribute_tokens(voter, "1").await;
    assert_eq!(sent, TxOutcome::ok(format!("Sent 1 GLD to {voter}")));
    assert_eq!(net.balance(voter), ONE_TOKEN);

    net.switch_account(voter);
    assert_eq!(client.process_wallet_events().await, 1);
    assert_eq!(client.state().account, Some(voter));
    assert!(!client.state().is_commissioner);
    assert_eq!(client.state().user_voter_id, 0);

    let registered = client.register_voter("Bo", 30, Gender::Male).await;
    assert_eq!(registered, TxOutcome::ok("Voter registered!"));
    assert_eq!(client.state().user_voter_id, 1);

    net.advance(61);
    client.refresh().await;
    assert_eq!(client.state().voting_status, VotingStatus::InProgress);

    assert_eq!(client.vote(1).await, TxOutcome::ok("Vote cast successfully!"));
    assert_eq!(client.state().candidates[0].votes, 1);

    let again = client.vote(1).await;
    assert_eq!(again, TxOutcome::failed("You have already voted"));
    assert_eq!(client.state().error, "You have already voted");
    assert_eq!(client.state().candidates[0].votes, 1);

    net.switch_account(net.commissioner());
    client.process_wallet_events().await;
    assert!(client.state().is_commissioner);
    assert!(client.emergency_stop().await.success);
    assert_eq!(client.state().voting_status, VotingStatus::Ended);
    assert_eq!(net.status(), VotingStatus::Ended);
    assert_eq!(client.announce_result().await, TxOutcome::ok("Result announced!"));
    assert!(net.result_announced());
}

#[tokio::test]
async fn unregistered_vote_never_reaches_the_chain() {
    let net = Devnet::default();
    let mut client = scheduled_election(&net).await;
    assert_eq!(client.state().user_voter_id, 0);

    let calls = net.remote_calls();
    let outcome = client.vote(1).await;
    assert_eq!(outcome, TxOutcome::failed("You are not registered to vote!"));
    assert_eq!(client.state().error, "You are not registered to vote!");
    assert_eq!(net.remote_calls(), calls);
}

#[tokio::test]
async fn zero_balance_blocks_the_vote() {
    let net = Devnet::default();
    let mut client = scheduled_election(&net).await;
    net.switch_account(net.accounts()[2]);
    client.process_wallet_events().await;
    assert!(client.register_voter("Cy", 25, Gender::Other).await.success);
    net.advance(61);
    client.refresh().await;

    let calls = net.remote_calls();
    let outcome = client.vote(1).await;
    assert_eq!(outcome, TxOutcome::failed("You do not hold the required GLD Token to vote!"));
    // Only the balance read went out.
    assert_eq!(net.remote_calls(), calls + 1);
    assert_eq!(client.state().candidates[0].votes, 0);
}

#[tokio::test]
async fn rejected_transaction_reports_user_rejection() {
    let net = Devnet::default();
    let mut client = connected(&net).await;
    let syncs = client.state().syncs;

    net.reject_next();
    let outcome = client.register_candidate("Ada", "Blue", 40, Gender::Female).await;
    assert_eq!(outcome, TxOutcome::failed("User rejected transaction"));
    let state = client.state();
    assert_eq!(state.error, "User rejected transaction");
    assert!(!state.loading);
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.syncs, syncs);
    assert!(state.candidates.is_empty());
}

#[tokio::test]
async fn successful_execute_clears_error_and_resyncs() {
    let net = Devnet::default();
    let mut client = connected(&net).await;
    let bad = client.set_voting_period(0, 3600).await;
    assert_eq!(bad, TxOutcome::failed("End duration must be more than 1 hour"));
    assert_eq!(client.state().error, "End duration must be more than 1 hour");

    let syncs = client.state().syncs;
    let ok = client.register_candidate("Ada", "Blue", 40, Gender::Female).await;
    assert_eq!(ok, TxOutcome::ok("Candidate registered successfully!"));
    let state = client.state();
    assert!(!state.loading);
    assert_eq!(state.error, "");
    assert_eq!(state.syncs, syncs + 1);
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.candidates[0].name, "Ada");
}

#[tokio::test]
async fn each_read_failure_is_isolated() {
    let net = Devnet::default();
    let mut reference = scheduled_election(&net).await;
    assert!(reference.register_voter("Commish", 50, Gender::NotSpecified).await.success);
    net.advance(61);
    reference.refresh().await;
    let expected = reference.state().clone();
    assert_eq!(expected.voting_status, VotingStatus::InProgress);
    assert_eq!(expected.user_voter_id, 1);

    for method in ["electionCommission", "getVotingStatus", "getCandidateList", "getVoterList", "startTime"] {
        net.heal();
        net.fail_read(method);
        let client = connected(&net).await;
        let state = client.state();

        let commissioner_failed = method == "electionCommission";
        assert_eq!(state.is_commissioner, !commissioner_failed, "{method}");

        let status = if method == "getVotingStatus" { VotingStatus::NotStarted } else { expected.voting_status };
        assert_eq!(state.voting_status, status, "{method}");

        let candidates = if method == "getCandidateList" { 0 } else { 1 };
        assert_eq!(state.candidates.len(), candidates, "{method}");

        let voter_id = if method == "getVoterList" { 0 } else { 1 };
        assert_eq!(state.user_voter_id, voter_id, "{method}");

        let window = if method == "startTime" { TimeWindow::default() } else { expected.window };
        assert_eq!(state.window, window, "{method}");
        assert!(!state.loading);
        assert_eq!(state.error, "");
    }
}

#[tokio::test]
async fn back_to_back_syncs_agree() {
    let net = Devnet::default();
    let mut client = scheduled_election(&net).await;
    client.refresh().await;
    let first = client.state().clone();
    client.refresh().await;
    let second = client.state().clone();
    assert_eq!(first.remote_view(), second.remote_view());
    assert_eq!(second.syncs, first.syncs + 1);
}

#[tokio::test]
async fn election_without_token() {
    let seed = DevnetSeed {
        token_contract: None,
        ..DevnetSeed::default()
    };
    let net = Devnet::from_seed(seed).unwrap();
    let mut client = scheduled_election(&net).await;
    assert!(client.session().is_some_and(|s| !s.has_token()));
    assert!(!client.has_positive_token_balance().await);

    let voter = net.accounts()[1];
    let outcome = client.distribute_tokens(voter, "1").await;
    assert_eq!(outcome, TxOutcome::failed("Token contract not loaded"));
}

#[tokio::test]
async fn bad_amount_is_refused_locally() {
    let net = Devnet::default();
    let mut client = connected(&net).await;
    let calls = net.remote_calls();
    let outcome = client.distribute_tokens(net.accounts()[1], "one").await;
    assert_eq!(outcome, TxOutcome::failed("Invalid token amount"));
    assert_eq!(net.remote_calls(), calls);
}

#[tokio::test]
async fn chain_switch_reloads_everything() {
    let net = Devnet::default();
    let mut client = scheduled_election(&net).await;
    let syncs = client.state().syncs;

    net.switch_chain(11155111);
    assert_eq!(client.process_wallet_events().await, 1);
    let state = client.state();
    assert_eq!(state.chain_id, Some(11155111));
    assert_eq!(state.syncs, syncs + 1);
    assert!(state.is_commissioner);
    assert_eq!(state.candidates.len(), 1);
    assert!(client.session().is_some());
}

#[tokio::test]
async fn locked_wallet_resets_the_session() {
    let net = Devnet::default();
    let mut client = connected(&net).await;
    assert!(client.state().is_commissioner);

    net.lock_wallet();
    client.process_wallet_events().await;
    assert_eq!(client.state().account, None);
    assert!(!client.state().is_commissioner);
    assert!(client.session().is_none());

    let outcome = client.emergency_stop().await;
    assert_eq!(outcome, TxOutcome::failed("Wallet not connected"));
}

#[tokio::test]
async fn listener_registered_once_and_released() {
    let net = Devnet::default();
    let mut client = VotingClient::new(Some(net.clone()), ClientConfig::default());
    client.init().await;
    client.connect().await.unwrap();
    client.connect().await.unwrap();
    assert_eq!(net.listener_count(), 1);
    assert!(client.wallet().is_listening());
    client.shutdown();
    assert_eq!(net.listener_count(), 0);

    {
        let _other = connected(&net).await;
        assert_eq!(net.listener_count(), 1);
    }
    assert_eq!(net.listener_count(), 0);
}
