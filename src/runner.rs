//! Swap runner
//!
//! Collects the run plan from the operator, checks the balance, then performs
//! the requested number of swaps one after another. Only problems found
//! before the first swap stop the run; a failed swap is logged and the loop
//! moves on.

use crate::amount::{format_ether, parse_ether};
use crate::api::{SwapApi, TrackEvent};
use crate::chain::{ChainClient, Connect, Session, TransactionResult};
use crate::config::Config;
use crate::console::Console;
use crate::executor::{ExecutorSettings, SwapCall, TransactionExecutor};
use crate::journal::{Outcome, RunJournal};
use crate::swap::{MenuChoice, SwapKind, SwapMode, SwapRequest, MENU};
use crate::{Error, Result};
use alloy::primitives::{Address, U256};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const BANNER: &str = "-------------------------------------------------\n   Euclid Testnet Swap Runner\n-------------------------------------------------";

/// What the operator asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub mode: SwapMode,
    pub count: u32,
    /// Per-transaction amount in wei
    pub amount: U256,
}

/// Iteration counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub confirmed: u32,
    pub reverted: u32,
    pub skipped: u32,
}

impl RunSummary {
    pub fn attempted(&self) -> u32 {
        self.confirmed + self.reverted + self.skipped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Operator chose Exit from the menu
    Exited,
    Completed(RunSummary),
}

/// Open session plus the executor driving it
struct Signer<C: ChainClient> {
    wallet: Address,
    chain: Arc<C>,
    executor: TransactionExecutor<C>,
}

impl<C: ChainClient> Signer<C> {
    fn new(session: Session<C>, settings: ExecutorSettings) -> Self {
        Self {
            wallet: session.wallet,
            executor: TransactionExecutor::new(session.chain.clone(), settings),
            chain: session.chain,
        }
    }
}

/// Interactive swap loop over a chain, the Euclid API and a console.
///
/// The session is opened only once the operator has entered a valid plan,
/// so choosing Exit never needs a private key.
pub struct SwapRunner<S: Connect, A: SwapApi, K: Console> {
    config: Config,
    session: S,
    api: A,
    console: K,
    journal: RunJournal,
}

impl<S: Connect, A: SwapApi, K: Console> SwapRunner<S, A, K> {
    pub fn new(config: Config, session: S, api: A, console: K) -> Self {
        let journal = RunJournal::new(config.journal_path.as_ref().map(PathBuf::from));
        Self {
            config,
            session,
            api,
            console,
            journal,
        }
    }

    /// Replace the journal derived from the config
    pub fn with_journal(mut self, journal: RunJournal) -> Self {
        self.journal = journal;
        self
    }

    /// Run to completion. The console is closed on every exit path.
    pub async fn run(&self) -> Result<RunOutcome> {
        let outcome = self.run_inner().await;
        match &outcome {
            Err(Error::Cancelled) => info!("Run cancelled by operator"),
            Err(e) if e.is_fatal() => error!(error = %e, "Run aborted"),
            Err(e) => error!(error = %e, "Run failed"),
            Ok(_) => {}
        }
        self.console.close().await;
        outcome
    }

    async fn run_inner(&self) -> Result<RunOutcome> {
        let Some(plan) = self.collect_plan().await? else {
            info!("Exiting...");
            return Ok(RunOutcome::Exited);
        };

        let signer = Signer::new(
            self.session.connect()?,
            ExecutorSettings::from_config(&self.config),
        );
        info!(
            wallet = %signer.wallet.to_checksum(None),
            chain_id = self.config.network.chain_id,
            "Connected to wallet"
        );

        let total = self.check_balance(&signer, &plan).await?;
        self.confirm(&plan, total).await?;

        let summary = self.execute_plan(&signer, &plan).await;
        info!(
            confirmed = summary.confirmed,
            reverted = summary.reverted,
            skipped = summary.skipped,
            run_id = %self.journal.run_id(),
            "All transactions completed"
        );
        Ok(RunOutcome::Completed(summary))
    }

    /// Menu, transaction count and amount. `None` when the operator exits.
    async fn collect_plan(&self) -> Result<Option<RunPlan>> {
        self.console.say(BANNER).await?;
        self.console.say("Menu:").await?;
        for entry in MENU {
            self.console.say(entry).await?;
        }

        let choice = self.console.prompt("Enter menu option (1-4): ").await?;
        let mode = match MenuChoice::parse(&choice) {
            MenuChoice::Swap(mode) => mode,
            MenuChoice::Exit => return Ok(None),
            MenuChoice::Invalid => {
                return Err(Error::InvalidArgument(
                    "Invalid menu option. Please enter a number between 1 and 4.".to_string(),
                ))
            }
        };

        let count = self
            .console
            .prompt("Enter number of transactions to perform: ")
            .await?;
        let amount = self
            .console
            .prompt("Enter ETH amount per transaction: ")
            .await?;

        let count = parse_count(&count)?;
        let amount = parse_ether(&amount)
            .ok()
            .filter(|a| !a.is_zero())
            .ok_or_else(invalid_numbers)?;

        Ok(Some(RunPlan {
            mode,
            count,
            amount,
        }))
    }

    /// Total wei the plan needs, including the per-transaction gas reserve.
    /// Fails when the wallet holds less.
    async fn check_balance(&self, signer: &Signer<S::Chain>, plan: &RunPlan) -> Result<U256> {
        let reserve = U256::from(self.config.fees.gas_reserve_per_tx_wei);
        let total = plan
            .amount
            .checked_add(reserve)
            .and_then(|per_tx| per_tx.checked_mul(U256::from(plan.count)))
            .ok_or_else(|| Error::InvalidArgument("Requested total is too large".to_string()))?;

        let available = signer.chain.balance(signer.wallet).await?;
        if available < total {
            return Err(Error::InsufficientBalance {
                required: format_ether(total),
                available: format_ether(available),
            });
        }

        info!(balance = %format_ether(available), "Balance check passed");
        Ok(total)
    }

    async fn confirm(&self, plan: &RunPlan, total: U256) -> Result<()> {
        self.console.say("Summary:").await?;
        self.console
            .say(&format!("Swap type: {}", plan.mode.label()))
            .await?;
        self.console
            .say(&format!("Number of transactions: {}", plan.count))
            .await?;
        self.console
            .say(&format!("ETH per transaction: {} ETH", format_ether(plan.amount)))
            .await?;
        self.console
            .say(&format!("Total ETH (incl. gas): {} ETH", format_ether(total)))
            .await?;

        let answer = self
            .console
            .prompt("Continue with these settings? (y/n): ")
            .await?;
        if !answer.eq_ignore_ascii_case("y") {
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    async fn execute_plan(&self, signer: &Signer<S::Chain>, plan: &RunPlan) -> RunSummary {
        let mut summary = RunSummary::default();

        for index in 0..plan.count {
            let kind = plan.mode.kind_for(index);
            info!(
                transaction = index + 1,
                total = plan.count,
                swap = %kind,
                "Starting transaction"
            );

            match self.swap_once(signer, kind, plan.amount).await {
                Ok(result) if result.succeeded() => {
                    summary.confirmed += 1;
                    self.report_success(signer.wallet, &result).await;
                    self.journal.record(
                        index,
                        kind,
                        Outcome::Confirmed,
                        Some(result.hash.to_string()),
                        Some(result.gas_used),
                        None,
                    );
                }
                Ok(result) => {
                    summary.reverted += 1;
                    error!(tx_hash = %result.hash, gas_used = result.gas_used, "Transaction failed");
                    self.journal.record(
                        index,
                        kind,
                        Outcome::Reverted,
                        Some(result.hash.to_string()),
                        Some(result.gas_used),
                        None,
                    );
                }
                Err(e) => {
                    summary.skipped += 1;
                    error!(error = %e, "Error during transaction");
                    if let Some(reason) = e.revert_reason() {
                        error!(reason, "Revert reason");
                    }
                    self.journal
                        .record(index, kind, Outcome::Skipped, None, None, Some(e.to_string()));
                }
            }

            if index + 1 < plan.count {
                let delay = self.pacing_delay();
                info!(delay_ms = delay.as_millis() as u64, "Waiting before next transaction");
                tokio::time::sleep(delay).await;
            }
        }

        summary
    }

    /// Quote, build and execute one swap
    async fn swap_once(
        &self,
        signer: &Signer<S::Chain>,
        kind: SwapKind,
        amount_in: U256,
    ) -> Result<TransactionResult> {
        let profile = kind.profile();
        let wallet = signer.wallet;

        let quote_request = SwapRequest::for_quote(&self.config.swap, kind, wallet, amount_in)?;
        let quote = self.api.quote(&quote_request).await?;
        let amount_out = quote.amount_out(profile.default_amount_out)?;
        if amount_out.is_default() {
            warn!(
                amount_out = %amount_out.value(),
                "Quote carried no meta, using default amount_out"
            );
        } else {
            info!(amount_out = %amount_out.value(), "Quote received");
        }

        let build_request = SwapRequest::for_build(
            &self.config.swap,
            kind,
            wallet,
            amount_in,
            amount_out.value(),
        )?;
        let built = self.api.build(&build_request).await?;
        let call_data = built.call_data_for(wallet)?;
        info!(bytes = call_data.len(), "Call data received");

        signer
            .executor
            .execute(&SwapCall {
                from: wallet,
                call_data,
                value: amount_in,
                fallback_gas_limit: profile.manual_gas_limit,
            })
            .await
    }

    async fn report_success(&self, wallet: Address, result: &TransactionResult) {
        info!(tx_hash = %result.hash, gas_used = result.gas_used, "Transaction successful");

        let event = TrackEvent::swap(
            &self.config.swap.sender_chain_uid,
            result.hash.to_string(),
            wallet.to_checksum(None),
            &self.config.api.referral_code,
        );
        match self.api.track(&event).await {
            Ok(()) => info!(tx_hash = %result.hash, "Transaction tracked with Euclid"),
            Err(e) => warn!(tx_hash = %result.hash, error = %e, "Transaction tracking failed"),
        }

        info!(
            "View transaction: {}{}",
            self.config.network.explorer_tx_url, result.hash
        );
    }

    fn pacing_delay(&self) -> Duration {
        let pacing = self.config.pacing;
        let ms = rand::rng().random_range(pacing.min_delay_ms..=pacing.max_delay_ms);
        Duration::from_millis(ms)
    }
}

fn invalid_numbers() -> Error {
    Error::InvalidArgument("Invalid input. Please enter positive numbers.".to_string())
}

/// Positive decimal integer, digits only
fn parse_count(input: &str) -> Result<u32> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_numbers());
    }
    input
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(invalid_numbers)
}
