use clap::Parser;
use marketpay::application::ledger::Ledger;
use marketpay::application::orchestrator::{InitiateRequest, PaymentOrchestrator};
use marketpay::application::payouts::PayoutManager;
use marketpay::config::GatewayConfig;
use marketpay::domain::gateway::{BillingInfo, CompletionNotice, CompletionOutcome};
use marketpay::domain::money;
use marketpay::domain::payout::PayoutOutcome;
use marketpay::domain::transaction::PaymentMethod;
use marketpay::error::PaymentError;
use marketpay::infrastructure::in_memory::InMemoryLedgerStore;
use marketpay::infrastructure::offline::OfflineGateway;
use marketpay::interfaces::csv::balance_writer::BalanceWriter;
use marketpay::interfaces::csv::command_reader::{Command, CommandReader, CommandType};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input replay commands CSV file
    input: PathBuf,

    /// Decline gateway orders above this amount (failure injection for dry runs)
    #[arg(long)]
    decline_over: Option<Decimal>,

    /// Currency for initiated payments
    #[arg(long, default_value = "EGP")]
    currency: String,
}

/// Replays a command stream through the orchestrator against the offline
/// gateway, tracking which sellers were touched so their final balances can
/// be printed.
struct Replay {
    orchestrator: PaymentOrchestrator,
    payouts: PayoutManager,
    ledger: Arc<Ledger>,
    origin: String,
    currency: String,
    sellers: BTreeSet<String>,
}

fn required<T>(value: Option<T>, field: &str) -> std::result::Result<T, PaymentError> {
    value.ok_or_else(|| PaymentError::Validation(format!("missing `{field}` column")))
}

/// Checkout billing data comes from the identity subsystem in production;
/// the replay harness synthesizes it from the buyer id.
fn billing_for(buyer: &str) -> BillingInfo {
    BillingInfo {
        name: buyer.to_string(),
        email: format!("{buyer}@example.com"),
        phone: "+20000000000".to_string(),
        city: "Cairo".to_string(),
    }
}

impl Replay {
    async fn apply(&mut self, cmd: Command) -> std::result::Result<(), PaymentError> {
        match cmd.op {
            CommandType::Initiate => {
                let buyer = required(cmd.buyer, "buyer")?;
                if let Some(seller) = &cmd.seller {
                    self.sellers.insert(seller.clone());
                }
                let billing = billing_for(&buyer);
                self.orchestrator
                    .initiate(InitiateRequest {
                        buyer_id: buyer,
                        seller_id: cmd.seller,
                        reference_id: required(cmd.reference, "reference")?,
                        amount: required(cmd.amount, "amount")?,
                        currency: self.currency.clone(),
                        commission_rate: cmd.rate.unwrap_or(Decimal::ZERO),
                        payment_method: cmd.method.unwrap_or(PaymentMethod::Card),
                        billing,
                    })
                    .await?;
                Ok(())
            }
            CommandType::Confirm => {
                let reference = required(cmd.reference, "reference")?;
                let outcome = match required(cmd.outcome, "outcome")?.as_str() {
                    "success" => CompletionOutcome::Success,
                    "failure" => CompletionOutcome::Failure,
                    other => {
                        return Err(PaymentError::Validation(format!(
                            "unknown confirm outcome `{other}`"
                        )));
                    }
                };
                let tx = self
                    .ledger
                    .transaction_by_reference(&reference)
                    .await?
                    .ok_or_else(|| {
                        PaymentError::NotFound(format!("transaction with reference {reference}"))
                    })?;
                self.orchestrator
                    .confirm_completion(
                        tx.id,
                        CompletionNotice {
                            origin: self.origin.clone(),
                            outcome,
                            gateway_reference: tx.gateway_reference.clone(),
                        },
                    )
                    .await
            }
            CommandType::Payout => {
                let seller = required(cmd.seller, "seller")?;
                self.sellers.insert(seller.clone());
                self.payouts
                    .request_payout(
                        &seller,
                        required(cmd.amount, "amount")?,
                        cmd.method.unwrap_or(PaymentMethod::BankTransfer),
                    )
                    .await?;
                Ok(())
            }
            CommandType::Resolve => {
                let seller = required(cmd.seller, "seller")?;
                let outcome = match required(cmd.outcome, "outcome")?.as_str() {
                    "processed" => PayoutOutcome::Processed,
                    "rejected" => PayoutOutcome::Rejected,
                    other => {
                        return Err(PaymentError::Validation(format!(
                            "unknown payout outcome `{other}`"
                        )));
                    }
                };
                let open = self.ledger.open_payouts(&seller).await?;
                let payout = open.first().ok_or_else(|| {
                    PaymentError::NotFound(format!("open payout for seller {seller}"))
                })?;
                self.payouts.resolve_payout(payout.id, outcome).await?;
                Ok(())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GatewayConfig::from_env();

    let mut gateway = OfflineGateway::new(config.origin.clone());
    if let Some(limit) = cli.decline_over {
        let minor_units = money::to_minor_units(limit).into_diagnostic()?;
        gateway = gateway.declining_over(minor_units);
    }

    let ledger = Arc::new(Ledger::new(Box::new(InMemoryLedgerStore::new())));
    let mut replay = Replay {
        orchestrator: PaymentOrchestrator::new(Arc::new(gateway), ledger.clone()),
        payouts: PayoutManager::new(ledger.clone()),
        ledger: ledger.clone(),
        origin: config.origin,
        currency: cli.currency,
        sellers: BTreeSet::new(),
    };

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for cmd_result in reader.commands() {
        match cmd_result {
            Ok(cmd) => {
                if let Err(e) = replay.apply(cmd).await {
                    eprintln!("Error processing command: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }

    // Output final seller balances
    let mut balances = Vec::new();
    for seller in &replay.sellers {
        balances.push(ledger.balance_snapshot(seller).await.into_diagnostic()?);
    }
    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer.write_balances(balances).into_diagnostic()?;

    Ok(())
}
