//! Sample transaction generator
//!
//! Writes synthetic CSV uploads for exercising the bulk pipeline, with an
//! adjustable share of account-draining transactions and optional
//! provider-style (aliased) headers.

use anyhow::{Context, Result};
use clap::Parser;
use fraudshield::{TransactionRecord, TransactionType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "generate-samples")]
#[command(about = "Write synthetic transaction CSV files")]
struct Args {
    /// Number of rows
    #[arg(short, long, default_value_t = 100)]
    count: usize,
    /// Share of account-draining rows (0.0 - 1.0)
    #[arg(long, default_value_t = 0.1)]
    fraud_rate: f64,
    /// Use provider-style header names (`amt`, `old_balance_sender`, ...)
    #[arg(long)]
    alias_headers: bool,
    /// Append a `Reference` column the pipeline passes through untouched
    #[arg(long)]
    reference_column: bool,
    /// RNG seed for reproducible files
    #[arg(long)]
    seed: Option<u64>,
    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

const CANONICAL_HEADERS: [&str; 6] = [
    "type",
    "amount",
    "oldBalanceSender",
    "newBalanceSender",
    "oldBalanceReceiver",
    "newBalanceReceiver",
];

/// Same fields, provider naming, `type` last
const ALIAS_HEADERS: [&str; 6] = [
    "amt",
    "old_balance_sender",
    "new_balance_sender",
    "old_balance_receiver",
    "new_balance_receiver",
    "type",
];

/// Transaction generator for testing
struct TransactionGenerator {
    rng: StdRng,
}

impl TransactionGenerator {
    fn new(seed: Option<u64>) -> Self {
        Self {
            rng: match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
        }
    }

    fn money(&mut self, low: f64, high: f64) -> f64 {
        (self.rng.gen_range(low..high) * 100.0).round() / 100.0
    }

    /// Balanced movement: sender pays, receiver is credited
    fn generate_legitimate(&mut self) -> TransactionRecord {
        let tx_type = TransactionType::ALL[self.rng.gen_range(0..TransactionType::ALL.len())];
        let old_balance_sender = self.money(500.0, 50_000.0);
        let amount = self.money(1.0, old_balance_sender);
        let old_balance_receiver = self.money(0.0, 20_000.0);

        let (new_balance_sender, new_balance_receiver) = match tx_type {
            TransactionType::Deposit => (old_balance_sender + amount, old_balance_receiver),
            _ => (old_balance_sender - amount, old_balance_receiver + amount),
        };

        TransactionRecord {
            tx_type,
            amount,
            old_balance_sender,
            new_balance_sender: (new_balance_sender * 100.0).round() / 100.0,
            old_balance_receiver,
            new_balance_receiver: (new_balance_receiver * 100.0).round() / 100.0,
        }
    }

    /// Account drained through a transfer or cash-out; receiver unchanged
    fn generate_suspicious(&mut self) -> TransactionRecord {
        let tx_type = if self.rng.gen_bool(0.5) {
            TransactionType::Transfer
        } else {
            TransactionType::CashOut
        };
        let amount = self.money(10_000.0, 1_000_000.0);

        TransactionRecord {
            tx_type,
            amount,
            old_balance_sender: amount,
            new_balance_sender: 0.0,
            old_balance_receiver: 0.0,
            new_balance_receiver: 0.0,
        }
    }
}

fn row(record: &TransactionRecord, alias_headers: bool) -> Vec<String> {
    let numbers = [
        record.amount,
        record.old_balance_sender,
        record.new_balance_sender,
        record.old_balance_receiver,
        record.new_balance_receiver,
    ]
    .map(|v| v.to_string());
    let tx_type = record.tx_type.as_str().to_string();

    if alias_headers {
        numbers.into_iter().chain(std::iter::once(tx_type)).collect()
    } else {
        std::iter::once(tx_type).chain(numbers).collect()
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("generate_samples=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let fraud_rate = args.fraud_rate.clamp(0.0, 1.0);

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut wtr = csv::Writer::from_writer(sink);

    let mut headers: Vec<&str> = if args.alias_headers {
        ALIAS_HEADERS.to_vec()
    } else {
        CANONICAL_HEADERS.to_vec()
    };
    if args.reference_column {
        headers.push("Reference");
    }
    wtr.write_record(&headers)?;

    let mut generator = TransactionGenerator::new(args.seed);
    let mut suspicious = 0usize;

    for idx in 0..args.count {
        let record = if generator.rng.gen_bool(fraud_rate) {
            suspicious += 1;
            generator.generate_suspicious()
        } else {
            generator.generate_legitimate()
        };

        let mut fields = row(&record, args.alias_headers);
        if args.reference_column {
            fields.push(format!("REF-{:06}", idx + 1));
        }
        wtr.write_record(&fields)?;
    }
    wtr.flush()?;

    info!(
        rows = args.count,
        suspicious = suspicious,
        alias_headers = args.alias_headers,
        "Samples written"
    );

    Ok(())
}
