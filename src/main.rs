use chrono::Utc;
use clap::Parser;
use lockerdesk::application::engine::RenewalEngine;
use lockerdesk::domain::ports::{LockerStoreBox, PaymentStoreBox, SequenceGeneratorBox};
use lockerdesk::infrastructure::in_memory::{
    InMemoryLockerStore, InMemoryPaymentStore, InMemorySequence,
};
use lockerdesk::interfaces::csv::operation_reader::{OpKind, OperationReader};
use lockerdesk::interfaces::csv::receipt_writer::ReceiptWriter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input front-desk operations CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let engine = match cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            // Use persistent storage (RocksDB); one store backs all three ports
            let store =
                lockerdesk::infrastructure::rocksdb::RocksDBStore::open(db_path).into_diagnostic()?;

            let lockers: LockerStoreBox = Box::new(store.clone());
            let payments: PaymentStoreBox = Box::new(store.clone());
            let sequence: SequenceGeneratorBox = Box::new(store);

            RenewalEngine::new(lockers, payments, sequence)
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            return Err(miette::miette!(
                "--db-path requires building with the storage-rocksdb feature"
            ));
        }
        None => {
            // Use in-memory storage
            let lockers: LockerStoreBox = Box::new(InMemoryLockerStore::new());
            let payments: PaymentStoreBox = Box::new(InMemoryPaymentStore::new());
            let sequence: SequenceGeneratorBox = Box::new(InMemorySequence::new());

            RenewalEngine::new(lockers, payments, sequence)
        }
    };

    // Process operations
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for row_result in reader.operations() {
        match row_result {
            Ok(row) => {
                let locker_no = row.locker;
                let result = match row.op {
                    OpKind::Register => {
                        engine.register_locker(locker_no, row.into_registration()).await
                    }
                    OpKind::Payment | OpKind::Cancel => {
                        let submission =
                            row.into_raw_submission().coerce(Utc::now().date_naive());
                        engine.process_payment(locker_no, submission).await.map(|_| ())
                    }
                };
                if let Err(e) = result {
                    eprintln!("Error processing operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Collect the receipt log from the engine
    let receipts = engine.into_receipts().await.into_diagnostic()?;

    // Output receipts
    let stdout = io::stdout();
    let mut writer = ReceiptWriter::new(stdout.lock());
    writer.write_receipts(receipts).into_diagnostic()?;

    Ok(())
}
