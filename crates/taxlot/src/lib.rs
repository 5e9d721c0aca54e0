//! Realized-gain tax reporting CLI.
//!
//! This crate provides the `taxlot-report` command, which reads a transaction
//! log, books every buy, trade and sale into a ledger, and prints the gain
//! report and final balances.
//!
//! # Example Usage
//!
//! ```bash
//! taxlot-report trades.csv
//! taxlot-report trades.csv --currency BTC,ETH --format json
//! RUST_LOG=taxlot_booking=trace taxlot-report trades.csv
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod render;
