//! taxlot-report - Compute realized gains from a transaction log.

fn main() -> std::process::ExitCode {
    taxlot::cmd::report_cmd::main()
}
