use pocket_ledger::cli::run_cli;

fn main() {
    pocket_ledger::init();

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
