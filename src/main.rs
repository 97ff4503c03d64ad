use std::io;
use std::process;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use spendbook::accounting::ValidationError;
use spendbook::commands::{Command, Handler};
use spendbook::config::Cli;
use spendbook::data::LedgerStore;
use spendbook::report;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store = LedgerStore::new(cli.data_file);
    let mut ledger = store.load()?;

    let command: Command = cli.action.into();
    match command.handle(&mut ledger, &store) {
        Ok(outcome) => report::render(&outcome, &mut io::stdout().lock())?,
        Err(err) => match err.downcast_ref::<ValidationError>() {
            Some(invalid) => {
                eprintln!("error: {}", invalid);
                process::exit(1);
            },
            None => return Err(err),
        },
    }

    Ok(())
}
