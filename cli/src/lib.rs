use clap::Parser;
use cli::{Args, Command};
use command::convert::convert;
use shell::Shell;

mod cli;
mod command;
mod shell;

pub async fn run_cli() -> anyhow::Result<()> {
    let mut shell = Shell::new();

    let args = Args::parse();

    let Some(command) = args.command else {
        eprintln!("No command specified");
        std::process::exit(1);
    };

    match command {
        Command::Convert(args) => convert(&mut shell, args).await?,
    }

    Ok(())
}
