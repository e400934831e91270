// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vea` — a thin TCP client for `vead`'s Request Dispatcher (spec §4.8).
//!
//! Every subcommand opens a fresh connection, issues one request, prints
//! the response, and exits; this runtime's clients are remote, not a
//! local CLI sharing daemon state, so there is no persistent session.

mod client;
mod color;
mod commands;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "vea",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Client for the vea edge application runtime",
    styles = color::styles()
)]
struct Cli {
    /// Host running `vead`.
    #[arg(long, global = true, env = "VEA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port `vead`'s Request Dispatcher is listening on.
    #[arg(long, global = true, env = "VEA_PORT", default_value_t = 7070)]
    port: u16,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a payload and register it as a deployed application.
    Deploy(commands::deploy::DeployArgs),
    /// Start (or restart) a deployed application.
    Run(commands::lifecycle::AppIdArg),
    /// Stop a running or paused application, by app id or execution id.
    Stop(commands::lifecycle::StopArgs),
    /// Pause a running application.
    Pause(commands::lifecycle::AppIdArg),
    /// Resume a paused application.
    Resume(commands::lifecycle::AppIdArg),
    /// Remove a deployed application and its stored payload.
    Uninstall(commands::lifecycle::AppIdArg),
    /// List deployed applications.
    List(commands::list::ListArgs),
    /// Read one or more signal values.
    GetSignal(commands::signals::GetSignalArgs),
    /// Write one or more signal values.
    SetSignal(commands::signals::SetSignalArgs),
    /// Print the runtime's identity and capabilities.
    Info,
    /// Check that `vead` is reachable.
    Ping,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        match err.downcast::<ExitError>() {
            Ok(exit_err) => {
                if !exit_err.message.is_empty() {
                    eprintln!("{}", exit_err.message);
                }
                std::process::exit(exit_err.code);
            }
            Err(err) => {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut client = client::VeaClient::connect(&cli.host, cli.port)
        .await
        .map_err(|err| ExitError::new(2, err.to_string()))?;

    match cli.command {
        Command::Deploy(args) => commands::deploy::handle(&mut client, cli.format, args).await,
        Command::Run(args) => commands::lifecycle::run(&mut client, cli.format, args).await,
        Command::Stop(args) => commands::lifecycle::stop(&mut client, cli.format, args).await,
        Command::Pause(args) => commands::lifecycle::pause(&mut client, cli.format, args).await,
        Command::Resume(args) => commands::lifecycle::resume(&mut client, cli.format, args).await,
        Command::Uninstall(args) => commands::lifecycle::uninstall(&mut client, cli.format, args).await,
        Command::List(args) => commands::list::handle(&mut client, cli.format, args).await,
        Command::GetSignal(args) => commands::signals::get(&mut client, cli.format, args).await,
        Command::SetSignal(args) => commands::signals::set(&mut client, cli.format, args).await,
        Command::Info => commands::info::info(&mut client, cli.format).await,
        Command::Ping => commands::info::ping(&mut client, cli.format).await,
    }
}
