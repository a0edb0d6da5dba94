mod check;
mod common;
mod completions;
mod config;
mod help;
mod init;

use anyhow::Result;

use crate::cli::{CliArgs, CommandKind};

pub fn dispatch(args: &CliArgs) -> Result<()> {
    match &args.command {
        CommandKind::Help { all, command } => help::run(*all, command.as_deref()),
        CommandKind::Check(cmd) => check::run(args, cmd),
        CommandKind::Config(_) => config::run(args),
        CommandKind::Init(cmd) => init::run(args, cmd),
        CommandKind::Completions(cmd) => completions::run(args, cmd),
    }
}
