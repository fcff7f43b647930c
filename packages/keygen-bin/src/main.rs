mod cli;
mod config;
mod eth;
mod xch;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Subcommand;

fn main() -> Result<()> {
    let cmd = cli::Cmd::parse();
    cmd.opt.init_logger()?;

    tracing::debug!("Verbose logging enabled");

    cmd.subcommand.go(cmd.opt)
}

impl Subcommand {
    pub(crate) fn go(self, opt: cli::Opt) -> Result<()> {
        match self {
            Subcommand::GenerateXchKey {} => {
                xch::generate_key(opt.prefix_opt.key_deriver()?)?;
            }
            Subcommand::PrintXchAddress {
                phrase,
                index,
                count,
            } => {
                xch::print_addresses(opt.prefix_opt.key_deriver()?, &phrase, index, count);
            }
            Subcommand::GenerateEthKey {} => eth::generate_key()?,
            Subcommand::GenerateShellCompletions { shell } => {
                clap_complete::generate(
                    shell,
                    &mut cli::Cmd::command(),
                    "keygen",
                    &mut std::io::stdout(),
                );
            }
            Subcommand::Config { opt: inner } => config::go(opt, inner)?,
        }

        Ok(())
    }
}
