use anyhow::Result;
use keygen::{clap::PrefixOpt, SeedPhrase};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Command line tool for generating Chia and Ethereum keys
#[derive(clap::Parser, Debug)]
pub(crate) struct Cmd {
    #[clap(flatten)]
    pub(crate) opt: Opt,
    #[clap(subcommand)]
    pub(crate) subcommand: Subcommand,
}

#[derive(clap::Parser, Debug)]
pub(crate) struct Opt {
    #[clap(flatten)]
    pub(crate) prefix_opt: PrefixOpt,
    /// Turn on verbose output
    #[clap(long, short, global = true)]
    verbose: bool,
}

impl Opt {
    pub(crate) fn init_logger(&self) -> Result<()> {
        let mut filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

        if self.verbose {
            // The library and this binary share the keygen target prefix.
            filter = filter.add_directive(format!("{}=debug", env!("CARGO_CRATE_NAME")).parse()?);
        };

        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(std::io::stderr)
                .and_then(filter),
        );

        subscriber.init();
        Ok(())
    }
}

#[derive(clap::Parser, Debug)]
pub(crate) enum Subcommand {
    /// Generate a new Chia wallet and print its validator key and first address
    GenerateXchKey {},
    /// Print wallet addresses for an existing mnemonic
    PrintXchAddress {
        /// Mnemonic phrase
        #[clap(env = "KEYGEN_PHRASE", hide_env_values = true)]
        phrase: SeedPhrase,
        /// First wallet index to print
        #[clap(long, default_value_t = 0)]
        index: u32,
        /// Number of consecutive addresses to print
        #[clap(long, default_value_t = 1)]
        count: u32,
    },
    /// Generate a random secp256k1 account with an Ethereum address
    GenerateEthKey {},
    /// Generate bash shell completion script
    GenerateShellCompletions {
        /// Which shell to generate for
        #[clap(default_value_t = clap_complete::Shell::Bash)]
        shell: clap_complete::Shell,
    },
    /// Config file management
    Config {
        #[clap(subcommand)]
        opt: crate::config::Opt,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn verify_command() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn parse_print_address() {
        const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let cmd = Cmd::parse_from(["keygen", "print-xch-address", PHRASE, "--count", "3", "--prefix", "txch"]);
        assert_eq!(cmd.opt.prefix_opt.prefix.unwrap().as_str(), "txch");
        match cmd.subcommand {
            Subcommand::PrintXchAddress {
                phrase,
                index: 0,
                count: 3,
            } => assert_eq!(phrase.phrase(), PHRASE),
            _ => panic!("Wrong subcommand"),
        }
    }

    #[test]
    fn rejects_bad_phrase() {
        let err = Cmd::try_parse_from(["keygen", "print-xch-address", "not a valid phrase"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
