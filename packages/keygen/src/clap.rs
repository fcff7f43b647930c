//! Provides helpers for choosing the address prefix from command line parameters.

use std::path::PathBuf;

use crate::{
    config::{ConfigError, KeygenConfig},
    AddressPrefix, KeyDeriver, Result,
};

/// Command line options for selecting the network's address prefix
#[derive(clap::Parser, Clone, Debug)]
pub struct PrefixOpt {
    /// Human readable part (HRP) of addresses, e.g. xch or txch.
    /// Overrides the prefix from the config file.
    #[clap(long, env = "KEYGEN_PREFIX", global = true)]
    pub prefix: Option<AddressPrefix>,
    /// Config file to use instead of the default location
    #[clap(long, env = "KEYGEN_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

impl PrefixOpt {
    /// Load the config file, which must exist if it was given explicitly.
    pub fn load_config(&self) -> Result<KeygenConfig, ConfigError> {
        match &self.config {
            Some(path) => KeygenConfig::load_from(path, true),
            None => KeygenConfig::load(),
        }
    }

    /// The command line prefix, falling back to the config file and then `xch`.
    pub fn resolve(&self) -> Result<AddressPrefix, ConfigError> {
        match self.prefix {
            Some(prefix) => Ok(prefix),
            None => self.load_config()?.address_prefix(),
        }
    }

    /// Convenient for calling [PrefixOpt::resolve] and then [KeyDeriver::new].
    pub fn key_deriver(&self) -> Result<KeyDeriver> {
        let prefix = self.resolve()?;
        tracing::debug!("Using address prefix {prefix}");
        Ok(KeyDeriver::new(prefix))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use figment::Jail;

    use super::*;

    #[derive(clap::Parser, Debug)]
    struct Cmd {
        #[clap(flatten)]
        opt: PrefixOpt,
    }

    #[test]
    fn flag_wins_over_config() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[xch]\nprefix = \"xcc\"\n")?;
            let cmd = Cmd::parse_from(["keygen", "--prefix", "TXCH", "--config", "config.toml"]);
            assert_eq!(cmd.opt.resolve().unwrap(), AddressPrefix::testnet());
            Ok(())
        });
    }

    #[test]
    fn config_wins_over_default() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[xch]\nprefix = \"txch\"\n")?;
            let cmd = Cmd::parse_from(["keygen", "--config", "config.toml"]);
            assert_eq!(cmd.opt.resolve().unwrap(), AddressPrefix::testnet());
            Ok(())
        });
    }

    #[test]
    fn explicit_config_must_exist() {
        Jail::expect_with(|_jail| {
            let cmd = Cmd::parse_from(["keygen", "--config", "missing.toml"]);
            cmd.opt.resolve().unwrap_err();
            Ok(())
        });
    }

    #[test]
    fn key_deriver_reports_config_errors() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[xch]\nprefix = \"not valid\"\n")?;
            let cmd = Cmd::parse_from(["keygen", "--config", "config.toml"]);
            match cmd.opt.key_deriver() {
                Err(crate::Error::Config(ConfigError::InvalidPrefix { .. })) => (),
                other => panic!("Unexpected result {other:?}"),
            }
            let cmd = Cmd::parse_from(["keygen", "--prefix", "txch", "--config", "config.toml"]);
            assert_eq!(cmd.opt.key_deriver().unwrap().prefix(), AddressPrefix::testnet());
            Ok(())
        });
    }

    #[test]
    fn invalid_prefix_flag() {
        Cmd::try_parse_from(["keygen", "--prefix", "not valid"]).unwrap_err();
    }
}
