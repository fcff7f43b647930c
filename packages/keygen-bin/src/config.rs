use std::str::FromStr;

use anyhow::Result;
use keygen::{
    config::{KeygenConfig, PREFIX_ITEM},
    AddressPrefix,
};

#[derive(clap::Parser, Debug)]
pub(crate) enum Opt {
    /// Print the location of the config file
    File {},
    /// Print the values from the config
    Print {},
    /// Set a config value
    Set {
        /// Config key
        key: ConfigKey,
        /// Value
        value: String,
    },
}

// Parsed through serde so unknown keys list the accepted names
#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ConfigKey {
    #[serde(rename = "xch.prefix")]
    XchPrefix,
}

impl ConfigKey {
    fn item(self) -> &'static [&'static str] {
        match self {
            ConfigKey::XchPrefix => PREFIX_ITEM,
        }
    }
}

impl FromStr for ConfigKey {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
    }
}

pub(crate) fn go(opt: crate::cli::Opt, inner: Opt) -> Result<()> {
    match inner {
        Opt::File {} => {
            match opt.prefix_opt.config {
                Some(file) => {
                    tracing::info!(
                        "Config file overridden by command line parameter or environment variable"
                    );
                    println!("{}", file.display());
                }
                None => {
                    println!("{}", KeygenConfig::default_file()?.display())
                }
            }
            Ok(())
        }
        Opt::Print {} => {
            let config = opt.prefix_opt.load_config()?;
            config.print()?;
            Ok(())
        }
        Opt::Set { key, value } => {
            let mut config = opt.prefix_opt.load_config()?;
            match key {
                ConfigKey::XchPrefix => {
                    let prefix: AddressPrefix = value.parse()?;
                    config.set_item(key.item(), prefix.as_str())?;
                }
            }
            config.save()?;
            println!("Changes saved");
            Ok(())
        }
    }
}
