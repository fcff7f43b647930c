use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

use crate::address::AddressPrefix;
use crate::error::AddressError;

/// Item path holding the Chia address prefix.
pub const PREFIX_ITEM: &[&str] = &["xch", "prefix"];

/// Layered settings, read from a TOML file and `KEYGEN_CONFIG_` environment variables.
///
/// Nested items are addressed by path, e.g. `["xch", "prefix"]`. In the
/// environment, the path segments are joined with `__`, as in
/// `KEYGEN_CONFIG_XCH__PREFIX=txch`.
#[derive(Debug, Clone)]
pub struct KeygenConfig {
    path: PathBuf,
    inner: toml::Table,
}

/// Errors which can occur while loading or editing the config file.
#[derive(thiserror::Error, Debug)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("Misconfiguration detected, unable to find your default config file location")]
    ProjectDirsNotFound,
    #[error("Error loading config file {}: {source}", path.display())]
    ConfigLoadError {
        source: figment::Error,
        path: PathBuf,
    },
    #[error("Config item path must not be empty")]
    EmptyItemPath,
    #[error("Config item {item} not found in {}", path.display())]
    MissingItem { item: String, path: PathBuf },
    #[error("Config item {item} in {} is not a string: {value}", path.display())]
    NotAString {
        item: String,
        value: toml::Value,
        path: PathBuf,
    },
    #[error("Config item {item} cannot hold nested values")]
    NotATable { item: String },
    #[error("Invalid address prefix in config file {}: {source}", path.display())]
    InvalidPrefix {
        source: AddressError,
        path: PathBuf,
    },
    #[error(transparent)]
    TomlSerialization { source: toml::ser::Error },
    #[error("Unable to write config to {}: {source}", path.display())]
    ConfigWrite {
        source: std::io::Error,
        path: PathBuf,
    },
}

impl KeygenConfig {
    /// Find the default config file location
    pub fn default_file() -> Result<PathBuf, ConfigError> {
        let dirs = directories::ProjectDirs::from("com", "keygen", "keygen")
            .ok_or(ConfigError::ProjectDirsNotFound)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load the config values from the default config file location
    pub fn load() -> Result<KeygenConfig, ConfigError> {
        Self::load_from(&Self::default_file()?, false)
    }

    /// Load the config values from the specified file
    pub fn load_from(config: &Path, required: bool) -> Result<KeygenConfig, ConfigError> {
        if required && !config.exists() {
            return Err(ConfigError::FileNotFound {
                path: config.to_owned(),
            });
        }
        let inner = Figment::new()
            .merge(Toml::file(config))
            .merge(Env::prefixed("KEYGEN_CONFIG_").split("__"))
            .extract()
            .map_err(|source| ConfigError::ConfigLoadError {
                source,
                path: config.to_owned(),
            })?;
        tracing::debug!("Loaded config from {}", config.display());
        Ok(KeygenConfig {
            path: config.to_owned(),
            inner,
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a string item by its path.
    pub fn get_item(&self, item: &[&str]) -> Result<String, ConfigError> {
        let (last, parents) = item.split_last().ok_or(ConfigError::EmptyItemPath)?;
        let missing = || ConfigError::MissingItem {
            item: item.join("."),
            path: self.path.clone(),
        };
        let mut table = &self.inner;
        for segment in parents {
            table = table
                .get(*segment)
                .and_then(toml::Value::as_table)
                .ok_or_else(missing)?;
        }
        match table.get(*last).ok_or_else(missing)? {
            toml::Value::String(s) => Ok(s.clone()),
            value => Err(ConfigError::NotAString {
                item: item.join("."),
                value: value.clone(),
                path: self.path.clone(),
            }),
        }
    }

    /// The configured address prefix, or `xch` if none is set.
    pub fn address_prefix(&self) -> Result<AddressPrefix, ConfigError> {
        match self.get_item(PREFIX_ITEM) {
            Ok(prefix) => prefix
                .parse()
                .map_err(|source| ConfigError::InvalidPrefix {
                    source,
                    path: self.path.clone(),
                }),
            Err(ConfigError::MissingItem { .. }) => Ok(AddressPrefix::default()),
            Err(e) => Err(e),
        }
    }

    /// Set an item, creating intermediate tables as needed.
    pub fn set_item(&mut self, item: &[&str], value: impl Into<toml::Value>) -> Result<(), ConfigError> {
        let (last, parents) = item.split_last().ok_or(ConfigError::EmptyItemPath)?;
        let mut table = &mut self.inner;
        for (idx, segment) in parents.iter().enumerate() {
            table = table
                .entry(*segment)
                .or_insert(toml::Value::Table(toml::Table::new()))
                .as_table_mut()
                .ok_or_else(|| ConfigError::NotATable {
                    item: item[..=idx].join("."),
                })?;
        }
        table.insert((*last).to_owned(), value.into());
        Ok(())
    }

    /// Print out a description of the config file
    pub fn print(&self) -> Result<(), ConfigError> {
        println!("Location: {}", self.path.display());
        let s = toml::to_string_pretty(&self.inner)
            .map_err(|source| ConfigError::TomlSerialization { source })?;
        if !s.is_empty() {
            println!();
            print!("{s}");
        }
        Ok(())
    }

    /// Write the config to the original file.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&self.path)
    }

    /// Write the config to the given file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let s = toml::to_string_pretty(&self.inner)
            .map_err(|source| ConfigError::TomlSerialization { source })?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent).map_err(|source| ConfigError::ConfigWrite {
                source,
                path: path.to_owned(),
            })?;
        }
        fs_err::write(path, s).map_err(|source| ConfigError::ConfigWrite {
            source,
            path: path.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn missing_prefix_defaults_to_mainnet() {
        Jail::expect_with(|_jail| {
            let config = KeygenConfig::load_from(Path::new("config.toml"), false).unwrap();
            assert_eq!(config.address_prefix().unwrap(), AddressPrefix::mainnet());
            match config.get_item(PREFIX_ITEM) {
                Err(ConfigError::MissingItem { item, .. }) => assert_eq!(item, "xch.prefix"),
                other => panic!("Unexpected result {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn prefix_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[xch]\nprefix = \"txch\"\n")?;
            let config = KeygenConfig::load_from(Path::new("config.toml"), true).unwrap();
            assert_eq!(config.get_item(PREFIX_ITEM).unwrap(), "txch");
            assert_eq!(config.address_prefix().unwrap(), AddressPrefix::testnet());
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[xch]\nprefix = \"txch\"\n")?;
            jail.set_env("KEYGEN_CONFIG_XCH__PREFIX", "xcc");
            let config = KeygenConfig::load_from(Path::new("config.toml"), true).unwrap();
            assert_eq!(config.get_item(PREFIX_ITEM).unwrap(), "xcc");
            Ok(())
        });
    }

    #[test]
    fn required_file_must_exist() {
        Jail::expect_with(|_jail| {
            match KeygenConfig::load_from(Path::new("nested/config.toml"), true) {
                Err(ConfigError::FileNotFound { .. }) => (),
                other => panic!("Unexpected result {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn non_string_and_invalid_items() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "xch = 5\n[other]\nprefix = \"not valid\"\n")?;
            let config = KeygenConfig::load_from(Path::new("config.toml"), true).unwrap();
            match config.get_item(&["xch"]) {
                Err(ConfigError::NotAString { .. }) => (),
                other => panic!("Unexpected result {other:?}"),
            }
            match config.get_item(&[]) {
                Err(ConfigError::EmptyItemPath) => (),
                other => panic!("Unexpected result {other:?}"),
            }
            assert_eq!(config.get_item(&["other", "prefix"]).unwrap(), "not valid");
            Ok(())
        });
    }

    #[test]
    fn invalid_prefix_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[xch]\nprefix = \"not valid\"\n")?;
            let config = KeygenConfig::load_from(Path::new("config.toml"), true).unwrap();
            match config.address_prefix() {
                Err(ConfigError::InvalidPrefix { .. }) => (),
                other => panic!("Unexpected result {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn set_and_save_roundtrip() {
        Jail::expect_with(|_jail| {
            let mut config = KeygenConfig::load_from(Path::new("config.toml"), false).unwrap();
            config.set_item(PREFIX_ITEM, "txch").unwrap();
            config.save().unwrap();

            let reloaded = KeygenConfig::load_from(Path::new("config.toml"), true).unwrap();
            assert_eq!(reloaded.address_prefix().unwrap(), AddressPrefix::testnet());

            config.set_item(&["xch", "prefix", "nested"], "x").unwrap_err();
            config.save_to("nested/dir/config.toml").unwrap();
            KeygenConfig::load_from(Path::new("nested/dir/config.toml"), true).unwrap();
            Ok(())
        });
    }
}
