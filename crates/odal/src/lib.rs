//! Layered TOML configuration.
//!
//! A configuration type names its file through [`Config::PATH`] and is loaded from a
//! directory. An optional overlay directory may contain a file with the same name whose
//! values replace the ones from the main file, see [`merge_tables`].
use std::{fs, path::Path};

use serde::{Serialize, de::DeserializeOwned};
use toml::Table;

mod error;
#[cfg(test)]
mod tests;

pub use error::{Error, Result};

pub trait Config: Serialize + DeserializeOwned {
    /// File name of the configuration, relative to the configuration directory.
    const PATH: &'static str;

    /// Load the configuration from `<dir>/<PATH>`.
    fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(Self::PATH);
        from_table(&path, read_table(&path)?)
    }

    /// Load the configuration from `<dir>/<PATH>`, with the values from
    /// `<overlay_dir>/<PATH>` taking precedence.
    ///
    /// Keys that only the overlay sets are added, so optional values can be enabled per
    /// overlay. A missing overlay file is not an error, the main configuration is used as-is.
    fn load_with_overlay(dir: impl AsRef<Path>, overlay_dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(Self::PATH);
        let main = read_table(&path)?;

        let overlay_path = overlay_dir.as_ref().join(Self::PATH);
        let table = match read_table(&overlay_path) {
            Ok(overlay) => merge_tables(main, overlay, true),
            Err(Error::NotFound { .. }) => {
                tracing::debug!(path = %overlay_path.display(), "no overlay found");
                main
            }
            Err(error) => return Err(error),
        };

        from_table(&path, table)
    }

    /// Store the configuration at `<dir>/<PATH>`, creating `dir` if needed.
    fn store(&self, dir: impl AsRef<Path>) -> Result<()> {
        fs::create_dir_all(dir.as_ref())?;
        fs::write(dir.as_ref().join(Self::PATH), toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path)?
        .parse::<Table>()
        .map_err(|source| Error::Deserialize {
            path: path.to_path_buf(),
            source,
        })
}

fn from_table<T: DeserializeOwned>(path: &Path, table: Table) -> Result<T> {
    toml::Value::Table(table)
        .try_into()
        .map_err(|source| Error::Deserialize {
            path: path.to_path_buf(),
            source,
        })
}

/// Recursively merge `overlay` on top of `main`.
///
/// Values from `overlay` replace values in `main`, nested tables are merged key by key.
/// Keys that only exist in `overlay` are only added when `add_key` is set.
#[must_use]
pub fn merge_tables(main: Table, mut overlay: Table, add_key: bool) -> Table {
    let mut merged = Table::new();

    for (key, value) in main {
        let merged_value = match (value, overlay.remove(&key)) {
            (toml::Value::Table(main_table), Some(toml::Value::Table(overlay_table))) => {
                toml::Value::Table(merge_tables(main_table, overlay_table, add_key))
            }
            // a table cannot be replaced by a scalar, keep the original
            (main_value @ toml::Value::Table(_), Some(_)) => main_value,
            (_, Some(overlay_value)) => overlay_value,
            (main_value, None) => main_value,
        };

        merged.insert(key, merged_value);
    }

    if add_key {
        merged.extend(overlay);
    }

    merged
}
