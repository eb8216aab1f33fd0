use crate::config::{Config, migrate};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Print the file as written, or the effective defaults when there is none.
    pub fn print(path: &Path, effective: &Config) -> AppResult<()> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
            println!("{}", content);
        } else {
            info(format!(
                "{} not found, showing defaults:",
                path.display()
            ));
            println!("{}", effective.to_yaml()?);
        }
        Ok(())
    }

    /// List keys the file lacks. Returns true when the file is complete.
    pub fn check(path: &Path) -> AppResult<bool> {
        if !path.exists() {
            warning(format!("{} not found. Run `init` first.", path.display()));
            return Ok(false);
        }

        let missing = migrate::missing_keys(path)?;
        if missing.is_empty() {
            success("Configuration file is complete.");
            return Ok(true);
        }

        warning(format!("Missing keys: {}", missing.join(", ")));
        info("Run `config --migrate` to add them with default values.");
        Ok(false)
    }

    pub fn migrate(path: &Path) -> AppResult<Vec<String>> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "{} not found. Run `init` first.",
                path.display()
            )));
        }
        migrate::add_missing_keys(path)
    }
}
