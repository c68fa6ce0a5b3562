use crate::config::Config;
use crate::config::check::{fill_missing_fields, missing_fields};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

fn run_editor(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}

impl ConfigLogic {
    /// The effective configuration as YAML.
    pub fn render(cfg: &Config) -> AppResult<String> {
        Ok(serde_yaml::to_string(cfg)?)
    }

    /// Keys missing from the configuration file on disk.
    pub fn check(path: &Path) -> AppResult<Vec<&'static str>> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        missing_fields(&content)
    }

    /// Add missing keys with their defaults.
    pub fn migrate(path: &Path) -> AppResult<Vec<&'static str>> {
        fill_missing_fields(path)
    }

    /// Open the file in `editor`, falling back to $EDITOR / $VISUAL or the
    /// platform default.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let fallback = default_editor();
        let wanted = editor.map(String::from).unwrap_or_else(|| fallback.clone());

        if run_editor(&wanted, path) {
            success(format!("Configuration file edited using '{}'", wanted));
            return Ok(());
        }
        if wanted != fallback {
            warning(format!(
                "Editor '{}' not available, falling back to '{}'",
                wanted, fallback
            ));
            if run_editor(&fallback, path) {
                success(format!("Configuration file edited using '{}'", fallback));
                return Ok(());
            }
        }
        Err(AppError::Config(format!(
            "failed to edit {} with '{}'",
            path.display(),
            wanted
        )))
    }

    /// Persist the default car. Nothing is written in test mode.
    pub fn set_default_car(cfg: &mut Config, car_id: i64, is_test: bool) -> AppResult<()> {
        cfg.default_car = Some(car_id);
        if !is_test {
            cfg.save()?;
        }
        Ok(())
    }
}
