use crate::config::{self, CliOverrides, PROJECT_CONFIG_DIR};
use crate::error::Result;
use crate::storage::RecordStore;
use std::fs;
use std::path::Path;
use tracing::info;

const CONFIG_TEMPLATE: &str = r"# rotsit project configuration
# actor: alice
# editor: vim
";

/// Execute the init command.
///
/// Creates the database at the configured path and a commented config
/// template in `.rotsit/` next to it.
///
/// # Errors
///
/// Returns an error if the database already exists (without `force`) or
/// cannot be written.
pub fn execute(force: bool, json: bool, cli: &CliOverrides) -> Result<()> {
    let config = config::load_config(cli)?;
    info!(path = %config.db_path.display(), force, "Initializing issue database");

    let store = RecordStore::init(&config.db_path, force)?;
    write_config_template(store.path())?;

    if json {
        let result = serde_json::json!({
            "action": "init",
            "path": store.path().display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Initialized issue database at {}", store.path().display());
    }
    Ok(())
}

fn write_config_template(db_path: &Path) -> Result<()> {
    let dir = db_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(PROJECT_CONFIG_DIR);
    let config_path = dir.join("config.yaml");
    if !config_path.exists() {
        fs::create_dir_all(&dir)?;
        fs::write(config_path, CONFIG_TEMPLATE)?;
    }
    Ok(())
}
