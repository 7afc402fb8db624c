use anyhow::Result;

use crate::chat::HistoryDir;
use crate::core::AppConfig;

pub fn list(app_config: &AppConfig) -> Result<()> {
    let history = HistoryDir::new(&app_config.history_dir);
    let names = history.list_consolidated_sessions()?;
    if names.is_empty() {
        println!("No saved sessions in {}", history.path().display());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

pub fn show(app_config: &AppConfig, name: &str) -> Result<()> {
    let history = HistoryDir::new(&app_config.history_dir);
    match history.read(name)? {
        Some(text) => println!("{}", text),
        None => println!("Not found: {}", name),
    }
    Ok(())
}
