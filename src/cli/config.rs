use anyhow::Result;

use crate::core::config::read_raw;
use crate::core::{AppConfig, Config};

pub fn run(app_config: &AppConfig) -> Result<()> {
    let path = &app_config.config_path;
    match read_raw(path)? {
        Some(text) => {
            println!("# {}", path.display());
            println!("{}", text);
        }
        None => println!("Not found: {}", path.display()),
    }

    let config = Config::load(path)?;
    println!("{}", config.status());
    Ok(())
}
