use std::io::{self, Write};

use log::info;

use crate::config::{API_KEY_VAR, data_dir, ensure_data_dir, env_file_path};
use crate::error::{Error, Result};

pub fn run(api_key: Option<String>, force: bool) -> Result<()> {
    ensure_data_dir()?;

    let env_file = env_file_path();

    if env_file.exists() && !force {
        println!("Config already exists at {}", env_file.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    let api_key = if let Some(key) = api_key {
        key
    } else {
        print!("Enter your YouTube Data API key: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        input
    };
    let api_key = api_key.trim();

    if api_key.is_empty() {
        return Err(Error::Config("API key is required".to_string()));
    }

    std::fs::write(&env_file, format!("{}={}\n", API_KEY_VAR, api_key))?;
    info!("Wrote {}", env_file.display());

    println!("Config saved to {}", env_file.display());
    println!("Data directory: {}", data_dir().display());

    Ok(())
}
