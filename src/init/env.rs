use tower::BoxError;

/// Load `KEY=value` pairs from a dotenv file into the process environment.
///
/// Values go through dotenvy's `${VAR}` expansion against the environment and
/// earlier keys of the same file; single-quoted values stay literal. Variables
/// already set in the environment are overwritten.
pub fn load_file(env_file: &str) -> Result<(), BoxError> {
    let updates = load_file_updates(env_file)?;

    for (key, val) in updates {
        // Runs during start-up, before the runtime spawns any threads.
        unsafe { std::env::set_var(key, val) }
    }

    Ok(())
}

fn load_file_updates(env_file: &str) -> Result<Vec<(String, String)>, BoxError> {
    let mut updates = Vec::new();
    for item in dotenvy::from_filename_iter(env_file)
        .map_err(|e| format!("failed to open env file {}: {}", env_file, e))?
    {
        let (key, val) = item.map_err(|e| format!("unable to parse line: {}", e))?;
        updates.push((key, val))
    }

    Ok(updates)
}
