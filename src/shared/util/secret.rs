use std::fs;
use std::io::prelude::*;
use actix_web::cookie::Key;

/// Loads the session signing key, creating it on first launch so that
/// logins survive a server restart
pub fn get_session_key(file_path: &str) -> std::io::Result<Key> {
    if let Ok(contents) = fs::read(file_path) {
        if let Ok(key) = Key::try_from(contents.as_slice()) {
            return Ok(key);
        }
        log::warn!("Session key at {} is invalid, generating a new one", file_path);
    }

    let key = Key::generate();
    let mut file = fs::File::create(file_path)?;
    file.write_all(key.master())?;
    log::info!("Generated a new session key at {}", file_path);
    Ok(key)
}
