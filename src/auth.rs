use thiserror::Error;

/// Why the password gate stayed closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No access password is configured (set APP_PASSWORD).")]
    NotConfigured,

    #[error("Password missing.")]
    Missing,

    #[error("Incorrect password.")]
    Incorrect,
}

/// Compare the entered password with the configured shared secret.
pub fn verify(candidate: &str, secret: Option<&str>) -> Result<(), AuthError> {
    let secret = secret.ok_or(AuthError::NotConfigured)?;
    if candidate.is_empty() {
        return Err(AuthError::Missing);
    }
    if candidate != secret {
        return Err(AuthError::Incorrect);
    }
    Ok(())
}
