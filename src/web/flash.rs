//! One-time messages carried in the session until the next page renders.

use tower_sessions::Session;

use super::AppError;
use crate::constants::auth::SESSION_FLASH_KEY;

pub async fn push(session: &Session, message: impl Into<String>) -> Result<(), AppError> {
    let mut messages: Vec<String> = session.get(SESSION_FLASH_KEY).await?.unwrap_or_default();
    messages.push(message.into());
    session.insert(SESSION_FLASH_KEY, messages).await?;
    Ok(())
}

/// Removes and returns pending messages, oldest first.
pub async fn take(session: &Session) -> Result<Vec<String>, AppError> {
    Ok(session
        .remove::<Vec<String>>(SESSION_FLASH_KEY)
        .await?
        .unwrap_or_default())
}
