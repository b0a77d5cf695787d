use crate::auth::generate_jwt;
use crate::config::AppConfig;
use crate::types::UserId;

/// Tokens carry only the subject; the user must exist in the store the
/// server is running against for the token to authenticate.
pub fn handle(config: &AppConfig, user_id: UserId) -> anyhow::Result<()> {
    let token = generate_jwt(&config.security, user_id)?;
    println!("{}", token);
    Ok(())
}
