use crate::api;
use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::{anyhow, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server { port, redis_url } => {
            let url = Url::parse(&redis_url)?;

            if !matches!(url.scheme(), "redis" | "rediss") {
                return Err(anyhow!("unsupported key-value store scheme: {}", url.scheme()));
            }

            api::new(port, url.as_str(), globals).await?;
        }
    }

    Ok(())
}
