use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        redis_url: matches
            .get_one("redis-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --redis-url"))?,
    })
}

pub fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let jwt_secret = matches
        .get_one("jwt-secret")
        .map(|s: &String| SecretString::from(s.to_string()))
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --jwt-secret"))?;

    let mut args = GlobalArgs::new(jwt_secret);

    if let Some(ttl) = matches.get_one::<u64>("token-ttl").copied() {
        args.token_ttl_seconds = ttl;
    }

    args.email_from = matches
        .get_one("email-from")
        .map(|s: &String| s.to_string())
        .unwrap_or_else(|| "no-reply@chiave.dev".to_string());

    args.email_endpoint = matches
        .get_one("email-endpoint")
        .map(|s: &String| s.to_string());

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn test_handler_and_globals() -> Result<()> {
        let matches = commands::new().get_matches_from(vec![
            "chiave",
            "--port",
            "9090",
            "--redis-url",
            "redis://localhost:6379",
            "--jwt-secret",
            "secret",
            "--token-ttl",
            "120",
        ]);

        let action = handler(&matches)?;
        match action {
            Action::Server { port, redis_url } => {
                assert_eq!(port, 9090);
                assert_eq!(redis_url, "redis://localhost:6379");
            }
        }

        let globals = globals(&matches)?;
        assert_eq!(globals.jwt_secret.expose_secret(), "secret");
        assert_eq!(globals.token_ttl_seconds, 120);
        assert_eq!(globals.email_from, "no-reply@chiave.dev");
        assert!(globals.email_endpoint.is_none());

        Ok(())
    }
}
