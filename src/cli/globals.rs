use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub jwt_secret: SecretString,
    pub token_ttl_seconds: u64,
    pub email_from: String,
    pub email_endpoint: Option<String>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(jwt_secret: SecretString) -> Self {
        Self {
            jwt_secret,
            token_ttl_seconds: 3600,
            email_from: String::new(),
            email_endpoint: None,
        }
    }
}
