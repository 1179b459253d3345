use secrecy::SecretString;

/// Immutable process configuration, fixed at startup. Secrets stay wrapped in
/// [`SecretString`] so a stray `Debug` never prints them.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub directory_url: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub pool_id: String,
    pub service_token: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(
        directory_url: String,
        client_id: String,
        client_secret: SecretString,
        pool_id: String,
        service_token: SecretString,
    ) -> Self {
        Self {
            directory_url,
            client_id,
            client_secret,
            pool_id,
            service_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn args() -> GlobalArgs {
        GlobalArgs::new(
            "https://directory.tld:8443".to_string(),
            "client123".to_string(),
            SecretString::from("topsecret".to_string()),
            "pool-1".to_string(),
            SecretString::from("service-token".to_string()),
        )
    }

    #[test]
    fn test_global_args() {
        let globals = args();
        assert_eq!(globals.directory_url, "https://directory.tld:8443");
        assert_eq!(globals.client_id, "client123");
        assert_eq!(globals.client_secret.expose_secret(), "topsecret");
        assert_eq!(globals.pool_id, "pool-1");
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let globals = args();
        let debug = format!("{globals:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("service-token"));
    }
}
