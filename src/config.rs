use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub database_url: String,
    pub bind_addr: String,
    pub http_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url =
            env::var("CLINIC_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://clinic.db?mode=rwc".to_string());

        // Hosted deployments hand us a bare PORT and expect us on all interfaces.
        let bind_addr = match env::var("PORT") {
            Ok(port) => {
                let port: u16 = port.parse()?;
                format!("0.0.0.0:{port}")
            }
            Err(_) => env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
        };

        let http_timeout = parse_timeout(env::var("CLINIC_HTTP_TIMEOUT_SECS").ok())?;

        Ok(Self {
            api_url,
            database_url,
            bind_addr,
            http_timeout,
        })
    }
}

/// Unset means no timeout; a value that is not whole seconds is an error.
fn parse_timeout(raw: Option<String>) -> anyhow::Result<Option<Duration>> {
    match raw {
        Some(secs) => {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("CLINIC_HTTP_TIMEOUT_SECS={secs:?}: {e}"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_unset_means_none() {
        assert_eq!(parse_timeout(None).unwrap(), None);
    }

    #[test]
    fn test_timeout_parses_seconds() {
        assert_eq!(
            parse_timeout(Some("15".into())).unwrap(),
            Some(Duration::from_secs(15))
        );
    }

    #[test]
    fn test_malformed_timeout_is_rejected() {
        let err = parse_timeout(Some("ten".into())).unwrap_err();
        assert!(err.to_string().contains("CLINIC_HTTP_TIMEOUT_SECS"));
    }
}
