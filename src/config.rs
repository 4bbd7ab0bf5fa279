use clap::Parser;
use std::{convert::Infallible, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

/// Whether the security header middleware decorates responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityHeaders {
    Enabled,
    Disabled,
}

impl SecurityHeaders {
    pub fn enabled(self) -> bool {
        self == SecurityHeaders::Enabled
    }
}

impl FromStr for SecurityHeaders {
    type Err = Infallible;

    /// Only the exact value `disable` turns the headers off.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "disable" => SecurityHeaders::Disabled,
            _ => SecurityHeaders::Enabled,
        })
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "mdserve", about = "Serve a directory of markdown files as HTML", long_about = None)]
pub struct Config {
    /// Directory holding the markdown pages and style.css.
    #[arg(long, env = "CONTENT_DIR", default_value = "./content")]
    pub content_dir: PathBuf,

    /// Port to listen on, on all interfaces.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Set to `disable` to stop sending the security headers.
    #[arg(long, env = "HTTP_SECURITY_HEADERS", default_value = "enable")]
    pub security_headers: SecurityHeaders,

    /// Upper bound on the time spent answering one request, in seconds.
    #[arg(long = "request-timeout", env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "CONTENT_DIR",
        "PORT",
        "HTTP_SECURITY_HEADERS",
        "REQUEST_TIMEOUT_SECS",
    ];

    fn parse_with_env(vars: &[(&str, &str)], args: &[&str]) -> Config {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|err| err.into_inner());

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        for k in ENV_KEYS {
            std::env::remove_var(k);
        }
        for (k, v) in vars {
            std::env::set_var(k, v);
        }

        let argv = std::iter::once("mdserve").chain(args.iter().copied());
        let config = Config::try_parse_from(argv);

        for (k, v) in &saved {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        config.unwrap()
    }

    #[test]
    fn defaults() {
        let config = parse_with_env(&[], &[]);
        assert_eq!(config.content_dir, PathBuf::from("./content"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.security_headers, SecurityHeaders::Enabled);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.addr(), "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn reads_environment() {
        let config = parse_with_env(
            &[
                ("CONTENT_DIR", "/srv/pages"),
                ("PORT", "9000"),
                ("HTTP_SECURITY_HEADERS", "disable"),
                ("REQUEST_TIMEOUT_SECS", "5"),
            ],
            &[],
        );
        assert_eq!(config.content_dir, PathBuf::from("/srv/pages"));
        assert_eq!(config.port, 9000);
        assert!(!config.security_headers.enabled());
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn flags_override_environment() {
        let config = parse_with_env(&[("PORT", "9000")], &["--port", "3000"]);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn only_exact_disable_turns_headers_off() {
        for value in ["enable", "false", "DISABLE", "disabled", ""] {
            assert_eq!(
                value.parse::<SecurityHeaders>().unwrap(),
                SecurityHeaders::Enabled,
                "{value:?}"
            );
        }
        assert_eq!(
            "disable".parse::<SecurityHeaders>().unwrap(),
            SecurityHeaders::Disabled
        );
    }
}
