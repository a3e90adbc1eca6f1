//! # Provider Options
//!
//! Every provider-backed command accepts `--kind`, `--server`, `--username`
//! and `--token`. [`ScmOptions`] holds those raw values and resolves them into
//! a [`ClientConfig`], falling back to the environment:
//!
//! | option     | fallback                       |
//! |------------|--------------------------------|
//! | `kind`     | `GIT_KIND`                     |
//! | `server`   | `GIT_SERVER`                   |
//! | `username` | `GIT_USERNAME`, then `GIT_USER`|
//! | `token`    | `GIT_TOKEN`                    |
//!
//! Kind, server and token are required. [`ScmContext`] then connects and,
//! when no username was given, asks the provider who the token belongs to.
//! The resulting context is what command handlers receive.

use crate::error::{Error, Result, ResultExt};
use crate::scm::{self, Client, ClientConfig, ScmKind};

/// Raw provider options as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScmOptions {
    pub kind: Option<String>,
    pub server: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
}

fn non_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

impl ScmOptions {
    /// Uses `server` when no server was given explicitly.
    ///
    /// An explicit `--server` still wins; the environment is consulted
    /// before this default.
    pub fn with_default_server(self, server: &str, env: impl Fn(&str) -> Option<String>) -> Self {
        let server = self
            .server
            .filter(|v| non_empty(v))
            .or_else(|| env("GIT_SERVER").filter(|v| non_empty(v)))
            .or_else(|| Some(server.to_string()));
        Self { server, ..self }
    }

    /// Resolves against the process environment.
    pub fn resolve(self) -> Result<ClientConfig> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolves against `env`, which maps variable names to values.
    pub fn resolve_with(self, env: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
        let pick = |value: Option<String>, vars: &[&str]| -> Option<String> {
            value
                .filter(|v| non_empty(v))
                .or_else(|| vars.iter().find_map(|&var| env(var).filter(|v| non_empty(v))))
        };

        let kind = pick(self.kind, &["GIT_KIND"]).ok_or_else(|| Error::missing_option("kind"))?;
        let server =
            pick(self.server, &["GIT_SERVER"]).ok_or_else(|| Error::missing_option("server"))?;
        let token =
            pick(self.token, &["GIT_TOKEN"]).ok_or_else(|| Error::missing_option("token"))?;
        let username = pick(self.username, &["GIT_USERNAME", "GIT_USER"]).unwrap_or_default();

        Ok(ClientConfig {
            kind: kind.parse::<ScmKind>()?,
            server: server.trim().trim_end_matches('/').to_string(),
            token,
            username,
        })
    }
}

/// A connected provider plus the identity used against it.
#[derive(Debug, Clone)]
pub struct ScmContext {
    pub client: Client,
    /// Login of the authenticated user.
    pub username: String,
    /// Token, kept for authenticating git pushes.
    pub token: String,
}

impl ScmContext {
    /// Builds the provider client and resolves the username.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let client = scm::new_client(&config)?;
        Self::with_client(client, config)
    }

    /// Wraps an existing client, resolving the username through it when
    /// `config` has none.
    pub fn with_client(client: Client, config: ClientConfig) -> Result<Self> {
        let username = if config.username.is_empty() {
            let user = client.users.find().scm_context("find", "current user")?;
            log::debug!("authenticated as {}", user.login);
            user.login
        } else {
            config.username
        };
        Ok(Self {
            client,
            username,
            token: config.token,
        })
    }
}

/// Fails with [`Error::MissingOption`] when `value` is blank.
pub fn require<'a>(value: &'a str, option: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(Error::missing_option(option))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scm::fake::FakeProvider;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn flags(kind: &str, server: &str, token: &str) -> ScmOptions {
        ScmOptions {
            kind: Some(kind.to_string()),
            server: Some(server.to_string()),
            username: None,
            token: Some(token.to_string()),
        }
    }

    #[test]
    fn test_flags_win_over_environment() {
        let config = flags("github", "https://github.com/", "flagtoken")
            .resolve_with(env_of(&[("GIT_KIND", "gitlab"), ("GIT_TOKEN", "envtoken")]))
            .unwrap();
        assert_eq!(config.kind, ScmKind::GitHub);
        assert_eq!(config.server, "https://github.com");
        assert_eq!(config.token, "flagtoken");
        assert_eq!(config.username, "");
    }

    #[test]
    fn test_environment_fallbacks() {
        let config = ScmOptions {
            server: Some("https://gitlab.com".to_string()),
            ..Default::default()
        }
        .resolve_with(env_of(&[
            ("GIT_KIND", "gitlab"),
            ("GIT_TOKEN", "envtoken"),
            ("GIT_USER", "fallback-user"),
        ]))
        .unwrap();
        assert_eq!(config.kind, ScmKind::GitLab);
        assert_eq!(config.token, "envtoken");
        assert_eq!(config.username, "fallback-user");
    }

    #[test]
    fn test_git_username_preferred_over_git_user() {
        let config = flags("fake", "https://github.com", "t")
            .resolve_with(env_of(&[("GIT_USERNAME", "primary"), ("GIT_USER", "secondary")]))
            .unwrap();
        assert_eq!(config.username, "primary");
    }

    #[test]
    fn test_missing_options_in_order() {
        let missing = |opts: ScmOptions| opts.resolve_with(env_of(&[])).unwrap_err().to_string();
        assert_eq!(missing(ScmOptions::default()), "missing option: --kind");
        assert_eq!(
            missing(ScmOptions {
                kind: Some("github".to_string()),
                ..Default::default()
            }),
            "missing option: --server"
        );
        assert_eq!(
            missing(ScmOptions {
                kind: Some("github".to_string()),
                server: Some("https://github.com".to_string()),
                token: Some("   ".to_string()),
                ..Default::default()
            }),
            "missing option: --token"
        );
    }

    #[test]
    fn test_unknown_kind_is_invalid() {
        let err = flags("perforce", "https://p4", "t")
            .resolve_with(env_of(&[]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_default_server() {
        let opts = ScmOptions::default().with_default_server("https://github.com", env_of(&[]));
        assert_eq!(opts.server.as_deref(), Some("https://github.com"));

        let opts = ScmOptions::default().with_default_server(
            "https://github.com",
            env_of(&[("GIT_SERVER", "https://ghe.example.com")]),
        );
        assert_eq!(opts.server.as_deref(), Some("https://ghe.example.com"));

        let opts = ScmOptions {
            server: Some("https://gitlab.com".to_string()),
            ..Default::default()
        }
        .with_default_server("https://github.com", env_of(&[]));
        assert_eq!(opts.server.as_deref(), Some("https://gitlab.com"));
    }

    #[test]
    fn test_context_resolves_username_from_provider() {
        let fake = FakeProvider::new("https://github.com", "token-owner");
        let config = flags("fake", "https://github.com", "t")
            .resolve_with(env_of(&[]))
            .unwrap();
        let ctx = ScmContext::with_client(fake.client(), config).unwrap();
        assert_eq!(ctx.username, "token-owner");
        assert_eq!(ctx.token, "t");
    }

    #[test]
    fn test_context_keeps_configured_username() {
        let config = flags("fake", "https://github.com", "t")
            .resolve_with(env_of(&[("GIT_USERNAME", "jstrachan")]))
            .unwrap();
        let ctx = ScmContext::connect(config).unwrap();
        assert_eq!(ctx.username, "jstrachan");
    }

    #[test]
    fn test_require() {
        assert_eq!(require("myorg", "owner").unwrap(), "myorg");
        assert_eq!(
            require(" ", "owner").unwrap_err().to_string(),
            "missing option: --owner"
        );
    }
}
