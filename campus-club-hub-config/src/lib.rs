use core::fmt::{Debug, Display};
use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Which identities may delete or otherwise mutate an entity they do not
/// own. Both variants have been observed in deployments; the predicate
/// itself lives in the backend, this only selects it.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyVariant {
    OwnerOnly,
    OwnerOrAdmin,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub database_path: PathBuf,
    pub policy: PolicyVariant,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_owned(),
            database_path: PathBuf::from("club-hub.json"),
            policy: PolicyVariant::OwnerOrAdmin,
        }
    }
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file("club-hub.toml"))
        .merge(Env::prefixed("CLUB_HUB_"))
        .extract()?)
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_without_any_source() {
        Jail::expect_with(|_jail| {
            let config = get_config().unwrap();
            assert_eq!(config.listen_addr, "127.0.0.1:3000");
            assert_eq!(config.policy, PolicyVariant::OwnerOrAdmin);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "club-hub.toml",
                r#"
                listen_addr = "0.0.0.0:8080"
                policy = "owner-only"
                "#,
            )?;
            jail.set_env("CLUB_HUB_LISTEN_ADDR", "127.0.0.1:9999");
            let config = get_config().unwrap();
            assert_eq!(config.listen_addr, "127.0.0.1:9999");
            assert_eq!(config.policy, PolicyVariant::OwnerOnly);
            Ok(())
        });
    }
}
