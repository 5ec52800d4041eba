//! ProxyPay deployment environments.
//!
//! The sandbox and production APIs are identical apart from their base URL.
//! Parsing is deliberately lenient: only the exact name `"production"`
//! selects the production host, everything else falls back to the sandbox.

use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{PRODUCTION_URL, SANDBOX_URL};

/// A ProxyPay API environment.
///
/// ```rust
/// use proxypay::Environment;
///
/// assert_eq!(Environment::from_name("production"), Environment::Production);
/// assert_eq!(Environment::from_name("staging"), Environment::Sandbox);
/// assert_eq!(Environment::default().base_url(), "https://api.sandbox.proxypay.co.ao");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The sandbox API, used for integration testing.
    #[default]
    Sandbox,
    /// The live API.
    Production,
}

impl Environment {
    /// Name of the production environment.
    pub const PRODUCTION: &'static str = "production";

    /// Name of the sandbox environment.
    pub const SANDBOX: &'static str = "sandbox";

    /// Resolves an environment name. Anything other than `"production"` is
    /// treated as the sandbox.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name == Self::PRODUCTION {
            Self::Production
        } else {
            Self::Sandbox
        }
    }

    /// Returns the canonical name of this environment.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sandbox => Self::SANDBOX,
            Self::Production => Self::PRODUCTION,
        }
    }

    /// Returns the API base URL for this environment.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_URL,
            Self::Production => PRODUCTION_URL,
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Environment {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<&str> for Environment {
    fn from(value: &str) -> Self {
        Self::from_name(value)
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_name(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_resolves_to_production_host() {
        let env = Environment::from_name("production");
        assert_eq!(env, Environment::Production);
        assert_eq!(env.base_url(), "https://api.proxypay.co.ao");
    }

    #[test]
    fn test_other_names_resolve_to_sandbox_host() {
        for name in ["sandbox", "", "Production", "PRODUCTION", "prod", "live", " production"] {
            let env = Environment::from_name(name);
            assert_eq!(env, Environment::Sandbox, "name {name:?}");
            assert_eq!(env.base_url(), "https://api.sandbox.proxypay.co.ao");
        }
    }

    #[test]
    fn test_default_is_sandbox() {
        assert_eq!(Environment::default(), Environment::Sandbox);
    }

    #[test]
    fn test_from_str_never_fails() {
        let env: Environment = "whatever".parse().unwrap();
        assert_eq!(env, Environment::Sandbox);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Environment::Production).unwrap();
        assert_eq!(json, "\"production\"");
        let env: Environment = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(env, Environment::Sandbox);
    }
}
