//! Credential wrappers
//!
//! Passwords and the MongoDB URI are held in [`SecretString`], which redacts itself in
//! `Debug` output and zeroes its memory on drop. Reading the value requires an explicit
//! `expose_secret()` call.
//!
//! ```rust
//! use mdb::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let password = secret_string("mdb_password".to_string());
//! assert_eq!(password.expose_secret(), "mdb_password");
//! assert!(!format!("{password:?}").contains("mdb_password"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String newtype that satisfies the `secrecy` marker traits
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string used for every credential in [`crate::config::MdbConfig`]
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("mdb_password".to_string());
        assert_eq!(secret.expose_secret(), "mdb_password");
        assert!(!secret.expose_secret().is_empty());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("adminpassword".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("adminpassword"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_secret_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Section {
            password: SecretString,
        }

        let section: Section = toml::from_str(r#"password = "from-file""#).unwrap();
        assert_eq!(section.password.expose_secret(), "from-file");
    }
}
