use std::env;

/// Keychain service name the live CLI stores its OAuth credential under.
pub const CREDENTIALS_SERVICE: &str = "Claude Code-credentials";

/// One fixed secure-storage slot plus lookup of legacy per-profile entries
/// (used only by migration). Every failure here is expected to be downgraded
/// to a warning by the caller; a missing secret service must never abort a
/// profile operation.
pub trait SecureStore {
    /// Whether this platform has a real secret store behind the trait.
    fn available(&self) -> bool;
    fn exists(&self) -> bool;
    fn read(&self) -> Result<Option<String>, String>;
    fn write(&self, secret: &str) -> Result<(), String>;
    /// Idempotent; removing an absent entry is not an error.
    fn delete(&self) -> Result<(), String>;
    fn read_named(&self, service: &str) -> Result<Option<String>, String>;
    fn delete_named(&self, service: &str) -> Result<(), String>;
}

pub fn account_name() -> String {
    env::var("USER")
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "claude".to_string())
}

/// Service name of the legacy per-profile entries `migrate-keychain` drains.
pub fn legacy_service(profile: &str) -> String {
    format!("{CREDENTIALS_SERVICE}-{profile}")
}

#[cfg(target_os = "macos")]
pub use macos::Keychain;

#[cfg(target_os = "macos")]
mod macos {
    use super::{CREDENTIALS_SERVICE, SecureStore, account_name};
    use keyring::Entry;

    pub struct Keychain {
        account: String,
    }

    impl Keychain {
        pub fn new() -> Self {
            Self {
                account: account_name(),
            }
        }

        fn entry(&self, service: &str) -> Result<Entry, String> {
            Entry::new(service, &self.account).map_err(|err| err.to_string())
        }

        fn read_entry(&self, service: &str) -> Result<Option<String>, String> {
            match self.entry(service)?.get_password() {
                Ok(secret) => Ok(Some(secret)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(err) => Err(err.to_string()),
            }
        }

        fn delete_entry(&self, service: &str) -> Result<(), String> {
            match self.entry(service)?.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(err) => Err(err.to_string()),
            }
        }
    }

    impl Default for Keychain {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SecureStore for Keychain {
        fn available(&self) -> bool {
            true
        }

        fn exists(&self) -> bool {
            self.read().ok().flatten().is_some()
        }

        fn read(&self) -> Result<Option<String>, String> {
            self.read_entry(CREDENTIALS_SERVICE)
        }

        // Delete-then-add so a pre-existing entry never surfaces a
        // duplicate-item error from the Keychain.
        fn write(&self, secret: &str) -> Result<(), String> {
            let _ = self.delete_entry(CREDENTIALS_SERVICE);
            self.entry(CREDENTIALS_SERVICE)?
                .set_password(secret)
                .map_err(|err| err.to_string())
        }

        fn delete(&self) -> Result<(), String> {
            self.delete_entry(CREDENTIALS_SERVICE)
        }

        fn read_named(&self, service: &str) -> Result<Option<String>, String> {
            self.read_entry(service)
        }

        fn delete_named(&self, service: &str) -> Result<(), String> {
            self.delete_entry(service)
        }
    }
}

/// Reduced-capability adapter for platforms without a secure-storage
/// facility: reads always miss, writes and deletes succeed silently.
pub struct NoopStore;

impl SecureStore for NoopStore {
    fn available(&self) -> bool {
        false
    }

    fn exists(&self) -> bool {
        false
    }

    fn read(&self) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn write(&self, _secret: &str) -> Result<(), String> {
        Ok(())
    }

    fn delete(&self) -> Result<(), String> {
        Ok(())
    }

    fn read_named(&self, _service: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn delete_named(&self, _service: &str) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(target_os = "macos")]
pub fn default_store() -> Box<dyn SecureStore> {
    Box::new(Keychain::new())
}

#[cfg(not(target_os = "macos"))]
pub fn default_store() -> Box<dyn SecureStore> {
    Box::new(NoopStore)
}
