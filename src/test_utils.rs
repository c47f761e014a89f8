use crate::{Paths, SecureStore, is_plain, paths_under, set_plain};
use std::cell::Cell;
use std::env;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub(crate) static ENV_MUTEX: Mutex<()> = Mutex::new(());
pub(crate) static PLAIN_MUTEX: Mutex<()> = Mutex::new(());

thread_local! {
    static PLAIN_DEPTH: Cell<usize> = const { Cell::new(0) };
}

pub(crate) struct EnvVarGuard {
    key: String,
    prev: Option<String>,
}

pub(crate) struct PlainGuard {
    prev: bool,
    _lock: Option<MutexGuard<'static, ()>>,
}

fn set_env(key: &str, value: Option<&str>) -> Option<String> {
    let prev = env::var(key).ok();
    if let Some(value) = value {
        unsafe {
            env::set_var(key, value);
        }
    } else {
        unsafe {
            env::remove_var(key);
        }
    }
    prev
}

pub(crate) fn set_env_guard(key: &str, value: Option<&str>) -> EnvVarGuard {
    EnvVarGuard {
        key: key.to_string(),
        prev: set_env(key, value),
    }
}

pub(crate) fn set_plain_guard(value: bool) -> PlainGuard {
    let lock = PLAIN_DEPTH.with(|depth| {
        let current = depth.get();
        depth.set(current + 1);
        if current == 0 {
            Some(PLAIN_MUTEX.lock().unwrap())
        } else {
            None
        }
    });
    let prev = is_plain();
    set_plain(value);
    PlainGuard { prev, _lock: lock }
}

fn restore_env(key: &str, prev: Option<String>) {
    if let Some(value) = prev {
        unsafe {
            env::set_var(key, value);
        }
    } else {
        unsafe {
            env::remove_var(key);
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let prev = self.prev.take();
        restore_env(&self.key, prev);
    }
}

impl Drop for PlainGuard {
    fn drop(&mut self) {
        set_plain(self.prev);
        PLAIN_DEPTH.with(|depth| {
            let current = depth.get();
            depth.set(current.saturating_sub(1));
        });
    }
}

/// Lays the real on-disk layout out under a test root, as if the root were
/// the user's home directory.
pub(crate) fn make_paths(root: &Path) -> Paths {
    paths_under(root)
}

/// In-memory secure store with the same single-slot shape as the Keychain
/// adapter, plus named slots for migration tests.
pub(crate) struct MemoryStore {
    slots: Mutex<std::collections::BTreeMap<String, String>>,
    fail_reads: Mutex<bool>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            slots: Mutex::new(std::collections::BTreeMap::new()),
            fail_reads: Mutex::new(false),
        }
    }

    pub(crate) fn set_named(&self, service: &str, secret: &str) {
        self.slots
            .lock()
            .unwrap()
            .insert(service.to_string(), secret.to_string());
    }

    pub(crate) fn fail_reads(&self, value: bool) {
        *self.fail_reads.lock().unwrap() = value;
    }
}

impl SecureStore for MemoryStore {
    fn available(&self) -> bool {
        true
    }

    fn exists(&self) -> bool {
        self.read().ok().flatten().is_some()
    }

    fn read(&self) -> Result<Option<String>, String> {
        self.read_named(crate::CREDENTIALS_SERVICE)
    }

    fn write(&self, secret: &str) -> Result<(), String> {
        self.set_named(crate::CREDENTIALS_SERVICE, secret);
        Ok(())
    }

    fn delete(&self) -> Result<(), String> {
        self.delete_named(crate::CREDENTIALS_SERVICE)
    }

    fn read_named(&self, service: &str) -> Result<Option<String>, String> {
        if *self.fail_reads.lock().unwrap() {
            return Err("simulated keychain failure".to_string());
        }
        Ok(self.slots.lock().unwrap().get(service).cloned())
    }

    fn delete_named(&self, service: &str) -> Result<(), String> {
        self.slots.lock().unwrap().remove(service);
        Ok(())
    }
}
