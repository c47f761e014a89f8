use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{
    AuthDoc, AuthMode, Paths, SettingsDoc, classify, copy_atomic, read_auth_doc_opt,
    read_settings_doc_opt, write_atomic, write_doc,
};
use crate::{
    REPAIR_ERR_RELOCATE, STORE_ERR_ALREADY_EXISTS, STORE_ERR_CREATE_DIR, STORE_ERR_DELETE,
    STORE_ERR_INVALID_NAME, STORE_ERR_NOT_FOUND, STORE_ERR_NO_LIVE_AUTH, STORE_ERR_READ_BLOB,
    STORE_ERR_READ_DIR, STORE_ERR_REMOVE_STALE, STORE_ERR_WRITE_BLOB, STORE_MSG_AVAILABLE,
    format_list_hint, use_color_stderr,
};

const AUTH_FILE: &str = "auth.json";
const SETTINGS_FILE: &str = "settings.json";
const BLOB_FILE: &str = "keychain-credentials.b64";

/// One stored profile, loaded from `profiles/<name>/`.
#[derive(Debug)]
pub struct Profile {
    pub name: String,
    pub auth: Option<AuthDoc>,
    pub settings: Option<SettingsDoc>,
    pub has_blob: bool,
}

impl Profile {
    pub fn mode(&self) -> AuthMode {
        classify(self.auth.as_ref(), self.settings.as_ref(), self.has_blob)
    }
}

/// Directory-backed store of named profiles under `~/.claude/profiles/`.
pub struct ProfileStore<'a> {
    paths: &'a Paths,
}

impl<'a> ProfileStore<'a> {
    pub fn new(paths: &'a Paths) -> Self {
        Self { paths }
    }

    pub fn dir(&self, name: &str) -> PathBuf {
        self.paths.profiles.join(name)
    }

    pub fn auth_path(&self, name: &str) -> PathBuf {
        self.dir(name).join(AUTH_FILE)
    }

    pub fn settings_path(&self, name: &str) -> PathBuf {
        self.dir(name).join(SETTINGS_FILE)
    }

    pub fn blob_path(&self, name: &str) -> PathBuf {
        self.dir(name).join(BLOB_FILE)
    }

    pub fn exists(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.dir(name).is_dir()
    }

    /// Sorted profile names from directory entries. An empty store is a
    /// valid state, not an error.
    pub fn list(&self) -> Result<Vec<String>, String> {
        let mut names = Vec::new();
        if !self.paths.profiles.exists() {
            return Ok(names);
        }
        let entries = fs::read_dir(&self.paths.profiles)
            .map_err(|err| crate::msg1(STORE_ERR_READ_DIR, err))?;
        for entry in entries {
            let entry = entry.map_err(|err| crate::msg1(STORE_ERR_READ_DIR, err))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Allocates an empty profile holding a placeholder `{}` auth document.
    pub fn create(&self, name: &str) -> Result<(), String> {
        validate_name(name)?;
        if self.exists(name) {
            return Err(crate::msg2(
                STORE_ERR_ALREADY_EXISTS,
                name,
                format_list_hint(use_color_stderr()),
            ));
        }
        let dir = self.dir(name);
        fs::create_dir_all(&dir)
            .map_err(|err| crate::msg2(STORE_ERR_CREATE_DIR, dir.display(), err))?;
        write_doc(&self.auth_path(name), &AuthDoc::default())
    }

    pub fn read(&self, name: &str) -> Result<Profile, String> {
        validate_name(name)?;
        if !self.exists(name) {
            return Err(self.not_found(name));
        }
        Ok(Profile {
            name: name.to_string(),
            auth: read_auth_doc_opt(&self.auth_path(name)),
            settings: read_settings_doc_opt(&self.settings_path(name)),
            has_blob: self.blob_path(name).is_file(),
        })
    }

    pub fn write_auth(&self, name: &str, doc: &AuthDoc) -> Result<(), String> {
        write_doc(&self.auth_path(name), doc)
    }

    pub fn write_settings(&self, name: &str, doc: &SettingsDoc) -> Result<(), String> {
        write_doc(&self.settings_path(name), doc)
    }

    /// Irreversible; confirmation is the caller's concern.
    pub fn delete(&self, name: &str) -> Result<(), String> {
        validate_name(name)?;
        if !self.exists(name) {
            return Err(self.not_found(name));
        }
        fs::remove_dir_all(self.dir(name))
            .map_err(|err| crate::msg2(STORE_ERR_DELETE, name, err))
    }

    /// Snapshots the live configuration into `profiles/<name>/`, copying
    /// documents byte-for-byte so a later activation reproduces them
    /// exactly. `secret` lands in the credentials blob when present.
    pub fn capture_from_live(&self, name: &str, secret: Option<&str>) -> Result<(), String> {
        validate_name(name)?;
        if !self.paths.live_auth.is_file() {
            return Err(crate::msg1(
                STORE_ERR_NO_LIVE_AUTH,
                self.paths.live_auth.display(),
            ));
        }
        let dir = self.dir(name);
        fs::create_dir_all(&dir)
            .map_err(|err| crate::msg2(STORE_ERR_CREATE_DIR, dir.display(), err))?;
        copy_atomic(&self.paths.live_auth, &self.auth_path(name))?;
        if self.paths.live_settings.is_file() {
            copy_atomic(&self.paths.live_settings, &self.settings_path(name))?;
        } else {
            // a stale settings document from an earlier save would make the
            // profile classify as API-key alongside the fresh OAuth state
            remove_stale(&self.settings_path(name), SETTINGS_FILE, name)?;
        }
        match secret {
            Some(secret) => self.write_blob(name, secret)?,
            None => remove_stale(&self.blob_path(name), BLOB_FILE, name)?,
        }
        Ok(())
    }

    pub fn read_blob(&self, name: &str) -> Result<Option<String>, String> {
        let path = self.blob_path(name);
        if !path.is_file() {
            return Ok(None);
        }
        let encoded = fs::read_to_string(&path)
            .map_err(|err| crate::msg2(STORE_ERR_READ_BLOB, name, err))?;
        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|err| crate::msg2(STORE_ERR_READ_BLOB, name, err))?;
        String::from_utf8(decoded)
            .map(Some)
            .map_err(|err| crate::msg2(STORE_ERR_READ_BLOB, name, err))
    }

    pub fn write_blob(&self, name: &str, secret: &str) -> Result<(), String> {
        let encoded = STANDARD.encode(secret.as_bytes());
        write_atomic(&self.blob_path(name), format!("{encoded}\n").as_bytes())
            .map_err(|err| crate::msg2(STORE_ERR_WRITE_BLOB, name, err))
    }

    /// Moves a conflicting settings document aside so the profile stops
    /// classifying as both OAuth and API-key. Returns the new location.
    pub fn relocate_settings(&self, name: &str) -> Result<PathBuf, String> {
        let source = self.settings_path(name);
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let dest = self.dir(name).join(format!("{SETTINGS_FILE}.conflict-{stamp}"));
        fs::rename(&source, &dest)
            .map_err(|err| crate::msg2(REPAIR_ERR_RELOCATE, name, err))?;
        Ok(dest)
    }

    fn not_found(&self, name: &str) -> String {
        let names = self.list().unwrap_or_default();
        let detail = if names.is_empty() {
            format_list_hint(use_color_stderr())
        } else {
            crate::msg1(STORE_MSG_AVAILABLE, names.join(", "))
        };
        crate::msg2(STORE_ERR_NOT_FOUND, name, detail)
    }
}

fn remove_stale(path: &Path, label: &str, name: &str) -> Result<(), String> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(crate::msg3(STORE_ERR_REMOVE_STALE, label, name, err)),
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0');
    if valid {
        Ok(())
    } else {
        Err(crate::msg1(STORE_ERR_INVALID_NAME, name))
    }
}
