use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use crate::{
    AuthDoc, AuthMode, CurrentProfile, Paths, Profile, ProfileStore, SecureStore, api_key_auth_doc,
    command_name, get_current, read_auth_doc_opt, set_current, symlink_replace, write_atomic_with_mode,
    write_doc,
};
use crate::{
    ACTIVATE_ERR_INVALID_PROFILE, ACTIVATE_ERR_MISSING_SETTINGS, ACTIVATE_ERR_REMOVE_LIVE,
    ACTIVATE_WARN_CAPTURE_FAILED, ACTIVATE_WARN_NO_BLOB, ENVFILE_ERR_QUOTE, ENVFILE_ERR_WRITE,
    KEYCHAIN_WARN_DELETE, KEYCHAIN_WARN_READ, KEYCHAIN_WARN_WRITE, warn,
};

/// Variables cleared by `env.sh` before the active profile's exports, so
/// values never leak from one profile into the next shell session.
pub const KNOWN_ENV_VARS: [&str; 7] = [
    "ANTHROPIC_API_KEY",
    "ANTHROPIC_AUTH_TOKEN",
    "ANTHROPIC_BASE_URL",
    "ANTHROPIC_MODEL",
    "ANTHROPIC_SMALL_FAST_MODEL",
    "ANTHROPIC_CUSTOM_HEADERS",
    "CLAUDE_PROFILE",
];

/// Makes `name` the live configuration. The sequence is ordered so the
/// outgoing profile's refreshed OAuth token is captured before anything is
/// overwritten; a failure partway through can leave the live locations
/// mixed, and recovery is re-running the activation.
pub fn activate(
    paths: &Paths,
    store: &ProfileStore,
    secure: &dyn SecureStore,
    name: &str,
) -> Result<(), String> {
    let profile = store.read(name)?;
    capture_outgoing_secret(paths, store, secure);

    // A stored profile should always have an auth document; recreate an
    // empty one rather than failing if it vanished.
    if !store.auth_path(name).is_file() {
        store.write_auth(name, &AuthDoc::default())?;
    }

    match profile.mode() {
        AuthMode::OAuth => activate_oauth(paths, store, secure, &profile)?,
        AuthMode::ApiKey => activate_api_key(paths, store, secure, &profile)?,
        AuthMode::Invalid => {
            return Err(crate::msg1(ACTIVATE_ERR_INVALID_PROFILE, name));
        }
    }

    write_env_file(paths, &profile)?;
    set_current(paths, name)
}

/// Step 1: the live CLI refreshes OAuth tokens in place, so the secret in
/// the secure slot can be newer than the outgoing profile's stored blob.
/// Copy it back before the slot is repointed. Best-effort by design.
fn capture_outgoing_secret(paths: &Paths, store: &ProfileStore, secure: &dyn SecureStore) {
    let CurrentProfile::Named(outgoing) = get_current(paths, store) else {
        return;
    };
    match secure.read() {
        Ok(Some(secret)) => {
            if let Err(err) = store.write_blob(&outgoing, &secret) {
                warn(&crate::msg2(ACTIVATE_WARN_CAPTURE_FAILED, &outgoing, err));
            }
        }
        Ok(None) => {}
        Err(err) => warn(&crate::msg1(KEYCHAIN_WARN_READ, err)),
    }
}

fn activate_oauth(
    paths: &Paths,
    store: &ProfileStore,
    secure: &dyn SecureStore,
    profile: &Profile,
) -> Result<(), String> {
    symlink_replace(&store.auth_path(&profile.name), &paths.live_auth)?;
    remove_live(&paths.live_settings)?;

    match store.read_blob(&profile.name) {
        Ok(Some(secret)) => {
            if let Err(err) = secure.write(&secret) {
                warn(&crate::msg1(KEYCHAIN_WARN_WRITE, err));
            }
        }
        Ok(None) => warn(&crate::msg1(ACTIVATE_WARN_NO_BLOB, &profile.name)),
        Err(err) => warn(&err),
    }
    Ok(())
}

fn activate_api_key(
    paths: &Paths,
    store: &ProfileStore,
    secure: &dyn SecureStore,
    profile: &Profile,
) -> Result<(), String> {
    // A stale OAuth token in the secure slot would take precedence over
    // the API key inside the live CLI; drop it first.
    if let Err(err) = secure.delete() {
        warn(&crate::msg1(KEYCHAIN_WARN_DELETE, err));
    }

    let api_key = profile
        .settings
        .as_ref()
        .and_then(|settings| settings.api_key().map(str::to_string));
    let (Some(api_key), true) = (api_key, store.settings_path(&profile.name).is_file()) else {
        return Err(crate::msg2(
            ACTIVATE_ERR_MISSING_SETTINGS,
            &profile.name,
            command_name(),
        ));
    };

    // Strip OAuth fields from whatever the live auth held before it is
    // regenerated, keeping unrelated CLI state intact.
    let previous = read_auth_doc_opt(&paths.live_auth);
    symlink_replace(&store.settings_path(&profile.name), &paths.live_settings)?;
    let doc = api_key_auth_doc(previous, &api_key);
    write_doc(&paths.live_auth, &doc)
}

fn remove_live(path: &Path) -> Result<(), String> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(crate::msg2(ACTIVATE_ERR_REMOVE_LIVE, path.display(), err)),
    }
}

/// Step 5: regenerate the shell side-channel. Every well-known variable is
/// unset first, then the active profile's env mapping is exported, then the
/// profile name itself. Owner-only mode since values may be secrets.
fn write_env_file(paths: &Paths, profile: &Profile) -> Result<(), String> {
    let mut out = String::from("# Managed by claude-profiles; regenerated on every activation.\n");
    for name in KNOWN_ENV_VARS {
        out.push_str("unset ");
        out.push_str(name);
        out.push('\n');
    }
    if let Some(settings) = profile.settings.as_ref() {
        for (key, value) in &settings.env {
            let quoted = shlex::try_quote(value)
                .map_err(|_| crate::msg1(ENVFILE_ERR_QUOTE, key))?;
            out.push_str(&format!("export {key}={quoted}\n"));
        }
    }
    let quoted_name = shlex::try_quote(&profile.name)
        .map_err(|_| crate::msg1(ENVFILE_ERR_QUOTE, "CLAUDE_PROFILE"))?;
    out.push_str(&format!("export CLAUDE_PROFILE={quoted_name}\n"));
    write_atomic_with_mode(&paths.env_file, out.as_bytes(), 0o600)
        .map_err(|err| crate::msg2(ENVFILE_ERR_WRITE, paths.env_file.display(), err))
}

/// Whether the wrapped CLI appears to be running. Any failure to ask
/// counts as "not running"; this guard is advisory.
pub fn claude_is_running() -> bool {
    if std::env::var_os("CLAUDE_PROFILES_SKIP_GUARD").is_some() {
        return false;
    }
    Command::new("pgrep")
        .args(["-x", "claude"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
