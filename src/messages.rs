pub const CANCELLED_MESSAGE: &str = "Cancelled.";

pub const AUTH_ERR_READ: &str = "Error: Could not read {}: {}";
pub const AUTH_ERR_INVALID_JSON: &str = "Error: Invalid JSON in {}: {}";
pub const AUTH_ERR_SERIALIZE: &str = "Error: Could not serialize {}: {}";
pub const AUTH_ERR_WRITE: &str = "Error: Could not write {}: {}";

pub const KEYCHAIN_WARN_READ: &str = "Could not read the Keychain entry: {}";
pub const KEYCHAIN_WARN_WRITE: &str = "Could not write the Keychain entry: {}";
pub const KEYCHAIN_WARN_DELETE: &str = "Could not delete the Keychain entry: {}";
pub const KEYCHAIN_WARN_UNAVAILABLE: &str =
    "Secure storage is not available on this platform; OAuth tokens stay in plain files.";

pub const STORE_ERR_INVALID_NAME: &str =
    "Error: '{}' is not a valid profile name. Use a plain directory name.";
pub const STORE_ERR_ALREADY_EXISTS: &str = "Error: Profile '{}' already exists. {}";
pub const STORE_ERR_NOT_FOUND: &str = "Error: Profile '{}' was not found. {}";
pub const STORE_ERR_CREATE_DIR: &str = "Error: Cannot create profile directory {}: {}";
pub const STORE_ERR_READ_DIR: &str = "Error: Cannot read profiles directory: {}";
pub const STORE_ERR_DELETE: &str = "Error: Failed to delete profile '{}': {}";
pub const STORE_ERR_NO_LIVE_AUTH: &str =
    "Error: No live auth file at {}. Run `claude` once to log in.";
pub const STORE_ERR_WRITE_BLOB: &str = "Error: Could not write stored credentials for '{}': {}";
pub const STORE_ERR_READ_BLOB: &str =
    "Error: Stored credentials for '{}' are not valid base64: {}";
pub const STORE_ERR_REMOVE_STALE: &str =
    "Error: Failed to remove outdated {} from profile '{}': {}";
pub const STORE_MSG_AVAILABLE: &str = "Available profiles: {}";

pub const CLASSIFY_ERR_NO_CREDENTIAL: &str =
    "Error: Neither an OAuth session nor an API key is present. Log in with `claude` or add ANTHROPIC_API_KEY to the live settings, then retry.";
pub const CLASSIFY_WARN_AMBIGUOUS: &str =
    "Both an OAuth session and an API key are present. Claude Code will prefer the API key.";
pub const CLASSIFY_PROMPT_AMBIGUOUS: &str = "Save it as an API-key profile anyway?";
pub const CLASSIFY_ERR_AMBIGUOUS_CONFIRM_REQUIRED: &str =
    "Error: Saving an ambiguous profile requires confirmation. Re-run with `--yes` to accept the API-key interpretation.";

pub const ACTIVATE_ERR_INVALID_PROFILE: &str =
    "Error: Profile '{}' holds no usable credential and cannot be activated. Repair or re-save it first.";
pub const ACTIVATE_ERR_MISSING_SETTINGS: &str =
    "Error: Profile '{}' is classified as API-key but has no settings.json. The profile store is corrupt; run `{} repair`.";
pub const ACTIVATE_ERR_REMOVE_LIVE: &str = "Error: Failed to remove {}: {}";
pub const ACTIVATE_WARN_NO_BLOB: &str =
    "Profile '{}' has no stored OAuth token. Run `claude` to log in again.";
pub const ACTIVATE_WARN_CAPTURE_FAILED: &str =
    "Could not capture the live OAuth token into profile '{}': {}";
pub const ACTIVATE_MSG_DONE: &str = "Activated profile {}";
pub const ACTIVATE_PROMPT_RUNNING: &str =
    "Claude Code appears to be running. Switch profiles anyway?";
pub const ACTIVATE_ERR_RUNNING_CONFIRM_REQUIRED: &str =
    "Error: Claude Code appears to be running. Re-run with `--yes` to switch anyway.";
pub const ACTIVATE_ERR_PROMPT: &str = "Error: Could not prompt for {}: {}";
pub const ACTIVATE_HINT_ENV: &str = "Restart your shell or run {} so environment changes take effect.";

pub const ENVFILE_ERR_WRITE: &str = "Error: Failed to write {}: {}";
pub const ENVFILE_ERR_QUOTE: &str = "Error: Cannot quote environment value for {}";

pub const CURRENT_ERR_WRITE_MARKER: &str = "Error: Failed to write {}: {}";
pub const CURRENT_MSG_NONE: &str = "No live configuration yet.";
pub const CURRENT_MSG_UNKNOWN: &str = "Live configuration does not match any saved profile. {}";

pub const CREATE_MSG_DONE: &str = "Created profile {}";
pub const CREATE_ERR_EMPTY_KEY: &str = "Error: API key cannot be empty.";
pub const CREATE_ERR_TTY_REQUIRED: &str =
    "Error: Interactive profile creation requires a TTY. Pass `--api-key` or `--from-live` instead.";
pub const CREATE_PROMPT_SOURCE: &str = "How should this profile authenticate?";
pub const CREATE_OPTION_API_KEY: &str = "Enter an API key";
pub const CREATE_OPTION_FROM_LIVE: &str = "Copy the current live configuration";
pub const CREATE_PROMPT_API_KEY: &str = "API key";
pub const CREATE_PROMPT_BASE_URL: &str = "Base URL (optional)";
pub const CREATE_PROMPT_MODEL: &str = "Model (optional)";

pub const SAVE_MSG_DONE: &str = "Saved profile {}";
pub const DELETE_MSG_DONE: &str = "Deleted profile {}";
pub const DELETE_PROMPT: &str = "Delete profile {}? This cannot be undone.";
pub const DELETE_ERR_CONFIRM_REQUIRED: &str =
    "Error: Deletion requires confirmation. Re-run with `--yes` to skip the prompt.";

pub const REPAIR_MSG_NONE: &str = "No conflicting profiles found.";
pub const REPAIR_MSG_MOVED: &str = "Moved conflicting settings of '{}' to {}";
pub const REPAIR_MSG_COUNT: &str = "Repaired {} profiles.";
pub const REPAIR_ERR_RELOCATE: &str = "Error: Failed to relocate settings for '{}': {}";

pub const MIGRATE_MSG_NONE: &str = "No legacy Keychain entries to migrate.";
pub const MIGRATE_MSG_ONE: &str = "Migrated Keychain credentials for '{}'";
pub const MIGRATE_MSG_COUNT: &str = "Migrated {} Keychain entries.";

pub const LIST_MSG_EMPTY: &str = "No profiles yet. {}";
pub const LIST_HINT_CREATE: &str = "Run {create} to create one.";
pub const LIST_HINT_LIST: &str = "Run {list} to see saved profiles.";
pub const LIST_HINT_ACTIVATE: &str = "Run {activate} to pick one explicitly.";

pub const UI_WARNING_PREFIX: &str = "Warning: ";
pub const UI_INFO_PREFIX: &str = "Info: {}";
pub const UI_ERROR_PREFIX: &str = "Error:";

pub const COMMON_ERR_RESOLVE_HOME: &str = "Error: Could not resolve home directory";
pub const COMMON_ERR_EXISTS_NOT_DIR: &str = "Error: {} exists and is not a directory";
pub const COMMON_ERR_CREATE_PROFILES_DIR: &str = "Error: Cannot create profiles directory {}: {}";
pub const COMMON_ERR_SET_PERMISSIONS: &str = "Error: Cannot set permissions on {}: {}";
pub const COMMON_ERR_RESOLVE_PARENT: &str = "Error: Cannot resolve parent directory for {}";
pub const COMMON_ERR_CREATE_DIR: &str = "Error: Cannot create directory {}: {}";
pub const COMMON_ERR_INVALID_FILE_NAME: &str = "Error: Invalid file name {}";
pub const COMMON_ERR_GET_TIME: &str = "Error: Failed to get time: {}";
pub const COMMON_ERR_CREATE_TEMP: &str = "Error: Failed to create temp file for {}: {}";
pub const COMMON_ERR_WRITE_TEMP: &str = "Error: Failed to write temp file for {}: {}";
pub const COMMON_ERR_REPLACE_FILE: &str = "Error: Failed to replace {}: {}";
pub const COMMON_ERR_READ_METADATA: &str = "Error: Failed to read metadata for {}: {}";
pub const COMMON_ERR_READ_FILE: &str = "Error: Failed to read {}: {}";
pub const COMMON_ERR_LOCK_OPEN: &str = "Error: Could not open profiles lock: {}";
pub const COMMON_ERR_LOCK_ACQUIRE: &str =
    "Error: Could not acquire profiles lock. Ensure no other {} is running and retry.";
pub const COMMON_ERR_LOCK_HELD: &str = "Error: Could not lock profiles file: {}";
pub const COMMON_ERR_BACKUP: &str = "Error: Failed to back up {}: {}";

pub fn msg1(template: &str, a: impl std::fmt::Display) -> String {
    template.replacen("{}", &a.to_string(), 1)
}

pub fn msg2(template: &str, a: impl std::fmt::Display, b: impl std::fmt::Display) -> String {
    let out = template.replacen("{}", &a.to_string(), 1);
    out.replacen("{}", &b.to_string(), 1)
}

pub fn msg3(
    template: &str,
    a: impl std::fmt::Display,
    b: impl std::fmt::Display,
    c: impl std::fmt::Display,
) -> String {
    let out = template.replacen("{}", &a.to_string(), 1);
    let out = out.replacen("{}", &b.to_string(), 1);
    out.replacen("{}", &c.to_string(), 1)
}
