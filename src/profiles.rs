use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use std::io::{self, IsTerminal as _};

use crate::{
    ACTIVATE_ERR_PROMPT, ACTIVATE_ERR_RUNNING_CONFIRM_REQUIRED, ACTIVATE_HINT_ENV,
    ACTIVATE_MSG_DONE, ACTIVATE_PROMPT_RUNNING, CANCELLED_MESSAGE,
    CLASSIFY_ERR_AMBIGUOUS_CONFIRM_REQUIRED, CLASSIFY_ERR_NO_CREDENTIAL,
    CLASSIFY_PROMPT_AMBIGUOUS, CLASSIFY_WARN_AMBIGUOUS, CREATE_ERR_EMPTY_KEY,
    CREATE_ERR_TTY_REQUIRED, CREATE_MSG_DONE, CREATE_OPTION_API_KEY, CREATE_OPTION_FROM_LIVE,
    CREATE_PROMPT_API_KEY, CREATE_PROMPT_BASE_URL, CREATE_PROMPT_MODEL, CREATE_PROMPT_SOURCE,
    CURRENT_MSG_NONE, CURRENT_MSG_UNKNOWN, DELETE_ERR_CONFIRM_REQUIRED, DELETE_MSG_DONE,
    DELETE_PROMPT, KEYCHAIN_WARN_READ, KEYCHAIN_WARN_UNAVAILABLE, MIGRATE_MSG_COUNT,
    MIGRATE_MSG_NONE, MIGRATE_MSG_ONE, REPAIR_MSG_COUNT, REPAIR_MSG_MOVED, REPAIR_MSG_NONE,
    SAVE_MSG_DONE, STORE_ERR_ALREADY_EXISTS,
};
use crate::{
    API_KEY_ENV_VARS, CurrentProfile, Paths, ProfileStore, SaveSignal, SecureStore, SettingsDoc,
    activate, claude_is_running, default_store, get_current, legacy_service, lock_store,
    read_auth_doc_opt, read_settings_doc_opt, set_current, validate_for_save,
};
use crate::{
    format_action, format_activate_hint, format_cmd, format_no_profiles, format_profile_entry,
    inquire_select_render_config, is_inquire_cancel, print_output_block, use_color_stderr,
    use_color_stdout, warn,
};

pub struct CreateArgs {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub from_live: bool,
    pub yes: bool,
}

pub fn list_profiles(paths: &Paths) -> Result<(), String> {
    let use_color = use_color_stdout();
    let store = ProfileStore::new(paths);
    let names = store.list()?;
    if names.is_empty() {
        print_output_block(&format_no_profiles(use_color));
        return Ok(());
    }
    let current = get_current(paths, &store);
    let mut lines = Vec::with_capacity(names.len());
    for name in &names {
        let profile = store.read(name)?;
        let is_current = matches!(&current, CurrentProfile::Named(current) if current == name);
        lines.push(format_profile_entry(
            name,
            profile.mode().label(),
            is_current,
            use_color,
        ));
    }
    print_output_block(&lines.join("\n"));
    Ok(())
}

pub fn current_profile(paths: &Paths) -> Result<(), String> {
    let use_color = use_color_stdout();
    let store = ProfileStore::new(paths);
    match get_current(paths, &store) {
        CurrentProfile::Named(name) => {
            let profile = store.read(&name)?;
            let mut line =
                format_profile_entry(&name, profile.mode().label(), true, use_color);
            if let Some(email) = profile
                .auth
                .as_ref()
                .and_then(|auth| auth.oauth_account.as_ref())
                .and_then(|account| account.display_email())
            {
                line.push_str(&format!("  {email}"));
            }
            print_output_block(&line);
        }
        CurrentProfile::Unknown => {
            let hint = format_activate_hint(use_color);
            print_output_block(&crate::msg1(CURRENT_MSG_UNKNOWN, hint));
        }
        CurrentProfile::None => print_output_block(CURRENT_MSG_NONE),
    }
    Ok(())
}

pub fn create_profile(paths: &Paths, name: &str, args: CreateArgs) -> Result<(), String> {
    create_profile_with(paths, default_store().as_ref(), name, args)
}

fn create_profile_with(
    paths: &Paths,
    secure: &dyn SecureStore,
    name: &str,
    args: CreateArgs,
) -> Result<(), String> {
    let _lock = lock_store(paths)?;
    confirm_running(args.yes)?;
    let store = ProfileStore::new(paths);
    if store.exists(name) {
        return Err(crate::msg2(
            STORE_ERR_ALREADY_EXISTS,
            name,
            crate::format_list_hint(use_color_stderr()),
        ));
    }

    let source = resolve_create_source(&args)?;
    match source {
        CreateSource::FromLive => {
            let secret = read_secure_secret(secure);
            capture_checked(&store, paths, name, args.yes, secret.as_deref())?;
        }
        CreateSource::ApiKey { api_key } => {
            let (base_url, model) = resolve_create_extras(&args)?;
            store.create(name)?;
            let mut settings = SettingsDoc::default();
            settings
                .env
                .insert(API_KEY_ENV_VARS[0].to_string(), api_key);
            if let Some(base_url) = base_url {
                settings
                    .env
                    .insert("ANTHROPIC_BASE_URL".to_string(), base_url);
            }
            settings.model = model;
            store.write_settings(name, &settings)?;
        }
    }

    // A new profile becomes the live configuration right away.
    activate(paths, &store, secure, name)?;
    finish(&crate::msg1(CREATE_MSG_DONE, name), true);
    Ok(())
}

#[derive(Debug)]
enum CreateSource {
    FromLive,
    ApiKey { api_key: String },
}

fn resolve_create_source(args: &CreateArgs) -> Result<CreateSource, String> {
    if args.from_live {
        return Ok(CreateSource::FromLive);
    }
    if let Some(api_key) = args.api_key.as_deref() {
        if api_key.trim().is_empty() {
            return Err(CREATE_ERR_EMPTY_KEY.to_string());
        }
        return Ok(CreateSource::ApiKey {
            api_key: api_key.to_string(),
        });
    }
    if !io::stdin().is_terminal() {
        return Err(CREATE_ERR_TTY_REQUIRED.to_string());
    }
    let options = vec![CREATE_OPTION_API_KEY, CREATE_OPTION_FROM_LIVE];
    let choice = Select::new(CREATE_PROMPT_SOURCE, options)
        .with_render_config(inquire_select_render_config())
        .prompt()
        .map_err(prompt_error("profile source"))?;
    if choice == CREATE_OPTION_FROM_LIVE {
        return Ok(CreateSource::FromLive);
    }
    let api_key = Password::new(CREATE_PROMPT_API_KEY)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_render_config(inquire_select_render_config())
        .prompt()
        .map_err(prompt_error("API key"))?;
    if api_key.trim().is_empty() {
        return Err(CREATE_ERR_EMPTY_KEY.to_string());
    }
    Ok(CreateSource::ApiKey { api_key })
}

fn resolve_create_extras(args: &CreateArgs) -> Result<(Option<String>, Option<String>), String> {
    if args.base_url.is_some() || args.model.is_some() || args.api_key.is_some() {
        return Ok((args.base_url.clone(), args.model.clone()));
    }
    let base_url = Text::new(CREATE_PROMPT_BASE_URL)
        .with_render_config(inquire_select_render_config())
        .prompt()
        .map_err(prompt_error("base URL"))?;
    let model = Text::new(CREATE_PROMPT_MODEL)
        .with_render_config(inquire_select_render_config())
        .prompt()
        .map_err(prompt_error("model"))?;
    Ok((non_empty(base_url), non_empty(model)))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn save_profile(paths: &Paths, name: &str, yes: bool) -> Result<(), String> {
    save_profile_with(paths, default_store().as_ref(), name, yes)
}

fn save_profile_with(
    paths: &Paths,
    secure: &dyn SecureStore,
    name: &str,
    yes: bool,
) -> Result<(), String> {
    let _lock = lock_store(paths)?;
    let store = ProfileStore::new(paths);
    let secret = read_secure_secret(secure);
    capture_checked(&store, paths, name, yes, secret.as_deref())?;
    finish(&crate::msg1(SAVE_MSG_DONE, name), false);
    Ok(())
}

/// Snapshot the live configuration into `name` after classifying it. An
/// ambiguous live state (both credential kinds present) needs explicit
/// confirmation; an empty one is refused outright.
fn capture_checked(
    store: &ProfileStore,
    paths: &Paths,
    name: &str,
    yes: bool,
    secret: Option<&str>,
) -> Result<(), String> {
    let auth = read_auth_doc_opt(&paths.live_auth);
    let settings = read_settings_doc_opt(&paths.live_settings);
    match validate_for_save(auth.as_ref(), settings.as_ref(), secret.is_some()) {
        SaveSignal::OAuth | SaveSignal::ApiKey => {}
        SaveSignal::Neither => return Err(CLASSIFY_ERR_NO_CREDENTIAL.to_string()),
        SaveSignal::Both => {
            if !yes {
                if !io::stdin().is_terminal() {
                    return Err(CLASSIFY_ERR_AMBIGUOUS_CONFIRM_REQUIRED.to_string());
                }
                warn(CLASSIFY_WARN_AMBIGUOUS);
                let confirmed = Confirm::new(CLASSIFY_PROMPT_AMBIGUOUS)
                    .with_default(false)
                    .with_render_config(inquire_select_render_config())
                    .prompt()
                    .map_err(prompt_error("confirmation"))?;
                if !confirmed {
                    return Err(CANCELLED_MESSAGE.to_string());
                }
            }
        }
    }
    store.capture_from_live(name, secret)?;
    set_current(paths, name)
}

pub fn activate_profile(paths: &Paths, name: &str, yes: bool) -> Result<(), String> {
    activate_profile_with(paths, default_store().as_ref(), name, yes)
}

fn activate_profile_with(
    paths: &Paths,
    secure: &dyn SecureStore,
    name: &str,
    yes: bool,
) -> Result<(), String> {
    let _lock = lock_store(paths)?;
    confirm_running(yes)?;
    let store = ProfileStore::new(paths);
    activate(paths, &store, secure, name)?;
    finish(&crate::msg1(ACTIVATE_MSG_DONE, name), true);
    Ok(())
}

pub fn delete_profile(paths: &Paths, name: &str, yes: bool) -> Result<(), String> {
    let _lock = lock_store(paths)?;
    let store = ProfileStore::new(paths);
    // surfaces not-found before any prompt
    store.read(name)?;
    if !yes {
        if !io::stdin().is_terminal() {
            return Err(DELETE_ERR_CONFIRM_REQUIRED.to_string());
        }
        let confirmed = Confirm::new(&crate::msg1(DELETE_PROMPT, name))
            .with_default(false)
            .with_render_config(inquire_select_render_config())
            .prompt()
            .map_err(prompt_error("confirmation"))?;
        if !confirmed {
            return Err(CANCELLED_MESSAGE.to_string());
        }
    }
    store.delete(name)?;
    finish(&crate::msg1(DELETE_MSG_DONE, name), false);
    Ok(())
}

pub fn repair_profiles(paths: &Paths) -> Result<(), String> {
    let use_color = use_color_stdout();
    let _lock = lock_store(paths)?;
    let store = ProfileStore::new(paths);
    let mut moved = Vec::new();
    for name in store.list()? {
        let profile = store.read(&name)?;
        let ambiguous = validate_for_save(
            profile.auth.as_ref(),
            profile.settings.as_ref(),
            profile.has_blob,
        ) == SaveSignal::Both;
        if !ambiguous {
            continue;
        }
        let dest = store.relocate_settings(&name)?;
        moved.push(crate::msg2(REPAIR_MSG_MOVED, &name, dest.display()));
    }
    if moved.is_empty() {
        print_output_block(REPAIR_MSG_NONE);
        return Ok(());
    }
    if moved.len() > 1 {
        moved.push(crate::msg1(REPAIR_MSG_COUNT, moved.len()));
    }
    let message = moved
        .iter()
        .map(|line| format_action(line, use_color))
        .collect::<Vec<_>>()
        .join("\n");
    print_output_block(&message);
    Ok(())
}

pub fn migrate_keychain(paths: &Paths) -> Result<(), String> {
    migrate_keychain_with(paths, default_store().as_ref())
}

/// Drains legacy per-profile Keychain entries (`<service>-<name>`) into the
/// profile's on-disk blob, then deletes the legacy entry.
fn migrate_keychain_with(paths: &Paths, secure: &dyn SecureStore) -> Result<(), String> {
    let use_color = use_color_stdout();
    if !secure.available() {
        warn(KEYCHAIN_WARN_UNAVAILABLE);
        print_output_block(MIGRATE_MSG_NONE);
        return Ok(());
    }
    let _lock = lock_store(paths)?;
    let store = ProfileStore::new(paths);
    let mut lines = Vec::new();
    for name in store.list()? {
        // an existing blob wins over whatever the legacy entry holds
        if store.blob_path(&name).is_file() {
            continue;
        }
        let service = legacy_service(&name);
        let secret = match secure.read_named(&service) {
            Ok(Some(secret)) => secret,
            Ok(None) => continue,
            Err(err) => {
                warn(&crate::msg1(KEYCHAIN_WARN_READ, err));
                continue;
            }
        };
        store.write_blob(&name, &secret)?;
        secure.delete_named(&service)?;
        lines.push(crate::msg1(MIGRATE_MSG_ONE, &name));
    }
    if lines.is_empty() {
        print_output_block(MIGRATE_MSG_NONE);
        return Ok(());
    }
    if lines.len() > 1 {
        lines.push(crate::msg1(MIGRATE_MSG_COUNT, lines.len()));
    }
    let message = lines
        .iter()
        .map(|line| format_action(line, use_color))
        .collect::<Vec<_>>()
        .join("\n");
    print_output_block(&message);
    Ok(())
}

fn read_secure_secret(secure: &dyn SecureStore) -> Option<String> {
    match secure.read() {
        Ok(secret) => secret,
        Err(err) => {
            warn(&crate::msg1(KEYCHAIN_WARN_READ, err));
            None
        }
    }
}

fn confirm_running(yes: bool) -> Result<(), String> {
    if yes || !claude_is_running() {
        return Ok(());
    }
    if !io::stdin().is_terminal() {
        return Err(ACTIVATE_ERR_RUNNING_CONFIRM_REQUIRED.to_string());
    }
    let confirmed = Confirm::new(ACTIVATE_PROMPT_RUNNING)
        .with_default(false)
        .with_render_config(inquire_select_render_config())
        .prompt()
        .map_err(prompt_error("confirmation"))?;
    if confirmed {
        Ok(())
    } else {
        Err(CANCELLED_MESSAGE.to_string())
    }
}

fn prompt_error(what: &'static str) -> impl Fn(inquire::error::InquireError) -> String {
    move |err| {
        if is_inquire_cancel(&err) {
            CANCELLED_MESSAGE.to_string()
        } else {
            crate::msg2(ACTIVATE_ERR_PROMPT, what, err)
        }
    }
}

fn finish(message: &str, with_env_hint: bool) {
    let use_color = use_color_stdout();
    let mut out = format_action(message, use_color);
    if with_env_hint {
        let source_cmd = format_cmd("source ~/.claude/env.sh", use_color);
        out.push('\n');
        out.push_str(&crate::msg1(ACTIVATE_HINT_ENV, source_cmd));
    }
    print_output_block(&out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ENV_MUTEX, MemoryStore, make_paths, set_env_guard, set_plain_guard};
    use crate::AuthMode;
    use std::fs;

    const KEY: &str = "sk-test-aaaaaaaaaaaaaaaaaaaaXXXXXXXXXXXXXXXXXXXX";

    fn setup(root: &std::path::Path) -> Paths {
        let paths = make_paths(root);
        fs::create_dir_all(&paths.claude).unwrap();
        fs::create_dir_all(&paths.profiles).unwrap();
        paths
    }

    #[test]
    fn create_from_flags_activates_api_key_profile() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let _guard = set_env_guard("CLAUDE_PROFILES_SKIP_GUARD", Some("1"));
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        let secure = MemoryStore::new();
        let args = CreateArgs {
            api_key: Some(KEY.to_string()),
            base_url: Some("https://api.example.com".to_string()),
            model: Some("claude-sonnet-4".to_string()),
            from_live: false,
            yes: true,
        };
        create_profile_with(&paths, &secure, "work", args).unwrap();

        let store = ProfileStore::new(&paths);
        let profile = store.read("work").unwrap();
        assert_eq!(profile.mode(), AuthMode::ApiKey);
        let settings = profile.settings.unwrap();
        assert_eq!(settings.api_key(), Some(KEY));
        assert_eq!(
            settings.env.get("ANTHROPIC_BASE_URL").map(String::as_str),
            Some("https://api.example.com")
        );
        assert_eq!(settings.model.as_deref(), Some("claude-sonnet-4"));
        assert!(
            fs::symlink_metadata(&paths.live_settings)
                .unwrap()
                .file_type()
                .is_symlink()
        );
        assert_eq!(
            fs::read_to_string(&paths.current_marker).unwrap().trim(),
            "work"
        );
    }

    #[test]
    fn create_rejects_existing_name() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let _guard = set_env_guard("CLAUDE_PROFILES_SKIP_GUARD", Some("1"));
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        let secure = MemoryStore::new();
        ProfileStore::new(&paths).create("work").unwrap();
        let args = CreateArgs {
            api_key: Some(KEY.to_string()),
            base_url: None,
            model: None,
            from_live: false,
            yes: true,
        };
        let err = create_profile_with(&paths, &secure, "work", args).unwrap_err();
        assert!(err.contains("already exists"));
    }

    #[test]
    fn create_rejects_blank_key() {
        let args = CreateArgs {
            api_key: Some("  ".to_string()),
            base_url: None,
            model: None,
            from_live: false,
            yes: true,
        };
        let err = resolve_create_source(&args).unwrap_err();
        assert_eq!(err, CREATE_ERR_EMPTY_KEY);
    }

    #[test]
    fn save_captures_live_oauth_and_marks_current() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        fs::write(
            &paths.live_auth,
            "{\"sessionToken\":\"s\",\"oauthAccount\":{\"emailAddress\":\"a@b.com\"}}",
        )
        .unwrap();
        let secure = MemoryStore::new();
        secure.write("keychain-secret").unwrap();
        save_profile_with(&paths, &secure, "work", false).unwrap();

        let store = ProfileStore::new(&paths);
        let profile = store.read("work").unwrap();
        assert_eq!(profile.mode(), AuthMode::OAuth);
        assert_eq!(
            store.read_blob("work").unwrap().as_deref(),
            Some("keychain-secret")
        );
        assert_eq!(
            fs::read_to_string(&paths.current_marker).unwrap().trim(),
            "work"
        );
    }

    #[test]
    fn save_refuses_empty_live_state() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        fs::write(&paths.live_auth, "{}").unwrap();
        let secure = MemoryStore::new();
        let err = save_profile_with(&paths, &secure, "work", false).unwrap_err();
        assert_eq!(err, CLASSIFY_ERR_NO_CREDENTIAL);
        assert!(!ProfileStore::new(&paths).exists("work"));
    }

    #[test]
    fn save_ambiguous_with_yes_accepts() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        fs::write(&paths.live_auth, "{\"sessionToken\":\"s\"}").unwrap();
        fs::write(
            &paths.live_settings,
            &format!("{{\"env\":{{\"ANTHROPIC_API_KEY\":\"{KEY}\"}}}}"),
        )
        .unwrap();
        let secure = MemoryStore::new();
        save_profile_with(&paths, &secure, "both", true).unwrap();
        let profile = ProfileStore::new(&paths).read("both").unwrap();
        assert_eq!(profile.mode(), AuthMode::ApiKey);
    }

    #[test]
    fn activate_missing_profile_is_not_found() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let _guard = set_env_guard("CLAUDE_PROFILES_SKIP_GUARD", Some("1"));
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        let secure = MemoryStore::new();
        let err = activate_profile_with(&paths, &secure, "nope", true).unwrap_err();
        assert!(err.contains("was not found"));
    }

    #[test]
    fn delete_requires_confirmation_without_tty() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        let store = ProfileStore::new(&paths);
        store.create("work").unwrap();
        // cargo test runs without a TTY on stdin
        if !io::stdin().is_terminal() {
            let err = delete_profile(&paths, "work", false).unwrap_err();
            assert_eq!(err, DELETE_ERR_CONFIRM_REQUIRED);
            assert!(store.exists("work"));
        }
        delete_profile(&paths, "work", true).unwrap();
        assert!(!store.exists("work"));
    }

    #[test]
    fn repair_relocates_ambiguous_settings() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        let store = ProfileStore::new(&paths);
        store.create("both").unwrap();
        fs::write(store.auth_path("both"), "{\"sessionToken\":\"s\"}").unwrap();
        let mut settings = SettingsDoc::default();
        settings
            .env
            .insert("ANTHROPIC_API_KEY".to_string(), KEY.to_string());
        store.write_settings("both", &settings).unwrap();
        store.create("clean").unwrap();
        fs::write(store.auth_path("clean"), "{\"sessionToken\":\"c\"}").unwrap();

        repair_profiles(&paths).unwrap();
        assert!(!store.settings_path("both").exists());
        assert_eq!(store.read("both").unwrap().mode(), AuthMode::OAuth);
        assert_eq!(store.read("clean").unwrap().mode(), AuthMode::OAuth);

        // second run finds nothing left to move
        repair_profiles(&paths).unwrap();
    }

    #[test]
    fn migrate_moves_legacy_entries_into_blobs() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        let store = ProfileStore::new(&paths);
        store.create("work").unwrap();
        store.create("home").unwrap();
        store.write_blob("home", "kept").unwrap();
        let secure = MemoryStore::new();
        secure.set_named(&legacy_service("work"), "legacy-secret");
        secure.set_named(&legacy_service("home"), "ignored");

        migrate_keychain_with(&paths, &secure).unwrap();
        assert_eq!(
            store.read_blob("work").unwrap().as_deref(),
            Some("legacy-secret")
        );
        // existing blobs are never overwritten by migration
        assert_eq!(store.read_blob("home").unwrap().as_deref(), Some("kept"));
        assert_eq!(
            secure.read_named(&legacy_service("work")).unwrap(),
            None
        );
    }

    #[test]
    fn migrate_skips_unavailable_store() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        migrate_keychain_with(&paths, &crate::NoopStore).unwrap();
    }

    #[test]
    fn list_and_current_smoke() {
        let _env_lock = ENV_MUTEX.lock().unwrap();
        let _plain = set_plain_guard(true);
        let _guard = set_env_guard("CLAUDE_PROFILES_SKIP_GUARD", Some("1"));
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = setup(dir.path());
        list_profiles(&paths).unwrap();
        current_profile(&paths).unwrap();
        let secure = MemoryStore::new();
        let args = CreateArgs {
            api_key: Some(KEY.to_string()),
            base_url: None,
            model: None,
            from_live: false,
            yes: true,
        };
        create_profile_with(&paths, &secure, "work", args).unwrap();
        list_profiles(&paths).unwrap();
        current_profile(&paths).unwrap();
    }
}
