use directories::BaseDirs;
use fslock::LockFile;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::{
    COMMON_ERR_BACKUP, COMMON_ERR_CREATE_DIR, COMMON_ERR_CREATE_PROFILES_DIR,
    COMMON_ERR_CREATE_TEMP, COMMON_ERR_EXISTS_NOT_DIR, COMMON_ERR_GET_TIME,
    COMMON_ERR_INVALID_FILE_NAME, COMMON_ERR_LOCK_ACQUIRE, COMMON_ERR_LOCK_HELD,
    COMMON_ERR_LOCK_OPEN, COMMON_ERR_READ_FILE, COMMON_ERR_READ_METADATA,
    COMMON_ERR_REPLACE_FILE, COMMON_ERR_RESOLVE_HOME, COMMON_ERR_RESOLVE_PARENT,
    COMMON_ERR_SET_PERMISSIONS, COMMON_ERR_WRITE_TEMP,
};

/// Well-known locations the live Claude Code CLI reads and the profile
/// store writes. Everything hangs off one home root so tests can redirect
/// the whole tree with `CLAUDE_PROFILES_HOME`.
pub struct Paths {
    pub claude: PathBuf,
    pub live_auth: PathBuf,
    pub live_settings: PathBuf,
    pub profiles: PathBuf,
    pub backups: PathBuf,
    pub current_marker: PathBuf,
    pub env_file: PathBuf,
    pub profiles_lock: PathBuf,
}

pub fn command_name() -> &'static str {
    static COMMAND_NAME: OnceLock<String> = OnceLock::new();
    COMMAND_NAME
        .get_or_init(|| {
            let env_value = env::var("CLAUDE_PROFILES_COMMAND").ok();
            compute_command_name_from(env_value, env::args_os())
        })
        .as_str()
}

fn compute_command_name_from<I>(env_value: Option<String>, mut args: I) -> String
where
    I: Iterator<Item = std::ffi::OsString>,
{
    if let Some(value) = env_value {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    args.next()
        .and_then(|arg| {
            Path::new(&arg)
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.to_string())
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "claude-profiles".to_string())
}

pub fn package_command_name() -> &'static str {
    "claude-profiles"
}

pub fn resolve_paths() -> Result<Paths, String> {
    let home_dir = resolve_home_dir().ok_or_else(|| COMMON_ERR_RESOLVE_HOME.to_string())?;
    Ok(paths_under(&home_dir))
}

pub fn paths_under(home_dir: &Path) -> Paths {
    let claude = home_dir.join(".claude");
    Paths {
        live_auth: home_dir.join(".claude.json"),
        live_settings: claude.join("settings.json"),
        profiles: claude.join("profiles"),
        backups: claude.join("backups"),
        current_marker: claude.join("current-profile.txt"),
        env_file: claude.join("env.sh"),
        profiles_lock: claude.join("profiles.lock"),
        claude,
    }
}

fn resolve_home_dir() -> Option<PathBuf> {
    let profiles_home = env::var_os("CLAUDE_PROFILES_HOME").map(PathBuf::from);
    let base_home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    let home = env::var_os("HOME").map(PathBuf::from);
    let userprofile = env::var_os("USERPROFILE").map(PathBuf::from);
    let homedrive = env::var_os("HOMEDRIVE").map(PathBuf::from);
    let homepath = env::var_os("HOMEPATH").map(PathBuf::from);
    resolve_home_dir_with(
        profiles_home,
        base_home,
        home,
        userprofile,
        homedrive,
        homepath,
    )
}

fn resolve_home_dir_with(
    profiles_home: Option<PathBuf>,
    base_home: Option<PathBuf>,
    home: Option<PathBuf>,
    userprofile: Option<PathBuf>,
    homedrive: Option<PathBuf>,
    homepath: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = non_empty_path(profiles_home) {
        return Some(path);
    }
    if let Some(path) = base_home {
        return Some(path);
    }
    if let Some(path) = non_empty_path(home) {
        return Some(path);
    }
    if let Some(path) = non_empty_path(userprofile) {
        return Some(path);
    }
    match (homedrive, homepath) {
        (Some(drive), Some(path)) => {
            let mut out = drive;
            out.push(path);
            if out.as_os_str().is_empty() {
                None
            } else {
                Some(out)
            }
        }
        _ => None,
    }
}

fn non_empty_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|path| !path.as_os_str().is_empty())
}

pub fn ensure_paths(paths: &Paths) -> Result<(), String> {
    if paths.profiles.exists() && !paths.profiles.is_dir() {
        return Err(crate::msg1(
            COMMON_ERR_EXISTS_NOT_DIR,
            paths.profiles.display(),
        ));
    }

    fs::create_dir_all(&paths.profiles).map_err(|err| {
        crate::msg2(
            COMMON_ERR_CREATE_PROFILES_DIR,
            paths.profiles.display(),
            err,
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o700);
        fs::set_permissions(&paths.profiles, perms).map_err(|err| {
            crate::msg2(
                COMMON_ERR_SET_PERMISSIONS,
                paths.profiles.display(),
                err,
            )
        })?;
    }

    ensure_backups(paths)?;
    Ok(())
}

/// First-run snapshot of whatever live files predate this tool. Once the
/// backups directory exists it is never written again.
fn ensure_backups(paths: &Paths) -> Result<(), String> {
    if paths.backups.exists() {
        return Ok(());
    }
    fs::create_dir_all(&paths.backups)
        .map_err(|err| crate::msg2(COMMON_ERR_CREATE_DIR, paths.backups.display(), err))?;
    let snapshots = [
        (&paths.live_auth, paths.backups.join("original-auth.json")),
        (
            &paths.live_settings,
            paths.backups.join("original-settings.json"),
        ),
    ];
    for (source, dest) in snapshots {
        if !source.is_file() {
            continue;
        }
        copy_atomic(source, &dest)
            .map_err(|err| crate::msg2(COMMON_ERR_BACKUP, source.display(), err))?;
    }
    Ok(())
}

pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), String> {
    let permissions = fs::metadata(path).ok().map(|meta| meta.permissions());
    write_atomic_with_permissions(path, contents, permissions)
}

#[cfg(unix)]
pub fn write_atomic_with_mode(path: &Path, contents: &[u8], mode: u32) -> Result<(), String> {
    use std::os::unix::fs::PermissionsExt;
    let permissions = fs::Permissions::from_mode(mode);
    write_atomic_with_permissions(path, contents, Some(permissions))
}

#[cfg(not(unix))]
pub fn write_atomic_with_mode(path: &Path, contents: &[u8], _mode: u32) -> Result<(), String> {
    write_atomic_with_permissions(path, contents, None)
}

fn write_atomic_with_permissions(
    path: &Path,
    contents: &[u8],
    permissions: Option<fs::Permissions>,
) -> Result<(), String> {
    let (parent, file_name) = split_target(path)?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .map_err(|err| crate::msg2(COMMON_ERR_CREATE_DIR, parent.display(), err))?;
    }

    let tmp_path = parent.join(temp_name(file_name)?);
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    if let Some(permissions) = permissions.as_ref() {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(permissions.mode());
    }
    let mut tmp_file = options
        .open(&tmp_path)
        .map_err(|err| crate::msg2(COMMON_ERR_CREATE_TEMP, path.display(), err))?;

    let written = tmp_file
        .write_all(contents)
        .and_then(|_| tmp_file.sync_all())
        .map_err(|err| crate::msg2(COMMON_ERR_WRITE_TEMP, path.display(), err));
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    if let Some(permissions) = permissions {
        if let Err(err) = fs::set_permissions(&tmp_path, permissions) {
            let _ = fs::remove_file(&tmp_path);
            return Err(crate::msg2(COMMON_ERR_SET_PERMISSIONS, path.display(), err));
        }
    }

    // Renaming over a symlink replaces the link itself, so the target
    // always ends up a regular file.
    if let Err(err) = fs::rename(&tmp_path, path) {
        #[cfg(windows)]
        {
            if path.exists() {
                let _ = fs::remove_file(path);
            }
            if fs::rename(&tmp_path, path).is_ok() {
                return Ok(());
            }
        }
        let _ = fs::remove_file(&tmp_path);
        return Err(crate::msg2(COMMON_ERR_REPLACE_FILE, path.display(), err));
    }
    Ok(())
}

pub fn copy_atomic(source: &Path, dest: &Path) -> Result<(), String> {
    let permissions = fs::metadata(source)
        .map_err(|err| crate::msg2(COMMON_ERR_READ_METADATA, source.display(), err))?
        .permissions();
    let contents =
        fs::read(source).map_err(|err| crate::msg2(COMMON_ERR_READ_FILE, source.display(), err))?;
    write_atomic_with_permissions(dest, &contents, Some(permissions))
}

/// Atomically repoint `path` at `target`: a temp symlink is created next to
/// the destination and renamed into place, so readers never see a missing
/// location.
pub fn symlink_replace(target: &Path, path: &Path) -> Result<(), String> {
    let (parent, file_name) = split_target(path)?;
    let tmp_path = parent.join(temp_name(file_name)?);
    make_symlink(target, &tmp_path)
        .map_err(|err| crate::msg2(COMMON_ERR_CREATE_TEMP, path.display(), err))?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(crate::msg2(COMMON_ERR_REPLACE_FILE, path.display(), err));
    }
    Ok(())
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

fn split_target(path: &Path) -> Result<(&Path, &str), String> {
    let parent = path
        .parent()
        .ok_or_else(|| crate::msg1(COMMON_ERR_RESOLVE_PARENT, path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| crate::msg1(COMMON_ERR_INVALID_FILE_NAME, path.display()))?;
    Ok((parent, file_name))
}

fn temp_name(file_name: &str) -> Result<String, String> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| crate::msg1(COMMON_ERR_GET_TIME, err))?
        .as_nanos();
    let pid = std::process::id();
    Ok(format!(".{file_name}.tmp-{pid}-{nanos}"))
}

const LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(25);

#[derive(Debug)]
pub struct StoreLock {
    _lock: LockFile,
}

pub fn lock_store(paths: &Paths) -> Result<StoreLock, String> {
    let start = Instant::now();
    let mut lock = LockFile::open(&paths.profiles_lock)
        .map_err(|err| crate::msg1(COMMON_ERR_LOCK_OPEN, err))?;
    loop {
        match lock.try_lock() {
            Ok(true) => break,
            Ok(false) => {
                if start.elapsed() > LOCK_TIMEOUT {
                    return Err(crate::msg1(COMMON_ERR_LOCK_ACQUIRE, command_name()));
                }
                thread::sleep(LOCK_RETRY_DELAY);
            }
            Err(err) => {
                return Err(crate::msg1(COMMON_ERR_LOCK_HELD, err));
            }
        }
    }
    Ok(StoreLock { _lock: lock })
}
