use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) struct TestEnv {
    home: PathBuf,
}

impl TestEnv {
    pub(crate) fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let home = env::temp_dir().join(format!(
            "claude-profiles-test-{}-{nanos}",
            std::process::id()
        ));
        fs::create_dir_all(home.join(".claude")).expect("create claude dir");
        Self { home }
    }

    pub(crate) fn claude_dir(&self) -> PathBuf {
        self.home.join(".claude")
    }

    pub(crate) fn profiles_dir(&self) -> PathBuf {
        self.claude_dir().join("profiles")
    }

    pub(crate) fn live_auth(&self) -> PathBuf {
        self.home.join(".claude.json")
    }

    pub(crate) fn live_settings(&self) -> PathBuf {
        self.claude_dir().join("settings.json")
    }

    pub(crate) fn env_file(&self) -> PathBuf {
        self.claude_dir().join("env.sh")
    }

    pub(crate) fn read_marker(&self) -> String {
        fs::read_to_string(self.claude_dir().join("current-profile.txt"))
            .expect("read current-profile.txt")
            .trim()
            .to_string()
    }

    pub(crate) fn write_live_oauth(&self, email: &str, session_token: &str) {
        let value = serde_json::json!({
            "sessionToken": session_token,
            "oauthAccount": { "emailAddress": email },
            "numStartups": 3,
        });
        fs::write(
            self.live_auth(),
            serde_json::to_string(&value).expect("serialize auth"),
        )
        .expect("write live auth");
    }

    pub(crate) fn run(&self, args: &[&str]) -> String {
        let output = self.run_output(args);
        self.assert_success(args, output)
    }

    pub(crate) fn run_expect_error(&self, args: &[&str]) -> String {
        let output = self.run_output(args);
        if output.status.success() {
            panic!(
                "command unexpectedly succeeded: {:?}\nstdout:\n{}",
                args,
                String::from_utf8_lossy(&output.stdout)
            );
        }
        ascii_only(String::from_utf8_lossy(&output.stderr).as_ref())
    }

    fn run_output(&self, args: &[&str]) -> Output {
        let bin = resolve_bin_path();
        let mut cmd = Command::new(bin);
        cmd.args(args)
            .env("HOME", &self.home)
            .env("CLAUDE_PROFILES_HOME", &self.home)
            .env("CLAUDE_PROFILES_COMMAND", "claude-profiles")
            .env("CLAUDE_PROFILES_SKIP_GUARD", "1")
            .env("NO_COLOR", "1")
            .env("LANG", "C")
            .env("LC_ALL", "C")
            .stdin(Stdio::null());
        if cfg!(windows) {
            cmd.env("USERPROFILE", &self.home);
        }
        cmd.output().expect("run command")
    }

    fn assert_success(&self, args: &[&str], output: Output) -> String {
        if !output.status.success() {
            panic!(
                "command failed: {:?}\nstdout:\n{}\nstderr:\n{}",
                args,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        ascii_only(String::from_utf8_lossy(&output.stdout).as_ref())
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.home);
    }
}

pub(crate) fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}

fn ascii_only(raw: &str) -> String {
    let output = raw.replace('\r', "");
    let filtered: String = output.chars().filter(|ch| ch.is_ascii()).collect();
    filtered
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_claude-profiles") {
        return PathBuf::from(path);
    }
    let exe = env::current_exe().expect("current exe");
    let target_dir = exe
        .parent()
        .and_then(|path| path.parent())
        .expect("target dir");
    let bin_name = if cfg!(windows) {
        "claude-profiles.exe"
    } else {
        "claude-profiles"
    };
    target_dir.join(bin_name)
}
