use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};
use tempfile::TempDir;

#[derive(Debug)]
pub struct SitRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

impl SitRun {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }
}

pub struct SitWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub log_dir: PathBuf,
}

impl SitWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let log_dir = root.join("logs");
        fs::create_dir_all(&log_dir).expect("log dir");
        Self {
            temp_dir,
            root,
            log_dir,
        }
    }

    /// A workspace with `issues.sitdb` already initialized.
    pub fn initialized() -> Self {
        let workspace = Self::new();
        let run = run_sit(&workspace, ["init"], "init");
        assert!(run.success(), "init failed: {}", run.stderr);
        workspace
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join("issues.sitdb")
    }
}

pub fn run_sit<I, S>(workspace: &SitWorkspace, args: I, label: &str) -> SitRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_sit_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

pub fn run_sit_with_env<I, S, E, K, V>(
    workspace: &SitWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> SitRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rotsit"));
    cmd.current_dir(&workspace.root);
    cmd.args(args);
    cmd.env_remove("ROTSIT_DB");
    cmd.env_remove("ROTSIT_ACTOR");
    cmd.env_remove("ROTSIT_JSON");
    cmd.env_remove("VISUAL");
    cmd.env("EDITOR", "false");
    cmd.env("USER", "tester");
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "rotsit=debug");
    cmd.env("RUST_BACKTRACE", "1");
    cmd.env("HOME", &workspace.root);
    cmd.envs(env_vars);

    let start = Instant::now();
    let output = cmd.output().expect("run rotsit");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = workspace.log_dir.join(format!("{label}.log"));
    let timestamp = SystemTime::now();
    let log_body = format!(
        "label: {label}\nstarted: {:?}\nduration: {:?}\nstatus: {}\nargs: {:?}\ncwd: {}\n\nstdout:\n{}\n\nstderr:\n{}\n",
        timestamp,
        duration,
        output.status,
        cmd.get_args().collect::<Vec<_>>(),
        workspace.root.display(),
        stdout,
        stderr
    );
    fs::write(&log_path, log_body).expect("write log");

    SitRun {
        stdout,
        stderr,
        status: output.status,
        duration,
        log_path,
    }
}

pub fn extract_json_payload(stdout: &str) -> String {
    let lines: Vec<&str> = stdout.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            return lines[idx..].join("\n").trim().to_string();
        }
    }
    stdout.trim().to_string()
}

/// Parse the JSON a command printed on stdout.
pub fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(&extract_json_payload(stdout)).expect("valid json")
}

/// Add an issue and return its GUID.
pub fn add_issue(workspace: &SitWorkspace, message: &str) -> String {
    let run = run_sit(workspace, ["add", "--json", "-m", message], "add");
    assert!(run.success(), "add failed: {}", run.stderr);
    parse_json(&run.stdout)["guid"]
        .as_str()
        .expect("guid")
        .to_string()
}
