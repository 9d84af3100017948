//! PID-1 wrapper for function containers: drop privileges to the runtime
//! user, then exec the long-running server (or a one-shot install script).

use anyhow::{Context, Result};
use nix::unistd::{execvp, setgid, setgroups, setuid, Uid, User};
use std::convert::Infallible;
use std::ffi::CString;
use tracing::{info, warn};

const DEFAULT_RUN_AS: &str = "harness";
const DEFAULT_SCRIPT: &str = "/usr/local/bin/harness-server";

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let run_as = std::env::var("HARNESS_RUN_AS").unwrap_or_else(|_| DEFAULT_RUN_AS.to_string());
    let script = std::env::var("SCRIPT_FILE").unwrap_or_else(|_| DEFAULT_SCRIPT.to_string());

    if Uid::effective().is_root() {
        drop_privileges(&run_as)?;
        info!("Dropped privileges to user {}", run_as);
    } else {
        warn!("Not running as root; keeping current user");
    }

    info!("Handing off to {}", script);
    exec_script(&script).with_context(|| format!("failed to exec {script}"))?;
    unreachable!("execvp returned without error")
}

/// Groups first, then gid, then uid: once the uid is gone there is no
/// coming back to shed the rest.
fn drop_privileges(name: &str) -> Result<()> {
    let user = User::from_name(name)
        .with_context(|| format!("lookup of user {name} failed"))?
        .with_context(|| format!("user {name} not found"))?;

    setgroups(&[user.gid]).context("setgroups failed")?;
    setgid(user.gid).context("setgid failed")?;
    setuid(user.uid).context("setuid failed")?;
    Ok(())
}

/// Replaces the process image; returns only on failure.
fn exec_script(script: &str) -> Result<Infallible> {
    let argv = parse_argv(script)?;
    let exec_result = execvp(&argv[0], &argv)?;
    Ok(exec_result)
}

/// SCRIPT_FILE may carry arguments ("/mnt/function/package.sh --verbose").
fn parse_argv(script: &str) -> Result<Vec<CString>> {
    let argv: Vec<CString> = script
        .split_whitespace()
        .map(|part| CString::new(part).context("argument contains NUL byte"))
        .collect::<Result<_>>()?;
    if argv.is_empty() {
        anyhow::bail!("SCRIPT_FILE is empty");
    }
    Ok(argv)
}
