//! Running make with always-make, debug and just-print flags.

use crate::types::CheckConfig;
use std::ffi::OsString;
use std::io;
use std::process::{Command, ExitStatus};
use tracing::{debug, warn};

/// The build tool could not be started. Always fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("build tool not found: {program}")]
    NotFound { program: String },

    #[error("permission denied running {program}")]
    PermissionDenied { program: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Everything make printed, decoded lossily.
#[derive(Debug, Clone)]
pub struct Capture {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Capture {
    /// Stdout lines followed by stderr lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().chain(self.stderr.lines())
    }
}

/// Arguments passed to make itself.
pub fn make_args(config: &CheckConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = config.flags.iter().map(OsString::from).collect();
    if let Some(dir) = &config.directory {
        args.push("-C".into());
        args.push(dir.into());
    }
    if let Some(file) = &config.makefile {
        args.push("-f".into());
        args.push(file.into());
    }
    args.extend(config.goals.iter().map(OsString::from));
    args
}

/// Program and arguments actually spawned. In dry-run mode make becomes
/// the first argument to `echo`.
pub fn command_line(config: &CheckConfig) -> (String, Vec<OsString>) {
    let args = make_args(config);
    if config.dry_run {
        let mut echoed = vec![OsString::from(&config.make)];
        echoed.extend(args);
        ("echo".to_string(), echoed)
    } else {
        (config.make.clone(), args)
    }
}

/// Run the build tool to completion and capture its output.
///
/// A non-zero exit status is logged, not treated as an error. make exits
/// non-zero in just-print mode whenever a prerequisite has no rule.
pub fn run(config: &CheckConfig) -> Result<Capture, InvocationError> {
    let (program, args) = command_line(config);
    debug!("running {} {}", program, render(&args));

    let output = Command::new(&program)
        .args(&args)
        .output()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => InvocationError::NotFound {
                program: program.clone(),
            },
            io::ErrorKind::PermissionDenied => InvocationError::PermissionDenied {
                program: program.clone(),
            },
            _ => InvocationError::Spawn {
                program: program.clone(),
                source,
            },
        })?;

    if output.status.success() {
        debug!("{} exited with {}", program, output.status);
    } else {
        warn!("{} exited with {}", program, output.status);
    }

    Ok(Capture {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

fn render(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
