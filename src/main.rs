use clap::{ArgAction, Parser};
use make_missing::{CheckConfig, INVOCATION_FAILED};
use std::path::PathBuf;
use tracing::Level;

/// Run make in debug dry-run mode and list targets whose files are missing.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Same as -vv
    #[arg(long)]
    debug: bool,

    /// Do not run make, only show the command that would run
    #[arg(long, visible_alias = "test")]
    dry_run: bool,

    /// Build tool to invoke
    #[arg(long, env = "MAKE", default_value = "make")]
    make: String,

    /// Change to DIR before reading the makefile
    #[arg(short = 'C', long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Read FILE as the makefile
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Goals to check instead of the default goal
    goals: Vec<String>,
}

impl Cli {
    fn log_level(&self) -> Level {
        match (self.verbose, self.debug) {
            (v, _) if v >= 3 => Level::TRACE,
            (2, _) | (_, true) => Level::DEBUG,
            (1, _) => Level::INFO,
            _ => Level::WARN,
        }
    }

    fn config(self) -> CheckConfig {
        CheckConfig {
            make: self.make,
            directory: self.directory,
            makefile: self.file,
            goals: self.goals,
            dry_run: self.dry_run,
            ..CheckConfig::gnu_make()
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    let config = cli.config();
    let result = tracing::subscriber::with_default(subscriber, || make_missing::run(&config));

    match result {
        Ok(report) => std::process::exit(report.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(INVOCATION_FAILED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_levels() {
        let level = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("make-missing").chain(args.iter().copied()))
                .unwrap()
                .log_level()
        };
        assert_eq!(level(&[]), Level::WARN);
        assert_eq!(level(&["-v"]), Level::INFO);
        assert_eq!(level(&["-vv"]), Level::DEBUG);
        assert_eq!(level(&["--debug"]), Level::DEBUG);
        assert_eq!(level(&["-vvv"]), Level::TRACE);
    }

    #[test]
    fn config_from_args() {
        let cli = Cli::try_parse_from([
            "make-missing",
            "--test",
            "--make",
            "gmake",
            "-C",
            "build",
            "-f",
            "rules.mk",
            "all",
            "docs",
        ])
        .unwrap();
        let config = cli.config();
        assert!(config.dry_run);
        assert_eq!(config.make, "gmake");
        assert_eq!(config.directory, Some(PathBuf::from("build")));
        assert_eq!(config.makefile, Some(PathBuf::from("rules.mk")));
        assert_eq!(config.goals, vec!["all", "docs"]);
        assert_eq!(config.flags, vec!["-B", "-d", "-n"]);
    }
}
