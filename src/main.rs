use std::env;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use glconform::config::RunOptions;
use glconform::result::TestResult;
use glconform::{runner, suite};

/// Runs OpenGL conformance tests on a headless context.
#[derive(Parser, Debug)]
#[command(name = "glconform", version)]
struct Cli {
    /// Name of the test to run.
    #[arg(required_unless_present_any = ["list", "all"])]
    test: Option<String>,

    /// Arguments given to the test.
    #[arg(allow_negative_numbers = true)]
    args: Vec<String>,

    /// Runs unattended: value dumps are only logged at debug level.
    #[arg(long)]
    auto: bool,

    /// Accepted for compatibility, tests always draw into a framebuffer object.
    #[arg(long)]
    fbo: bool,

    /// Only runs this subtest. Can be given several times.
    #[arg(long = "subtest", value_name = "NAME")]
    subtests: Vec<String>,

    /// Lists the available tests.
    #[arg(long, conflicts_with = "all")]
    list: bool,

    /// Runs every test.
    #[arg(long)]
    all: bool,
}

/// Test runners pass options with a single dash.
fn normalize_arg(arg: String) -> String {
    match arg.as_str() {
        "-auto" | "-fbo" | "-subtest" => format!("-{}", arg),
        _ => arg,
    }
}

fn init_logging(automatic: bool) {
    let default = if automatic { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the result lines
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("a global tracing subscriber is already installed");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(env::args().map(normalize_arg));
    init_logging(cli.auto);

    if cli.list {
        for test in suite::all() {
            println!("{}", test.name());
        }
        return ExitCode::SUCCESS;
    }

    if cli.fbo {
        debug!("-fbo is implied");
    }

    let options = RunOptions {
        automatic: cli.auto,
        subtests: cli.subtests,
        args: cli.args,
    };

    let result = if cli.all {
        suite::all()
            .map(|test| runner::run(test, &options))
            .reduce(TestResult::merge)
            .unwrap_or(TestResult::Skip)
    } else {
        let name = cli.test.unwrap_or_default();
        match suite::find(&name) {
            Some(test) => runner::run(test, &options),
            None => {
                error!("unknown test {:?}, see --list", name);
                return ExitCode::FAILURE;
            },
        }
    };

    ExitCode::from(result.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().map(|arg| normalize_arg(arg.to_string())))
            .expect("the command line should parse")
    }

    #[test]
    fn single_dash_options() {
        let cli = parse(&["glconform", "arb_vertex_attrib_64bit-using-transform-feedback",
                          "7", "-auto", "-fbo", "-subtest", "a", "-subtest", "b"]);
        assert_eq!(cli.test.as_deref(),
                   Some("arb_vertex_attrib_64bit-using-transform-feedback"));
        assert_eq!(cli.args, vec!["7"]);
        assert!(cli.auto);
        assert!(cli.fbo);
        assert_eq!(cli.subtests, vec!["a", "b"]);
    }

    #[test]
    fn negative_test_arguments() {
        let cli = parse(&["glconform", "arb_vertex_attrib_64bit-using-transform-feedback",
                          "-3"]);
        assert_eq!(cli.args, vec!["-3"]);
        assert!(!cli.auto);
    }

    #[test]
    fn list_needs_no_test() {
        let cli = parse(&["glconform", "--list"]);
        assert!(cli.list);
        assert!(cli.test.is_none());
    }

    #[test]
    fn test_name_is_required() {
        assert!(Cli::try_parse_from(["glconform"]).is_err());
    }

    #[test]
    fn list_conflicts_with_all() {
        assert!(Cli::try_parse_from(["glconform", "--list", "--all"]).is_err());
    }
}
