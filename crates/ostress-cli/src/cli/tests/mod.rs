//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_no_subcommand_defaults_to_run() {
    let cli = parse(&["ostress"]);
    assert!(cli.command.is_none());
    assert!(cli.config.is_none());
}

#[test]
fn cli_parse_run_defaults() {
    match parse(&["ostress", "run"]).command {
        Some(CliCommand::Run {
            iterations,
            workers,
        }) => {
            assert_eq!(iterations, None);
            assert_eq!(workers, 1);
        }
        other => panic!("expected Run, got {other:?}"),
    }
}

#[test]
fn cli_parse_run_with_limits_and_config() {
    let cli = parse(&[
        "ostress",
        "run",
        "--iterations",
        "10",
        "--workers",
        "4",
        "--config",
        "/etc/ostress.toml",
    ]);
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/etc/ostress.toml"))
    );
    match cli.command {
        Some(CliCommand::Run {
            iterations,
            workers,
        }) => {
            assert_eq!(iterations, Some(10));
            assert_eq!(workers, 4);
        }
        other => panic!("expected Run, got {other:?}"),
    }
}

#[test]
fn cli_parse_check() {
    assert!(matches!(
        parse(&["ostress", "check"]).command,
        Some(CliCommand::Check)
    ));
}

#[test]
fn cli_parse_fetch_with_headers() {
    match parse(&[
        "ostress",
        "fetch",
        "http://ceph.local/AG100.003/f.h5",
        "-o",
        "/tmp/f.h5",
        "-H",
        "X-A: 1",
        "--header",
        "X-B: 2",
        "--expected-size",
        "44042064",
    ])
    .command
    {
        Some(CliCommand::Fetch {
            url,
            output,
            headers,
            expected_size,
        }) => {
            assert_eq!(url, "http://ceph.local/AG100.003/f.h5");
            assert_eq!(output.as_deref(), Some(std::path::Path::new("/tmp/f.h5")));
            assert_eq!(headers, ["X-A: 1", "X-B: 2"]);
            assert_eq!(expected_size, Some(44_042_064));
        }
        other => panic!("expected Fetch, got {other:?}"),
    }
}

#[test]
fn cli_parse_fetch_requires_url() {
    assert!(Cli::try_parse_from(["ostress", "fetch"]).is_err());
}
