//! Output of the `connectivity` command.

use super::helpers::Captured;
use super::*;
use clap::Parser;
use osmap_core::test_support::StaticMonitor;
use rstest::rstest;

#[rstest]
#[case(StaticMonitor::online(), "online\n")]
#[case(StaticMonitor::legacy(true), "online\n")]
#[case(StaticMonitor::legacy(false), "offline\n")]
#[case(StaticMonitor::offline(), "offline\n")]
fn prints_connectivity_state(#[case] monitor: StaticMonitor, #[case] expected: &str) {
    let mut captured = Captured::default();
    run_connectivity_with(&monitor, &mut captured.out).expect("connectivity should print");
    assert_eq!(captured.stdout(), expected);
}

#[rstest]
fn parses_subcommands() {
    let cli = Cli::try_parse_from(["osmap", "connectivity"]).expect("parse connectivity");
    assert!(matches!(cli.command, Command::Connectivity));

    let cli = Cli::try_parse_from([
        "osmap",
        "route",
        "--start",
        "17.75,-97.77",
        "--end",
        "-17.80,97.74",
        "--algorithm",
        "busqueda_bidireccional",
        "--mode",
        "always-fetch",
    ])
    .expect("parse route");
    match cli.command {
        Command::Route(args) => {
            assert_eq!(args.end.as_deref(), Some("-17.80,97.74"));
            assert_eq!(args.mode, Some(ModeArg::AlwaysFetch));
        }
        other => panic!("expected route command, found {other:?}"),
    }
}

#[rstest]
fn rejects_unknown_mode() {
    let err = Cli::try_parse_from(["osmap", "map-data", "--mode", "sometimes"])
        .expect_err("unknown mode should fail");
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
}

#[rstest]
#[case(ModeArg::OfflineFirst, FetchMode::OfflineFirst)]
#[case(ModeArg::AlwaysFetch, FetchMode::AlwaysFetch)]
fn mode_maps_onto_fetch_mode(#[case] arg: ModeArg, #[case] expected: FetchMode) {
    assert_eq!(FetchMode::from(arg), expected);
}
