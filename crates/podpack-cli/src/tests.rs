use clap::Parser;

use crate::{subpath_filter, Cli, Commands};

#[test]
fn install_args_parse() {
    let cli = Cli::try_parse_from([
        "podpack",
        "install",
        "flathub",
        "app/org.gnome.Recipes/x86_64/stable",
        "--subpath",
        "/de",
        "--subpath",
        "/fr",
    ])
    .expect("must parse");

    let Commands::Install {
        remote,
        bundle_ref,
        subpaths,
    } = &cli.command
    else {
        panic!("expected install command");
    };
    assert_eq!(remote, "flathub");
    assert_eq!(bundle_ref, "app/org.gnome.Recipes/x86_64/stable");
    assert_eq!(subpaths, &["/de", "/fr"]);
    assert!(!cli.assumeyes);
}

#[test]
fn update_args_parse_with_commit() {
    let cli = Cli::try_parse_from([
        "podpack",
        "--system",
        "update",
        "app/org.gnome.Recipes/x86_64/stable",
        "--commit",
        "abc123",
    ])
    .expect("must parse");

    assert!(cli.system);
    let Commands::Update {
        bundle_ref,
        commit,
        subpaths,
    } = &cli.command
    else {
        panic!("expected update command");
    };
    assert_eq!(bundle_ref, "app/org.gnome.Recipes/x86_64/stable");
    assert_eq!(commit.as_deref(), Some("abc123"));
    assert!(subpaths.is_empty());
}

#[test]
fn global_flags_parse_after_subcommand() {
    let cli = Cli::try_parse_from([
        "podpack",
        "install-oci",
        "/srv/registry",
        "latest",
        "--no-related",
        "-y",
    ])
    .expect("must parse");

    assert!(cli.no_related);
    assert!(cli.assumeyes);
    assert!(matches!(cli.command, Commands::InstallOci { .. }));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["podpack"]).is_err());
    assert!(Cli::try_parse_from(["podpack", "install", "flathub"]).is_err());
}

#[test]
fn subpath_filter_distinguishes_absent_from_given() {
    assert_eq!(subpath_filter(&[]), None);
    assert_eq!(
        subpath_filter(&["/de".to_string()]),
        Some(vec!["/de".to_string()])
    );
}
