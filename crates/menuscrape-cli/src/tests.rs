use std::path::{Path, PathBuf};

use clap::Parser;
use menuscrape_core::{builtin_profiles, AppConfig, Environment};

use super::*;
use crate::scrape::{profile_line, resolve_run, ScrapeRequest};

fn config() -> AppConfig {
    AppConfig {
        env: Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        log_level: "info".to_string(),
        output_dir: PathBuf::from("/var/lib/menus"),
        static_dir: PathBuf::from("./public"),
        profiles_path: None,
        debug_dir: None,
        page_load_timeout_secs: 60,
        selector_timeout_secs: 30,
        request_timeout_secs: 300,
        user_agent: "test-agent".to_string(),
        fetch_max_retries: 0,
    }
}

// -----------------------------------------------------------------------------
// argument parsing
// -----------------------------------------------------------------------------

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["menuscrape-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_profiles_command() {
    let cli = Cli::try_parse_from(["menuscrape-cli", "profiles"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Profiles)));
}

#[test]
fn parses_scrape_with_site_only() {
    let cli = Cli::try_parse_from(["menuscrape-cli", "scrape", "--site", "uber"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            ref site,
            url: None,
            dry_run: false,
            ..
        }) if site == "uber"
    ));
}

#[test]
fn parses_scrape_with_url_and_output_dir() {
    let cli = Cli::try_parse_from([
        "menuscrape-cli",
        "scrape",
        "--site",
        "ilcaminetto",
        "--url",
        "https://orders.example/menu",
        "--output-dir",
        "/tmp/menus",
        "--dry-run",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            ref url,
            ref output_dir,
            dry_run: true,
            ..
        }) if url.as_deref() == Some("https://orders.example/menu")
            && output_dir.as_deref() == Some(Path::new("/tmp/menus"))
    ));
}

#[test]
fn scrape_requires_site() {
    assert!(Cli::try_parse_from(["menuscrape-cli", "scrape"]).is_err());
}

// -----------------------------------------------------------------------------
// run resolution
// -----------------------------------------------------------------------------

#[test]
fn resolve_defaults_to_profile_url_and_config_output_dir() {
    let profiles = builtin_profiles();
    let request = ScrapeRequest {
        site: "uber",
        url: None,
        output_dir: None,
        dry_run: false,
    };

    let run = resolve_run(&config(), &profiles, &request).unwrap();

    assert_eq!(run.profile.id, "uber");
    assert_eq!(run.url, run.profile.default_url);
    assert_eq!(run.output_dir, PathBuf::from("/var/lib/menus"));
}

#[test]
fn resolve_prefers_explicit_url_and_dir() {
    let profiles = builtin_profiles();
    let request = ScrapeRequest {
        site: "ilcaminetto",
        url: Some("  https://orders.example/menu "),
        output_dir: Some(Path::new("/tmp/out")),
        dry_run: false,
    };

    let run = resolve_run(&config(), &profiles, &request).unwrap();

    assert_eq!(run.url, "https://orders.example/menu");
    assert_eq!(run.output_dir, PathBuf::from("/tmp/out"));
}

#[test]
fn blank_url_falls_back_to_profile_default() {
    let profiles = builtin_profiles();
    let request = ScrapeRequest {
        site: "uber",
        url: Some("   "),
        output_dir: None,
        dry_run: false,
    };

    let run = resolve_run(&config(), &profiles, &request).unwrap();
    assert_eq!(run.url, run.profile.default_url);
}

#[test]
fn unknown_site_lists_known_ids() {
    let profiles = builtin_profiles();
    let request = ScrapeRequest {
        site: "doordash",
        url: None,
        output_dir: None,
        dry_run: false,
    };

    let err = resolve_run(&config(), &profiles, &request).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("doordash"), "got: {message}");
    assert!(message.contains("uber"), "got: {message}");
}

#[test]
fn profile_line_is_tab_separated() {
    let profiles = builtin_profiles();
    let line = profile_line(profiles.get("uber").unwrap());
    let fields: Vec<&str> = line.split('\t').collect();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0], "uber");
    assert_eq!(fields[2], "uber_menu.json");
}
