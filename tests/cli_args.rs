//! Integration tests for the pagecache binary
//!
//! Runs the compiled CLI against a local mock HTTP server with the in-memory
//! store.

use std::process::Output;

use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to run the CLI with given args and capture output
async fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pagecache"))
        .args(args)
        .env_remove("PAGECACHE_STORE")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("Failed to execute pagecache")
}

#[tokio::test]
async fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]).await;
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pagecache"), "Help should mention pagecache");
    assert!(stdout.contains("get"), "Help should list the get command");
    assert!(stdout.contains("--store"), "Help should mention --store");
}

#[tokio::test]
async fn test_get_prints_page_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;

    let url = format!("{}/a", server.uri());
    let output = run_cli(&["get", &url]).await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello");
}

#[tokio::test]
async fn test_get_repeat_fetches_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("X"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/a", server.uri());
    let output = run_cli(&["get", "--repeat", "3", &url]).await;

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "XXX");
}

#[tokio::test]
async fn test_malformed_url_prints_error_and_exits() {
    let output = run_cli(&["get", "not a url"]).await;
    assert!(!output.status.success(), "Expected malformed URL to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Malformed") || stderr.contains("Invalid"),
        "Should print error about the URL: {}",
        stderr
    );
}

#[tokio::test]
async fn test_error_status_exits_with_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = format!("{}/broken", server.uri());
    let output = run_cli(&["get", &url]).await;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "No content on failure");
}

#[tokio::test]
async fn test_invalid_store_is_rejected() {
    let output = run_cli(&["--store", "mongodb://127.0.0.1", "get", "http://example.test/"]).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("InvalidStore") || stderr.contains("Invalid store"), "{}", stderr);
}

#[tokio::test]
async fn test_huge_ttl_is_rejected_without_panicking() {
    let output = run_cli(&["--ttl", "18446744073709551615", "get", "http://127.0.0.1:1/"]).await;
    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(101), "Should exit with an error, not a panic");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TtlTooLarge"), "{}", stderr);
}

#[tokio::test]
async fn test_unreachable_redis_fails() {
    let output = run_cli(&["--store", "redis://127.0.0.1:1", "get", "http://example.test/"]).await;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_count_with_fresh_memory_store_is_zero() {
    let output = run_cli(&["count", "http://example.test/a"]).await;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "0\thttp://example.test/a\n"
    );
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use pagecache::cli::{Cli, CliError, Command, ProxyConfig};
    use pagecache::StoreEndpoint;

    #[test]
    fn test_cli_count_multiple_urls() {
        let cli = Cli::parse_from(["pagecache", "count", "http://a.test/", "http://b.test/"]);
        assert_eq!(
            cli.command,
            Command::Count {
                urls: vec!["http://a.test/".to_string(), "http://b.test/".to_string()],
            }
        );
    }

    #[test]
    fn test_config_from_cli_with_redis() {
        let cli = Cli::parse_from([
            "pagecache",
            "--store",
            "redis://127.0.0.1:6379/2",
            "--ttl",
            "5",
            "get",
            "http://a.test/",
        ]);
        let config = ProxyConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.store,
            StoreEndpoint::Redis("redis://127.0.0.1:6379/2".to_string())
        );
        assert_eq!(config.ttl.as_secs(), 5);
    }

    #[test]
    fn test_config_error_messages() {
        let cli = Cli::parse_from([
            "pagecache",
            "--store",
            "memory",
            "--ttl",
            "0",
            "get",
            "http://a.test/",
        ]);
        let err = ProxyConfig::from_cli(&cli).unwrap_err();
        assert!(matches!(err, CliError::ZeroTtl));
        assert!(err.to_string().contains("TTL"));
    }
}
