use assert_cmd::Command;
use predicates::prelude::*;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

#[allow(deprecated)]
fn get_matokeo_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("matokeo")
}

const INDEX_HTML: &str = r#"<HTML><BODY>
<A HREF="results\s0101.htm">S0101 AZANIA</A>
<A HREF="results\s0102.htm">S0102 JANGWANI</A>
<A HREF="about.htm">About</A>
</BODY></HTML>"#;

/// Serve one canned response on a loopback port and return the index URL
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let response = format!(
                "{}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{}/csee2022/", addr)
}

fn links_cmd(index_url: &str) -> Command {
    let mut cmd = Command::new(get_matokeo_bin());
    cmd.env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env("NO_PROXY", "127.0.0.1")
        .arg("links")
        .arg("--index-url")
        .arg(index_url);
    cmd
}

#[test]
fn test_links_command_help() {
    let mut cmd = Command::new(get_matokeo_bin());
    cmd.arg("links").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Print the school result links found on the index page",
        ))
        .stdout(predicate::str::contains("--index-url"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn test_links_prints_absolute_result_urls() {
    let index_url = serve_once("HTTP/1.1 200 OK", INDEX_HTML);

    let output = links_cmd(&index_url).assert().success().get_output().clone();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(
        lines,
        vec![
            "https://matokeo.necta.go.tz/csee2022/results/s0101.htm",
            "https://matokeo.necta.go.tz/csee2022/results/s0102.htm",
        ]
    );
}

#[test]
fn test_links_honours_base_url() {
    let index_url = serve_once("HTTP/1.1 200 OK", INDEX_HTML);

    links_cmd(&index_url)
        .arg("--base-url")
        .arg("https://mirror.example/csee2022/")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://mirror.example/csee2022/results/s0101.htm",
        ))
        .stdout(predicate::str::contains("about.htm").not());
}

#[test]
fn test_links_empty_index_succeeds_with_no_output() {
    let index_url = serve_once("HTTP/1.1 200 OK", "<HTML><BODY>Coming soon</BODY></HTML>");

    links_cmd(&index_url)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_links_error_status_fails() {
    let index_url = serve_once("HTTP/1.1 503 Service Unavailable", "busy");

    links_cmd(&index_url)
        .assert()
        .failure()
        .stderr(predicate::str::contains("503"));
}
