//! End-to-end mirror runs against a mock copy of the site.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use eyes_mirror::mirror::{LOCAL_CONFIG_CONTENTS, run_mirror, verify_mirror};
use eyes_mirror::site::{ESSENTIAL_FILES, FAVICON_FILES, MAIN_FILES, PRELOADED_ASSETS};
use eyes_mirror::{HttpClient, Interrupt, MirrorConfig, MirrorProgress, SiteProfile};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;
use support::stalled_body::start_stalled_body_server_or_skip;

const APP_PATH: &str = "/apps/solar-system/";

fn config_for(mock_server: &MockServer, root: &Path) -> MirrorConfig {
    let site = SiteProfile::new(&format!("{}{APP_PATH}", mock_server.uri()), "127.0.0.1")
        .expect("mock site should be valid");
    MirrorConfig::new(site)
        .with_output_dir(root)
        .with_concurrency(4)
        .with_timeout(Duration::from_secs(10))
}

async fn mount_body(mock_server: &MockServer, path_str: &str, body: impl Into<Vec<u8>>) {
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.into()))
        .mount(mock_server)
        .await;
}

/// Serves every main file and preloaded asset; favicons are left unmounted (404).
///
/// `app.js` also references one texture hosted on `secondary`, a second
/// in-scope host that differs from the primary only by port.
async fn mount_site(mock_server: &MockServer, secondary: &MockServer) {
    for (remote, local) in MAIN_FILES {
        let body = match *local {
            "app.js" => format!(
                r#"var a="/assets/static/foo.png";var b="/assets/static/foo.png?v=2";var c="{}/server/spice/earth.json";var d="https://cdn.example.com/lib.js";var e="{}/textures/moon.jpg";"#,
                mock_server.uri(),
                secondary.uri()
            ),
            "app.css" => ".hero{background:url(images/bg.jpg)}.x{background:url(data:image/png;base64,AA)}"
                .to_string(),
            other => format!("/* {other} */"),
        };
        mount_body(mock_server, &format!("{APP_PATH}{remote}"), body).await;
    }
    for (remote, _) in PRELOADED_ASSETS {
        mount_body(mock_server, &format!("{APP_PATH}{remote}"), format!("<{remote}>")).await;
    }
    mount_body(mock_server, "/assets/static/foo.png", b"\x89PNG\r\n".to_vec()).await;
    mount_body(mock_server, "/server/spice/earth.json", r#"{"body":"earth"}"#).await;
    mount_body(mock_server, "/apps/solar-system/images/bg.jpg", b"\xff\xd8\xff".to_vec()).await;
    mount_body(secondary, "/textures/moon.jpg", b"moon".to_vec()).await;
}

/// `127.0.0.1:<port>` of a mock server.
fn netloc_of(mock_server: &MockServer) -> String {
    mock_server.address().to_string()
}

#[tokio::test]
async fn test_full_mirror_run_against_mock_site() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let secondary = MockServer::start().await;
    mount_site(&mock_server, &secondary).await;
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let config = config_for(&mock_server, root);
    let progress = Arc::new(MirrorProgress::hidden());

    let outcome = run_mirror(
        &config,
        &HttpClient::new(config.timeout).unwrap(),
        &progress,
        &Interrupt::new(),
    )
    .await
    .unwrap();

    assert!(!outcome.interrupted);
    assert!(outcome.config_written);
    assert_eq!(outcome.unique_assets, 4);
    assert_eq!(outcome.dispatch.completed, 4);

    assert_eq!(std::fs::read_to_string(root.join("index.html")).unwrap(), "/* index.html */");
    assert_eq!(
        std::fs::read(root.join("assets/static/foo.png")).unwrap(),
        b"\x89PNG\r\n"
    );
    assert!(root.join("server/spice/earth.json").is_file());
    assert!(root.join("apps/solar-system/images/bg.jpg").is_file());
    assert!(root.join("assets/default/fonts/Metropolis-SemiBold.woff").is_file());
    assert_eq!(
        std::fs::read(root.join("config.local.js")).unwrap(),
        LOCAL_CONFIG_CONTENTS.as_bytes()
    );
    assert_eq!(
        std::fs::read(
            root.join("external")
                .join(netloc_of(&secondary))
                .join("textures/moon.jpg")
        )
        .unwrap(),
        b"moon"
    );
    assert!(!root.join("textures").exists());

    let expected_total = MAIN_FILES.len() + FAVICON_FILES.len() + PRELOADED_ASSETS.len() + 4;
    let snapshot = progress.snapshot();
    assert_eq!(snapshot.total, expected_total);
    assert_eq!(snapshot.errors, FAVICON_FILES.len());
    assert_eq!(snapshot.downloaded, expected_total - FAVICON_FILES.len());
    assert!(
        progress
            .failures()
            .iter()
            .all(|f| f.message == "Status code 404")
    );

    let report = verify_mirror(root, ESSENTIAL_FILES, progress.failures());
    assert!(report.missing.is_empty(), "missing: {:?}", report.missing);
    assert_eq!(report.failures.len(), FAVICON_FILES.len());
}

#[tokio::test]
async fn test_second_run_is_byte_identical() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let secondary = MockServer::start().await;
    mount_site(&mock_server, &secondary).await;
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let config = config_for(&mock_server, root);
    let client = HttpClient::new(config.timeout).unwrap();
    let checked = ["index.html", "app.js", "assets/static/foo.png", "config.local.js"];

    run_mirror(&config, &client, &Arc::new(MirrorProgress::hidden()), &Interrupt::new())
        .await
        .unwrap();
    let first: Vec<Vec<u8>> = checked
        .iter()
        .map(|p| std::fs::read(root.join(p)).unwrap())
        .collect();

    run_mirror(&config, &client, &Arc::new(MirrorProgress::hidden()), &Interrupt::new())
        .await
        .unwrap();
    let second: Vec<Vec<u8>> = checked
        .iter()
        .map(|p| std::fs::read(root.join(p)).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unreachable_site_still_reports_every_essential_file() {
    let temp_dir = TempDir::new().unwrap();
    let site = SiteProfile::new("http://127.0.0.1:9/apps/solar-system/", "127.0.0.1").unwrap();
    let config = MirrorConfig::new(site).with_output_dir(temp_dir.path());
    let progress = Arc::new(MirrorProgress::hidden());

    let outcome = run_mirror(
        &config,
        &HttpClient::new(Duration::from_secs(5)).unwrap(),
        &progress,
        &Interrupt::new(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.unique_assets, 0);
    assert!(outcome.config_written);
    let seeds = MAIN_FILES.len() + FAVICON_FILES.len() + PRELOADED_ASSETS.len();
    assert_eq!(progress.snapshot().errors, seeds);

    let report = verify_mirror(temp_dir.path(), ESSENTIAL_FILES, progress.failures());
    // Only the locally written config survives.
    assert_eq!(report.missing.len(), ESSENTIAL_FILES.len() - 1);
}

#[tokio::test]
async fn test_interrupt_stops_run_without_writing_local_config() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"slow".to_vec())
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&mock_server, temp_dir.path());
    let interrupt = Arc::new(Interrupt::new());

    let trigger = {
        let interrupt = Arc::clone(&interrupt);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            interrupt.trigger();
        })
    };

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        run_mirror(
            &config,
            &HttpClient::new(config.timeout).unwrap(),
            &Arc::new(MirrorProgress::hidden()),
            &interrupt,
        ),
    )
    .await
    .expect("interrupt should end the run promptly")
    .unwrap();
    trigger.await.unwrap();

    assert!(outcome.interrupted);
    assert!(!outcome.config_written);
    assert!(!temp_dir.path().join("config.local.js").exists());
    assert!(!temp_dir.path().join("index.html").exists());
}

#[tokio::test]
async fn test_interrupt_mid_seed_body_leaves_no_truncated_essential_file() {
    let Some(server) = start_stalled_body_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let site = SiteProfile::new(&format!("{server}{APP_PATH}"), "127.0.0.1").unwrap();
    let config = MirrorConfig::new(site).with_output_dir(root);
    let progress = Arc::new(MirrorProgress::hidden());
    let interrupt = Arc::new(Interrupt::new());

    let trigger = {
        let interrupt = Arc::clone(&interrupt);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            interrupt.trigger();
        })
    };

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        run_mirror(
            &config,
            &HttpClient::new(config.timeout).unwrap(),
            &progress,
            &interrupt,
        ),
    )
    .await
    .expect("interrupt should end the run promptly")
    .unwrap();
    trigger.await.unwrap();

    assert!(outcome.interrupted);
    assert!(!root.join("index.html").exists());

    let report = verify_mirror(root, ESSENTIAL_FILES, progress.failures());
    assert!(report.missing.contains(&PathBuf::from("index.html")));
}
