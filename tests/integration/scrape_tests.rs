use crate::common::{mount_first_page, mount_page, results_page, search_request, test_config};
use finish_times::category::{CategoryKey, Sex};
use finish_times::crawler::{run_scrape, Coordinator};
use finish_times::{FinishTimesError, ScrapeError};
use tempfile::TempDir;
use wiremock::{MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_scrape_two_categories() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create cache dir");

    // Men: three pages. Page 1 is requested once without a page number; the
    // explicit PAGEN_1=1 request is served from cache and never sent.
    mount_page(
        &mock_server,
        "M",
        2,
        results_page(&["0:41:00", "42:30"], Some(3)),
    )
    .await;
    mount_page(&mock_server, "M", 3, results_page(&["0:45:10"], Some(3))).await;
    mount_first_page(
        &mock_server,
        "M",
        results_page(&["0:35:12", "0:38:40"], Some(3)),
    )
    .await;

    // Women: a single page whose End link points at itself.
    mount_first_page(
        &mock_server,
        "W",
        results_page(&["0:44:00", "0:47:59"], Some(1)),
    )
    .await;

    let config = test_config(
        &mock_server.uri(),
        cache_dir.path(),
        vec![Sex::Men, Sex::Women],
    );
    let times = run_scrape(&config, false).await.expect("Scrape failed");

    let men = CategoryKey::new(2019, 10, Sex::Men);
    let women = CategoryKey::new(2019, 10, Sex::Women);
    assert_eq!(times.len(), 2);
    assert_eq!(
        times[&men],
        vec!["0:35:12", "0:38:40", "0:41:00", "00:42:30", "0:45:10"]
    );
    assert_eq!(times[&women], vec!["0:44:00", "0:47:59"]);

    for key in ["2019-10-M-1", "2019-10-M-2", "2019-10-M-3", "2019-10-W-1"] {
        let cached = cache_dir.path().join(format!("index.{}.html", key));
        assert!(cached.exists(), "missing cache file for {}", key);
    }

    // Wiremock verifies every `expect(1)` when mock_server drops
}

#[tokio::test]
async fn test_second_run_uses_cache_only() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create cache dir");

    mount_page(&mock_server, "W", 2, results_page(&["1:10:00"], Some(2))).await;
    mount_first_page(&mock_server, "W", results_page(&["1:05:00"], Some(2))).await;

    let config = test_config(&mock_server.uri(), cache_dir.path(), vec![Sex::Women]);

    let first = run_scrape(&config, false).await.expect("First scrape failed");
    let requests_after_first = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled")
        .len();
    assert_eq!(requests_after_first, 2);

    let second = run_scrape(&config, false).await.expect("Second scrape failed");
    let requests_after_second = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled")
        .len();

    assert_eq!(first, second);
    assert_eq!(requests_after_second, requests_after_first);
}

#[tokio::test]
async fn test_cached_page_returned_verbatim() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create cache dir");
    let config = test_config(&mock_server.uri(), cache_dir.path(), vec![Sex::Men]);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");

    let page = results_page(&["0:59:59"], Some(1));
    coordinator
        .cache()
        .put("2019-10-M-1", &page)
        .await
        .expect("Failed to seed cache");

    let pages = coordinator
        .load_category(&CategoryKey::new(2019, 10, Sex::Men))
        .await
        .expect("Load failed");

    assert_eq!(pages, vec![page]);
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "expected no requests, got {}", requests.len());
}

#[tokio::test]
async fn test_refresh_refetches_cached_pages() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create cache dir");
    let config = test_config(&mock_server.uri(), cache_dir.path(), vec![Sex::Men]);

    // Stale copy in the cache
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    coordinator
        .cache()
        .put("2019-10-M-1", &results_page(&["2:00:00"], Some(1)))
        .await
        .expect("Failed to seed cache");

    mount_first_page(&mock_server, "M", results_page(&["1:30:00"], Some(1))).await;

    let times = run_scrape(&config, true).await.expect("Scrape failed");
    assert_eq!(
        times[&CategoryKey::new(2019, 10, Sex::Men)],
        vec!["1:30:00"]
    );
}

#[tokio::test]
async fn test_missing_pagination_is_parse_error() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create cache dir");

    mount_first_page(&mock_server, "M", results_page(&[], None)).await;

    let config = test_config(&mock_server.uri(), cache_dir.path(), vec![Sex::Men]);
    match run_scrape(&config, false).await {
        Err(FinishTimesError::Parse { key, source }) => {
            assert_eq!(key, "2019-10-M-1");
            assert_eq!(source, ScrapeError::MissingElement("pagination block"));
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_aborts_run() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create cache dir");

    search_request("M")
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), cache_dir.path(), vec![Sex::Men]);
    let result = run_scrape(&config, false).await;

    assert!(
        matches!(result, Err(FinishTimesError::Network { .. })),
        "expected network error, got {:?}",
        result
    );
    assert!(!cache_dir.path().join("index.2019-10-M-1.html").exists());
}

#[tokio::test]
async fn test_missing_charset_is_decode_error() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create cache dir");

    search_request("M")
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(results_page(&[], Some(1)), "text/html"),
        )
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), cache_dir.path(), vec![Sex::Men]);
    let result = run_scrape(&config, false).await;

    assert!(
        matches!(result, Err(FinishTimesError::Decode { .. })),
        "expected decode error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_windows_1251_page_is_decoded() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create cache dir");

    let page = results_page(&["1:01:01"], Some(1));
    let (encoded, _, had_errors) = encoding_rs::WINDOWS_1251.encode(&page);
    assert!(!had_errors);

    search_request("W")
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(encoded.into_owned(), "text/html; charset=windows-1251"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), cache_dir.path(), vec![Sex::Women]);
    let times = run_scrape(&config, false).await.expect("Scrape failed");

    assert_eq!(
        times[&CategoryKey::new(2019, 10, Sex::Women)],
        vec!["1:01:01"]
    );

    // The cache holds decoded text
    let cached = std::fs::read_to_string(cache_dir.path().join("index.2019-10-W-1.html"))
        .expect("Missing cache file");
    assert_eq!(cached, page);
}

#[tokio::test]
async fn test_unwritable_cache_aborts_run() {
    let mock_server = MockServer::start().await;
    let work_dir = TempDir::new().expect("Failed to create work dir");
    let cache_path = work_dir.path().join("cache");
    std::fs::write(&cache_path, "not a directory").expect("Failed to create file");

    let config = test_config(&mock_server.uri(), &cache_path, vec![Sex::Men]);
    match run_scrape(&config, false).await {
        Err(FinishTimesError::Filesystem { path, .. }) => {
            assert!(path.starts_with(&cache_path), "unexpected path {}", path.display());
        }
        other => panic!("expected filesystem error, got {:?}", other),
    }
}
