//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from fetching to exporting.

use std::sync::Arc;
use std::time::Duration;
use sumi_harvest::config::UserAgentConfig;
use sumi_harvest::repository::ElasticSearchIndex;
use sumi_harvest::sitemap::Sitemap;
use sumi_harvest::{
    CrawlError, CrawlStrategy, ElasticSearchRepository, GraphCrawl, HttpPageFetcher,
    IgnoredPatterns, InMemoryRepository, JsonFilesRepository, PageSnapshot, RetriableCrawl,
    SitemapCrawl, StagingRepository, SwitchableCrawl,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fetch session with a test user agent
fn create_test_fetcher() -> Arc<HttpPageFetcher> {
    let config = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };
    Arc::new(
        HttpPageFetcher::from_config(&config, Duration::from_secs(5))
            .expect("Failed to build HTTP client"),
    )
}

/// Mounts an HTML page on the mock server
async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts a small blog: index -> about, blog; blog -> post, about; plus a PDF
async fn mount_site(server: &MockServer) {
    let base = server.uri();

    mount_page(
        server,
        "/",
        format!(
            r#"<html><head><title>Home | Blog</title></head><body>
            <h1>Welcome</h1>
            <a href="{0}/about">About</a>
            <a href="/blog">Blog</a>
            <a href="/files/report.pdf">Report</a>
            <a href="https://elsewhere.org/">Elsewhere</a>
            <a href="mailto:me@example.com">Mail</a>
            </body></html>"#,
            base
        ),
    )
    .await;

    mount_page(
        server,
        "/about",
        r#"<html><head><title>About</title></head><body>
        <p>About this blog</p><a href="/">Home</a></body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/blog",
        r#"<html><head><title>Blog</title></head><body>
        <div id="pagectg">news</div>
        <a href="/blog/2016/04/post.html">Post</a>
        <a href="/about#team">Team</a></body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/blog/2016/04/post.html",
        r#"<html><head><title>Post</title><script>var x = 1;</script></head>
        <body><p>Hello   world</p><a href="/blog">Back</a></body></html>"#
            .to_string(),
    )
    .await;
}

fn titles(pages: &[PageSnapshot]) -> Vec<&str> {
    pages.iter().map(PageSnapshot::title).collect()
}

#[tokio::test]
async fn test_full_graph_crawl_to_memory() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let fetcher = create_test_fetcher();
    let repo = Arc::new(InMemoryRepository::new());
    let crawl = GraphCrawl::new(
        server.uri(),
        fetcher.clone(),
        IgnoredPatterns::new(["*.pdf"]),
        repo.clone(),
        2,
    );

    let report = crawl.crawl().await.expect("Crawl failed");

    let pages = repo.pages();
    assert_eq!(titles(&pages), vec!["Home | Blog", "About", "Blog", "Post"]);
    assert_eq!(report.pages_crawled, 4);
    assert_eq!(report.pages_ignored, 1);
    assert_eq!(report.batches_exported, 2);

    let index = &pages[0];
    assert_eq!(index.name(), "index");
    assert!(index.text_content().contains("Welcome"));
    assert!(index
        .links()
        .iter()
        .all(|link| link.href().starts_with(&server.uri())));

    let blog = &pages[2];
    assert_eq!(blog.category(), "news");

    let post = &pages[3];
    assert_eq!(post.name(), "post.html");
    assert!(post.text_content().contains("Hello world"));
    assert!(!post.text_content().contains("var x"));

    // the PDF was never requested
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| !r.url.path().ends_with(".pdf")));
}

#[tokio::test]
async fn test_graph_crawl_to_json_files() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();

    let repo = Arc::new(JsonFilesRepository::new(dir.path()));
    let crawl = GraphCrawl::new(
        server.uri(),
        create_test_fetcher(),
        IgnoredPatterns::new(["*.pdf"]),
        repo,
        10,
    );

    crawl.crawl().await.expect("Crawl failed");

    for name in ["index", "about", "blog", "post.html"] {
        let file = dir.path().join(format!("{}.json", name));
        let content = std::fs::read_to_string(&file)
            .unwrap_or_else(|_| panic!("{} was not written", file.display()));
        let page: PageSnapshot = serde_json::from_str(&content).unwrap();
        assert_eq!(page.name(), name);
    }
}

#[tokio::test]
async fn test_graph_crawl_to_elasticsearch() {
    let site = MockServer::start().await;
    mount_site(&site).await;

    let es = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pages/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"took":2,"errors":false}"#))
        .expect(2)
        .mount(&es)
        .await;

    let address = es.address();
    let repo = Arc::new(ElasticSearchRepository::new(ElasticSearchIndex::new(
        address.ip().to_string(),
        address.port(),
        "pages",
    )));
    let crawl = GraphCrawl::new(
        site.uri(),
        create_test_fetcher(),
        IgnoredPatterns::new(["*.pdf"]),
        repo,
        3,
    );

    crawl.crawl().await.expect("Crawl failed");

    let requests = es.received_requests().await.unwrap();
    let lines: usize = requests
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).lines().count())
        .sum();
    assert_eq!(lines, 8);
}

#[tokio::test]
async fn test_online_sitemap_crawl() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{0}/blog</loc></url>
  <url><loc>{0}/about</loc></url>
  <url><loc>{0}/about/</loc></url>
</urlset>"#,
            base
        )))
        .mount(&server)
        .await;

    let sitemap = Sitemap::from_url(&reqwest::Client::new(), &format!("{}/sitemap.xml", base))
        .await
        .expect("Sitemap failed to load");
    assert_eq!(sitemap.len(), 2);

    let repo = Arc::new(InMemoryRepository::new());
    let crawl = SitemapCrawl::new(
        sitemap,
        create_test_fetcher(),
        IgnoredPatterns::default(),
        repo.clone(),
        10,
    );

    let report = crawl.crawl().await.expect("Crawl failed");

    assert_eq!(report.pages_crawled, 2);
    assert_eq!(titles(&repo.pages()), vec!["Blog", "About"]);
}

#[tokio::test]
async fn test_retry_then_fail_over() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/about",
        "<html><head><title>About</title></head><body>About</body></html>".to_string(),
    )
    .await;

    let repo = Arc::new(InMemoryRepository::new());
    let staging = Arc::new(StagingRepository::new(repo.clone()));
    let graph = GraphCrawl::new(
        base.as_str(),
        create_test_fetcher(),
        IgnoredPatterns::default(),
        staging.clone(),
        10,
    );
    let sitemap = Sitemap::new([sumi_harvest::sitemap::SitemapUrl::new(format!("{}/about", base))]);
    let failsafe = SitemapCrawl::new(
        sitemap,
        create_test_fetcher(),
        IgnoredPatterns::default(),
        repo.clone(),
        10,
    );
    let crawl = SwitchableCrawl::new(
        Box::new(RetriableCrawl::with_trials(Box::new(graph), 2)),
        Box::new(failsafe),
        staging,
    );

    let report = crawl.crawl().await.expect("Failsafe crawl failed");

    assert_eq!(report.pages_crawled, 1);
    assert_eq!(titles(&repo.pages()), vec!["About"]);
    let index_hits = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/")
        .count();
    assert_eq!(index_hits, 2);
}

#[tokio::test]
async fn test_unreachable_site_is_a_fetch_fault() {
    let repo = Arc::new(InMemoryRepository::new());
    let crawl = RetriableCrawl::with_trials(
        Box::new(GraphCrawl::new(
            "http://127.0.0.1:9",
            create_test_fetcher(),
            IgnoredPatterns::default(),
            repo.clone(),
            10,
        )),
        2,
    );

    let result = crawl.crawl().await;

    assert!(matches!(result, Err(CrawlError::Fetch(_))));
    assert_eq!(repo.export_calls(), 0);
}
