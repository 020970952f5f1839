use axum::{http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use sweep_sitemap::{SitemapError, SitemapResolver, SitemapSource};
use tempfile::TempDir;

const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/</loc></url>
  <url><loc>https://example.com/pricing</loc></url>
</urlset>"#;

/// Serve a fixed sitemap and a 404 route on an ephemeral port.
async fn spawn_sitemap_server() -> SocketAddr {
    let app = Router::new()
        .route("/sitemap.xml", get(|| async { SITEMAP }))
        .route(
            "/broken.xml",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

#[tokio::test]
async fn test_resolve_local_file() {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("sitemap.xml");
    std::fs::write(&path, SITEMAP).expect("write sitemap");

    let resolver = SitemapResolver::new().expect("create resolver");
    let urls = resolver
        .resolve(path.to_str().expect("utf-8 path"))
        .await
        .expect("resolve sitemap");

    assert_eq!(urls.len(), 2);
    assert_eq!(urls[1].as_str(), "https://example.com/pricing");
}

#[tokio::test]
async fn test_missing_local_file_is_fatal() {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("missing.xml");

    let resolver = SitemapResolver::new().expect("create resolver");
    let err = resolver
        .resolve(path.to_str().expect("utf-8 path"))
        .await
        .unwrap_err();
    assert!(matches!(err, SitemapError::Read { .. }));
}

#[tokio::test]
async fn test_malformed_local_file_is_fatal() {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("sitemap.xml");
    std::fs::write(&path, "<urlset><url>").expect("write sitemap");

    let resolver = SitemapResolver::new().expect("create resolver");
    let err = resolver
        .resolve(path.to_str().expect("utf-8 path"))
        .await
        .unwrap_err();
    assert!(matches!(err, SitemapError::Parse(_)));
}

#[tokio::test]
async fn test_resolve_remote_sitemap() {
    let addr = spawn_sitemap_server().await;

    let resolver = SitemapResolver::new().expect("create resolver");
    let urls = resolver
        .resolve(&format!("http://{addr}/sitemap.xml"))
        .await
        .expect("resolve sitemap");

    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0].as_str(), "https://example.com/");
}

#[tokio::test]
async fn test_remote_error_status_is_fatal() {
    let addr = spawn_sitemap_server().await;

    let resolver = SitemapResolver::new().expect("create resolver");
    let source = SitemapSource::parse(&format!("http://{addr}/broken.xml"));
    let err = resolver.fetch(&source).await.unwrap_err();
    assert!(matches!(err, SitemapError::Fetch { .. }));
}

#[tokio::test]
async fn test_unreachable_remote_is_fatal() {
    // Bind then drop to get a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let resolver = SitemapResolver::new().expect("create resolver");
    let err = resolver
        .resolve(&format!("http://{addr}/sitemap.xml"))
        .await
        .unwrap_err();
    assert!(matches!(err, SitemapError::Fetch { .. }));
}
