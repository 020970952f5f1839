//! Subcommand implementations.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use sweep_browser::BrowserEngine;
use sweep_core::{AppConfig, PageUrl};
use sweep_reports::ReportStore;
use sweep_scanner::{AuditScript, PageScanner, ScanOrchestrator};
use sweep_sitemap::SitemapResolver;
use tracing::{info, warn};

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load_with_env(path).context("failed to load configuration")
}

/// Build the page scanner every scan command shares.
async fn page_scanner(config: &AppConfig) -> Result<PageScanner> {
    let script = AuditScript::load(&config.audit)
        .await
        .context("failed to load audit engine")?;

    let engine = BrowserEngine::with_settings(config.browser.clone())
        .with_request_timeout(Duration::from_secs(config.scanning.navigation_timeout_secs));

    Ok(PageScanner::new(Arc::new(engine), script, ReportStore::new(&config.reports.dir))
        .with_scanning_config(&config.scanning))
}

/// `scan page <url> [output-dir]`
pub async fn scan_page(config_path: Option<&Path>, url: &str, output_dir: Option<PathBuf>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(dir) = output_dir {
        config.reports.dir = dir;
    }

    let scanner = page_scanner(&config).await?;
    let artifact = scanner
        .scan_and_persist(&PageUrl::new(url))
        .await
        .with_context(|| format!("failed to scan {url}"))?;

    println!("Saved {}", artifact.json_path.display());
    println!("Saved {}", artifact.html_path.display());
    Ok(())
}

/// `scan sitemap <ref>`: succeeds even when individual pages fail.
pub async fn scan_sitemap(
    config_path: Option<&Path>,
    sitemap: &str,
    output_dir: Option<PathBuf>,
    concurrency: Option<usize>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(dir) = output_dir {
        config.reports.dir = dir;
    }
    if let Some(n) = concurrency {
        config.scanning.concurrent_scans = n;
    }
    config.validate().context("invalid configuration")?;

    let resolver = SitemapResolver::with_config(&config.sitemap)?;
    let scanner = page_scanner(&config).await?;
    let orchestrator = ScanOrchestrator::new(resolver, Arc::new(scanner))
        .with_max_concurrent_scans(config.scanning.concurrent_scans);

    let outcomes = orchestrator
        .run(sitemap)
        .await
        .with_context(|| format!("failed to scan sitemap {sitemap}"))?;

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        warn!(failed, total = outcomes.len(), "some pages could not be scanned");
    }
    println!(
        "Scanned {} of {} pages into {}",
        outcomes.len() - failed,
        outcomes.len(),
        config.reports.dir.display()
    );
    Ok(())
}

/// `scan serve [--port N]`
pub async fn serve(config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    info!(port = config.server.port, "starting report catalog");
    sweep_catalog::serve(&config).await?;
    Ok(())
}
