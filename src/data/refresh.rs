//! TEPCat download and cache refresh.
//!
//! The two tables are served as plain text with the same column layout as the
//! local cache files. A refresh first probes the host with a short timeout; if
//! it answers, both tables are downloaded and only then written over the
//! cache, byte for byte. Any network failure falls back to whatever is
//! already cached.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::error::CatalogueError;

const PROBE_URL: &str = "https://www.astro.keele.ac.uk/jkt/tepcat/";
const OBSERVABLES_URL: &str = "https://www.astro.keele.ac.uk/jkt/tepcat/observables.txt";
const PHYSICAL_URL: &str = "https://www.astro.keele.ac.uk/jkt/tepcat/allplanets-ascii.txt";

const PROBE_TIMEOUT: Duration = Duration::from_secs(1);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Which of the two remote tables to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteTable {
    Observables,
    Physical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrls {
    pub probe: String,
    pub observables: String,
    pub physical: String,
}

impl Default for SourceUrls {
    fn default() -> Self {
        Self {
            probe: PROBE_URL.to_string(),
            observables: OBSERVABLES_URL.to_string(),
            physical: PHYSICAL_URL.to_string(),
        }
    }
}

impl SourceUrls {
    /// Defaults, overridden by `TEPCAT_PROBE_URL`, `TEPCAT_OBSERVABLES_URL`
    /// and `TEPCAT_PHYSICAL_URL` when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str, fallback: String| std::env::var(key).unwrap_or(fallback);
        Self {
            probe: var("TEPCAT_PROBE_URL", defaults.probe),
            observables: var("TEPCAT_OBSERVABLES_URL", defaults.observables),
            physical: var("TEPCAT_PHYSICAL_URL", defaults.physical),
        }
    }

    pub fn url(&self, table: RemoteTable) -> &str {
        match table {
            RemoteTable::Observables => &self.observables,
            RemoteTable::Physical => &self.physical,
        }
    }
}

/// Somewhere the two catalogue tables can be fetched from.
pub trait TableSource {
    /// Cheap reachability check; must not block for long.
    fn is_reachable(&self) -> bool;

    /// Fetch one table verbatim.
    fn fetch(&self, table: RemoteTable) -> Result<Vec<u8>, CatalogueError>;
}

/// HTTP client for the TEPCat web pages.
pub struct TepcatClient {
    client: Client,
    urls: SourceUrls,
}

impl TepcatClient {
    pub fn new(urls: SourceUrls) -> Result<Self, CatalogueError> {
        let client = Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| CatalogueError::Fetch(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client, urls })
    }

    pub fn from_env() -> Result<Self, CatalogueError> {
        Self::new(SourceUrls::from_env())
    }
}

impl TableSource for TepcatClient {
    fn is_reachable(&self) -> bool {
        self.client
            .head(&self.urls.probe)
            .timeout(PROBE_TIMEOUT)
            .send()
            .is_ok()
    }

    fn fetch(&self, table: RemoteTable) -> Result<Vec<u8>, CatalogueError> {
        let url = self.urls.url(table);
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| CatalogueError::Fetch(format!("request to {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(CatalogueError::Fetch(format!(
                "request to {url} failed with status {}",
                resp.status()
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| CatalogueError::Fetch(format!("failed to read body from {url}: {e}")))?;
        Ok(body.to_vec())
    }
}

/// Local cache file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    pub observables: PathBuf,
    pub physical: PathBuf,
}

/// How the cache ended up being populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Both tables were downloaded and written.
    Downloaded,
    /// No refresh requested; cache used as is.
    NotRequested,
    /// Probe failed; cache used as is.
    Unreachable,
    /// Probe succeeded but a download failed; cache used as is.
    FetchFailed,
}

impl RefreshOutcome {
    pub fn describe(self) -> &'static str {
        match self {
            RefreshOutcome::Downloaded => "downloaded latest tables",
            RefreshOutcome::NotRequested => "using cached tables",
            RefreshOutcome::Unreachable => "remote unreachable, using cached tables",
            RefreshOutcome::FetchFailed => "download failed, using cached tables",
        }
    }
}

/// Optionally refresh the cache, then require that both cache files exist.
pub fn refresh_cache<S: TableSource + ?Sized>(
    source: &S,
    paths: &CachePaths,
    requested: bool,
) -> Result<RefreshOutcome, CatalogueError> {
    let outcome = if !requested {
        RefreshOutcome::NotRequested
    } else if !source.is_reachable() {
        warn!("catalogue host unreachable; falling back to cached tables");
        RefreshOutcome::Unreachable
    } else {
        match download_both(source) {
            Ok((observables, physical)) => {
                write_cache(paths, &observables, &physical)?;
                info!(
                    observables = %paths.observables.display(),
                    physical = %paths.physical.display(),
                    "catalogue cache refreshed"
                );
                RefreshOutcome::Downloaded
            }
            Err(err) => {
                warn!(error = %err, "falling back to cached tables");
                RefreshOutcome::FetchFailed
            }
        }
    };

    ensure_cached(paths)?;
    Ok(outcome)
}

fn download_both<S: TableSource + ?Sized>(source: &S) -> Result<(Vec<u8>, Vec<u8>), CatalogueError> {
    let observables = source.fetch(RemoteTable::Observables)?;
    let physical = source.fetch(RemoteTable::Physical)?;
    Ok((observables, physical))
}

/// Stage both tables next to their targets, then rename them into place.
///
/// A failed write leaves both cache files untouched and removes any staged file.
fn write_cache(paths: &CachePaths, observables: &[u8], physical: &[u8]) -> Result<(), CatalogueError> {
    let staged = [
        (&paths.observables, partial_path(&paths.observables), observables),
        (&paths.physical, partial_path(&paths.physical), physical),
    ];

    for (_, part, bytes) in &staged {
        if let Err(err) = stage(part, bytes) {
            discard(&staged);
            return Err(err);
        }
    }
    for (target, part, _) in &staged {
        if let Err(err) = std::fs::rename(part, target) {
            discard(&staged);
            return Err(CatalogueError::io(target.as_path(), err));
        }
    }
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn stage(part: &Path, bytes: &[u8]) -> Result<(), CatalogueError> {
    if let Some(parent) = part.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CatalogueError::io(parent, e))?;
    }
    std::fs::write(part, bytes).map_err(|e| CatalogueError::io(part, e))
}

fn discard(staged: &[(&PathBuf, PathBuf, &[u8])]) {
    for (_, part, _) in staged {
        if part.is_file() {
            let _ = std::fs::remove_file(part);
        }
    }
}

/// Require that both cache files exist.
pub fn ensure_cached(paths: &CachePaths) -> Result<(), CatalogueError> {
    for path in [&paths.observables, &paths.physical] {
        if !path.is_file() {
            return Err(CatalogueError::MissingCatalogue(path.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeSource {
        reachable: bool,
        fail_physical: bool,
        fetches: Cell<usize>,
    }

    impl FakeSource {
        fn new(reachable: bool, fail_physical: bool) -> Self {
            Self {
                reachable,
                fail_physical,
                fetches: Cell::new(0),
            }
        }
    }

    impl TableSource for FakeSource {
        fn is_reachable(&self) -> bool {
            self.reachable
        }

        fn fetch(&self, table: RemoteTable) -> Result<Vec<u8>, CatalogueError> {
            self.fetches.set(self.fetches.get() + 1);
            match table {
                RemoteTable::Observables => Ok(b"remote observables\n".to_vec()),
                RemoteTable::Physical if self.fail_physical => Err(CatalogueError::Fetch("timeout".into())),
                RemoteTable::Physical => Ok(b"remote physical\n".to_vec()),
            }
        }
    }

    fn paths(dir: &Path) -> CachePaths {
        CachePaths {
            observables: dir.join("tepcat1.txt"),
            physical: dir.join("tepcat2.txt"),
        }
    }

    fn seed_cache(p: &CachePaths) {
        std::fs::write(&p.observables, "cached observables\n").unwrap();
        std::fs::write(&p.physical, "cached physical\n").unwrap();
    }

    #[test]
    fn downloads_overwrite_cache_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let p = paths(dir.path());
        seed_cache(&p);

        let outcome = refresh_cache(&FakeSource::new(true, false), &p, true).unwrap();
        assert_eq!(outcome, RefreshOutcome::Downloaded);
        assert_eq!(std::fs::read(&p.observables).unwrap(), b"remote observables\n");
        assert_eq!(std::fs::read(&p.physical).unwrap(), b"remote physical\n");
    }

    #[test]
    fn not_requested_never_touches_network() {
        let dir = tempfile::tempdir().unwrap();
        let p = paths(dir.path());
        seed_cache(&p);

        let source = FakeSource::new(true, false);
        assert_eq!(refresh_cache(&source, &p, false).unwrap(), RefreshOutcome::NotRequested);
        assert_eq!(source.fetches.get(), 0);
        assert_eq!(std::fs::read_to_string(&p.physical).unwrap(), "cached physical\n");
    }

    #[test]
    fn unreachable_falls_back_to_cache() {
        let dir = tempfile::tempdir().unwrap();
        let p = paths(dir.path());
        seed_cache(&p);

        let source = FakeSource::new(false, false);
        assert_eq!(refresh_cache(&source, &p, true).unwrap(), RefreshOutcome::Unreachable);
        assert_eq!(source.fetches.get(), 0);
    }

    #[test]
    fn partial_download_leaves_cache_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let p = paths(dir.path());
        seed_cache(&p);

        let outcome = refresh_cache(&FakeSource::new(true, true), &p, true).unwrap();
        assert_eq!(outcome, RefreshOutcome::FetchFailed);
        assert_eq!(std::fs::read_to_string(&p.observables).unwrap(), "cached observables\n");
    }

    #[test]
    fn missing_cache_without_network_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let p = paths(dir.path());

        let err = refresh_cache(&FakeSource::new(false, false), &p, true).unwrap_err();
        assert!(matches!(err, CatalogueError::MissingCatalogue(ref path) if path == &p.observables));
    }

    #[test]
    fn failed_physical_write_keeps_observables_cache() {
        let dir = tempfile::tempdir().unwrap();
        let p = paths(dir.path());
        seed_cache(&p);
        // A directory in the staging slot makes the physical write fail.
        std::fs::create_dir(dir.path().join("tepcat2.txt.part")).unwrap();

        let err = refresh_cache(&FakeSource::new(true, false), &p, true).unwrap_err();
        assert!(matches!(err, CatalogueError::Io { .. }));
        assert_eq!(std::fs::read_to_string(&p.observables).unwrap(), "cached observables\n");
        assert_eq!(std::fs::read_to_string(&p.physical).unwrap(), "cached physical\n");
        assert!(!dir.path().join("tepcat1.txt.part").exists());
    }

    #[test]
    fn successful_refresh_leaves_no_staged_files() {
        let dir = tempfile::tempdir().unwrap();
        let p = paths(dir.path());
        seed_cache(&p);

        refresh_cache(&FakeSource::new(true, false), &p, true).unwrap();
        assert!(!dir.path().join("tepcat1.txt.part").exists());
        assert!(!dir.path().join("tepcat2.txt.part").exists());
    }

    #[test]
    fn download_creates_missing_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let p = paths(&dir.path().join("cache"));

        let outcome = refresh_cache(&FakeSource::new(true, false), &p, true).unwrap();
        assert_eq!(outcome, RefreshOutcome::Downloaded);
        assert!(p.physical.is_file());
    }
}
