use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("no model cache directory available on this platform")]
    CacheDirUnavailable,
    #[error("failed to prepare cache directory {path}: {source}")]
    CachePrepare {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to store model at {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Called with `(bytes_so_far, total_bytes)` as the download advances;
/// `total_bytes` is 0 when the server did not announce a length.
pub type ProgressFn = Box<dyn FnMut(u64, u64) + Send>;

/// Locate the cascade artifact by name, fetching it only as a last resort.
///
/// This is the one-time classifier provisioning step; it must finish before
/// any frame is processed. A previously cached copy wins, then a bundled
/// copy shipped next to the binary, and only then the network.
pub fn resolve(
    name: &str,
    url: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cache_dir = model_cache_dir()?;
    let local = [Some(cache_dir.join(name)), bundled_dir.map(|d| d.join(name))];
    for candidate in local.into_iter().flatten() {
        if candidate.is_file() {
            log::debug!("using cascade model at {}", candidate.display());
            return Ok(candidate);
        }
    }

    fs::create_dir_all(&cache_dir).map_err(|e| ModelResolveError::CachePrepare {
        path: cache_dir.clone(),
        source: e,
    })?;
    let dest = cache_dir.join(name);
    log::info!("fetching cascade model {name} from {url}");
    fetch_to(url, &dest, progress)?;
    Ok(dest)
}

/// Per-user model cache directory (`FacePreview/models` under the platform's
/// cache location; the data directory on macOS).
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    let base = if cfg!(target_os = "macos") {
        dirs::data_dir()
    } else {
        dirs::cache_dir()
    };
    base.map(|d| d.join("FacePreview").join("models"))
        .ok_or(ModelResolveError::CacheDirUnavailable)
}

/// Streams the response body into a staging file next to `dest`, then renames
/// it into place, so `dest` only ever holds a complete artifact.
fn fetch_to(
    url: &str,
    dest: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), ModelResolveError> {
    let fetch_err = |e: reqwest::Error| ModelResolveError::Fetch {
        url: url.to_string(),
        source: e,
    };
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(fetch_err)?;
    let total = response.content_length().unwrap_or(0);

    let staging = dest.with_extension("download");
    let file = File::create(&staging).map_err(|e| ModelResolveError::Store {
        path: staging.clone(),
        source: e,
    })?;
    let mut sink = CountingWriter::new(file, total, progress);
    if let Err(e) = io::copy(&mut response, &mut sink) {
        let _ = fs::remove_file(&staging);
        return Err(ModelResolveError::Store {
            path: staging,
            source: e,
        });
    }

    fs::rename(&staging, dest).map_err(|e| ModelResolveError::Store {
        path: dest.to_path_buf(),
        source: e,
    })
}

/// `Write` adapter that counts bytes and drives the progress callback.
struct CountingWriter<W> {
    inner: W,
    written: u64,
    total: u64,
    report: Option<ProgressFn>,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W, total: u64, report: Option<ProgressFn>) -> Self {
        Self {
            inner,
            written: 0,
            total,
            report,
        }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        if let Some(report) = self.report.as_mut() {
            report(self.written, self.total);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[test]
    fn test_resolve_prefers_bundled_file_over_download() {
        let tmp = TempDir::new().unwrap();
        let bundled_dir = tmp.path().join("bundled");
        fs::create_dir_all(&bundled_dir).unwrap();
        let bundled_path = bundled_dir.join("cascade_test_model.bin");
        fs::write(&bundled_path, b"bundled model").unwrap();

        let result = resolve(
            "cascade_test_model.bin",
            "http://invalid.nonexistent.example.com/model.bin",
            Some(&bundled_dir),
            None,
        );
        // The invalid URL is never hit because the bundled file exists.
        assert_eq!(result.unwrap(), bundled_path);
    }

    #[test]
    fn test_model_cache_dir_returns_path() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains("FacePreview"));
        assert!(path.ends_with("models"));
    }

    #[test]
    fn test_fetch_invalid_url_returns_fetch_error() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.bin");
        let result = fetch_to("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(matches!(result, Err(ModelResolveError::Fetch { .. })));
    }

    #[test]
    fn test_failed_fetch_leaves_no_file_behind() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.bin");
        let _ = fetch_to("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(!dest.exists());
        assert!(!dest.with_extension("download").exists());
    }

    #[test]
    fn test_counting_writer_reports_running_totals() {
        let reports: Arc<Mutex<Vec<(u64, u64)>>> = Arc::new(Mutex::new(Vec::new()));
        let log = reports.clone();
        let mut sink = CountingWriter::new(
            Vec::new(),
            10,
            Some(Box::new(move |written, total| {
                log.lock().unwrap().push((written, total));
            })),
        );

        sink.write_all(b"hello").unwrap();
        sink.write_all(b"world").unwrap();

        assert_eq!(sink.inner, b"helloworld");
        let seen = reports.lock().unwrap();
        assert_eq!(seen.first(), Some(&(5, 10)));
        assert_eq!(seen.last(), Some(&(10, 10)));
    }

    #[test]
    fn test_counting_writer_passes_zero_total_through() {
        let reports: Arc<Mutex<Vec<(u64, u64)>>> = Arc::new(Mutex::new(Vec::new()));
        let log = reports.clone();
        let mut sink = CountingWriter::new(
            Vec::new(),
            0,
            Some(Box::new(move |written, total| {
                log.lock().unwrap().push((written, total));
            })),
        );
        sink.write_all(b"abc").unwrap();
        assert_eq!(*reports.lock().unwrap(), vec![(3, 0)]);
    }
}
