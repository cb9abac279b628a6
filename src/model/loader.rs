//! Model location, downloading and loading utilities.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use ort::session::Session;

use crate::error::{Error, Result};

use super::SessionOptions;

/// Model file looked up in the working directory when no path is given.
pub const DEFAULT_MODEL_FILE: &str = "model.onnx";

/// Filename of the cached model zoo export.
const MODEL_ZOO_FILE: &str = "mnist-8.onnx";

/// Download URL of the ONNX model zoo MNIST classifier (opset 8).
const MODEL_ZOO_URL: &str =
    "https://github.com/onnx/models/raw/main/validated/vision/classification/mnist/model/mnist-8.onnx";

/// Approximate size of the model zoo file in bytes, for progress indication.
const MODEL_ZOO_APPROX_SIZE: u64 = 26_454;

/// Where the model used for a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A path given explicitly by the caller.
    Explicit(PathBuf),
    /// `model.onnx` in the working directory.
    WorkingDir(PathBuf),
    /// The model zoo export in the cache directory.
    Cached(PathBuf),
}

impl ModelSource {
    /// Resolve the model file for a run.
    ///
    /// Lookup order:
    /// 1. `explicit`, which must exist
    /// 2. `model.onnx` in the working directory
    /// 3. The cached model zoo export, downloaded if absent and `allow_download` is set
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFound`] if no model file is available, or a download
    /// error if fetching the model fails.
    pub fn resolve(explicit: Option<&Path>, allow_download: bool) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::ModelNotFound {
                    path: path.to_path_buf(),
                });
            }
            return Ok(Self::Explicit(path.to_path_buf()));
        }

        let local = PathBuf::from(DEFAULT_MODEL_FILE);
        if local.is_file() {
            return Ok(Self::WorkingDir(local));
        }

        let cache = ModelCache::new()?;
        cache.get_model_path(allow_download).map(Self::Cached)
    }

    /// Path of the model file.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(path) | Self::WorkingDir(path) | Self::Cached(path) => path,
        }
    }
}

/// Manages the model cache directory and downloads.
pub struct ModelCache {
    cache_dir: PathBuf,
}

impl ModelCache {
    /// Create a new model cache.
    ///
    /// Uses the platform-appropriate cache directory:
    /// - Windows: `%LOCALAPPDATA%\mnist-ort\models`
    /// - Linux: `~/.cache/mnist-ort/models`
    /// - macOS: `~/Library/Caches/mnist-ort/models`
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub fn new() -> Result<Self> {
        let base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_dir(base.join("mnist-ort").join("models"))
    }

    /// Create a cache rooted at a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_dir(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir).map_err(|source| Error::CacheDir {
            path: cache_dir.clone(),
            source,
        })?;

        Ok(Self { cache_dir })
    }

    /// Get the path to the cached model, downloading it if allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is missing and cannot be downloaded.
    pub fn get_model_path(&self, allow_download: bool) -> Result<PathBuf> {
        let path = self.cache_dir.join(MODEL_ZOO_FILE);

        if !path.exists() {
            if !allow_download {
                return Err(Error::ModelNotFound { path });
            }
            download_file(MODEL_ZOO_URL, &path, MODEL_ZOO_FILE, MODEL_ZOO_APPROX_SIZE)?;
        }

        Ok(path)
    }
}

/// Load an ONNX model session.
///
/// # Errors
///
/// Returns an error if the model cannot be loaded.
pub fn load_session(path: &Path, options: &SessionOptions) -> Result<Session> {
    let model_load = |source: ort::Error| Error::ModelLoad {
        path: path.to_path_buf(),
        source,
    };

    let builder = Session::builder().map_err(model_load)?;
    options
        .apply(builder)
        .map_err(model_load)?
        .commit_from_file(path)
        .map_err(model_load)
}

/// Download a file from a URL to a path with progress indication.
#[allow(clippy::cast_possible_truncation)]
fn download_file(url: &str, path: &Path, name: &str, approx_size: u64) -> Result<()> {
    tracing::info!("Downloading {name} from {url}");

    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|source| Error::ModelDownload {
            name: name.to_string(),
            source,
        })?;

    let total_size = response.content_length().unwrap_or(approx_size);

    let pb = ProgressBar::new(total_size);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(format!("Downloading {name}"));

    // Write to a temporary file first, then rename for atomicity
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;

    let mut downloaded = 0u64;
    let mut reader = response;

    loop {
        let mut buffer = [0u8; 8192];
        let bytes_read = std::io::Read::read(&mut reader, &mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])?;
        downloaded += bytes_read as u64;
        pb.set_position(downloaded);
    }
    file.sync_all()?;

    pb.finish_with_message(format!("Downloaded {name}"));

    fs::rename(&temp_path, path)?;

    Ok(())
}
