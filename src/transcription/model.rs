use anyhow::{anyhow, Context, Result};
use reqwest::blocking as http;
use reqwest::redirect::Policy as RedirectPolicy;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::app_config_dir;

/// Whisper official ggml model filenames we support and their URLs/sizes.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub filename: &'static str,
    pub url: &'static str,
    pub size_bytes: u64, // approximate/declared size
    pub label: &'static str,
}

pub const SUPPORTED_MODELS: &[ModelInfo] = &[
    ModelInfo {
        filename: "ggml-tiny.bin",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-tiny.bin",
        size_bytes: 39 * 1_000_000,
        label: "Tiny (fastest, lowest accuracy)",
    },
    ModelInfo {
        filename: "ggml-base.bin",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.bin",
        size_bytes: 142 * 1_000_000,
        label: "Base (fast)",
    },
    ModelInfo {
        filename: "ggml-small.bin",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-small.bin",
        size_bytes: 465 * 1_000_000,
        label: "Small (balanced, default)",
    },
    ModelInfo {
        filename: "ggml-medium.bin",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-medium.bin",
        size_bytes: 1_500 * 1_000_000,
        label: "Medium (slow, high accuracy)",
    },
    ModelInfo {
        filename: "ggml-large-v3.bin",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-large-v3.bin",
        size_bytes: 3_095 * 1_000_000, // ~2.9GB
        label: "Large v3 (slowest, best accuracy)",
    },
];

pub const DEFAULT_MODEL_FILENAME: &str = "ggml-small.bin";

pub fn model_info_for_filename(name: &str) -> Option<&'static ModelInfo> {
    SUPPORTED_MODELS.iter().find(|m| m.filename == name)
}

/// Absolute path for a model file under the app's config dir.
pub fn default_model_path(filename: &str) -> PathBuf {
    app_config_dir().join("models").join(filename)
}

/// Auto-download the Whisper model if missing.
pub fn ensure_model(model_path: &Path) -> Result<()> {
    if model_path.exists() {
        return Ok(());
    }

    // choose URL based on filename if known, otherwise fall back to small
    let filename = model_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_MODEL_FILENAME);
    let model_info = model_info_for_filename(filename);
    let url = model_info
        .map(|m| m.url)
        .unwrap_or("https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-small.bin");

    let expected_size = model_info.map(|m| m.size_bytes).unwrap_or(0);
    let size_mb = expected_size as f64 / 1_000_000.0;

    eprintln!("===================================================");
    eprintln!("📥 First‑time Whisper model download");
    eprintln!("===================================================");
    eprintln!("File: {}", filename);
    eprintln!("Size: {:.1} MB", size_mb);
    eprintln!("Destination: {}", model_path.display());
    eprintln!("URL: {}", url);
    eprintln!("---------------------------------------------------");
    eprintln!("Downloading...");

    download_with_progress(url, model_path, |downloaded, total| {
        let percent = if total > 0 {
            (downloaded as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let downloaded_mb = downloaded as f64 / 1_000_000.0;
        let total_mb = total as f64 / 1_000_000.0;

        // Render a simple progress bar
        let bar_width = 40;
        let filled = (bar_width as f64 * percent / 100.0) as usize;
        let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);

        eprint!(
            "\r[{}] {:.1}% ({:.1}/{:.1} MB)",
            bar, percent, downloaded_mb, total_mb
        );
        std::io::stderr().flush().ok();
    })?;

    eprintln!("\n===================================================");
    eprintln!("✅ Download completed!");
    eprintln!("===================================================");

    Ok(())
}

/// Stream download with progress callback. Writes to a temp file then atomically moves.
pub fn download_with_progress<F>(url: &str, dest: &Path, mut on_progress: F) -> Result<()>
where
    F: FnMut(u64, u64) + Send,
{
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    // Build HTTP client with sensible timeouts and explicit UA to avoid silent hangs
    let client = http::Client::builder()
        .connect_timeout(Duration::from_secs(15))
        // Generous overall timeout for large files; connection/setup should fail fast
        .timeout(Duration::from_secs(60 * 60))
        // Avoid some HTTP/2 oddities seen with certain CDNs / proxies
        .http1_only()
        // Follow redirects from huggingface -> CDN endpoints
        .redirect(RedirectPolicy::limited(10))
        .user_agent(format!("WordsCounter/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .context("build http client")?;
    tracing::info!("Requesting model: {}", url);
    let resp = client.get(url).send().context("request failed")?;
    tracing::info!("Response: {:?} {}", resp.version(), resp.status());
    let total = resp
        .content_length()
        .or_else(|| {
            // fallback to known size
            dest.file_name()
                .and_then(|s| s.to_str())
                .and_then(model_info_for_filename)
                .map(|m| m.size_bytes)
        })
        .unwrap_or(0);

    if !resp.status().is_success() {
        return Err(anyhow!("download failed: {}", resp.status()));
    }

    let mut reader = resp;
    let mut downloaded: u64 = 0;

    // write to temporary file first
    let tmp_path = dest.with_extension("download");
    let mut file = File::create(&tmp_path).context("create temp file")?;

    let mut buf = [0u8; 1024 * 64];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => return Err(anyhow!("read error: {e}")),
        } as u64;
        file.write_all(&buf[..n as usize]).context("write file")?;
        downloaded = downloaded.saturating_add(n);
        on_progress(downloaded, total);
    }
    file.flush().ok();

    // atomically move into place
    std::fs::rename(&tmp_path, dest).context("rename downloaded file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{model_info_for_filename, DEFAULT_MODEL_FILENAME, SUPPORTED_MODELS};

    #[test]
    fn default_model_is_in_catalogue() {
        assert!(model_info_for_filename(DEFAULT_MODEL_FILENAME).is_some());
    }

    #[test]
    fn catalogue_entries_point_at_ggml_files() {
        for m in SUPPORTED_MODELS {
            assert!(m.filename.starts_with("ggml-"));
            assert!(m.url.ends_with(m.filename));
            assert!(m.size_bytes > 0);
        }
    }
}
