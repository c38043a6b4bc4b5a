// WebDAV upload path: a single authenticated PUT per file into the
// server's per-user file tree.

use anyhow::{anyhow, bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Body, Client};
use reqwest::Url;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Prefix of the per-user WebDAV file namespace on the server.
const DAV_ROOT: &str = "remote.php/dav/files";

/// Client that writes local files into the authenticated user's
/// remote tree. The transfer side takes the credentials directly;
/// only the OCS API builds an explicit Authorization header.
pub struct DavClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl DavClient {
    pub fn new(base_url: Url, username: &str, password: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(DavClient {
            client,
            base_url,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Endpoint for a remote path:
    /// `<base>/remote.php/dav/files/<username>/<remote path>`.
    /// Every component is pushed as its own URL segment so
    /// percent-encoding happens per segment.
    pub fn file_url(&self, remote_path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("base URL cannot carry a path: {}", self.base_url))?;
            segments.pop_if_empty();
            segments.extend(DAV_ROOT.split('/'));
            segments.push(&self.username);
            segments.extend(remote_path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    /// Stream `local` to `remote_path` under the user's namespace.
    /// The open error is propagated here rather than deferred to the
    /// first read.
    pub fn upload(&self, local: &Path, remote_path: &str) -> Result<()> {
        let file =
            File::open(local).with_context(|| format!("failed to open {}", local.display()))?;
        let size = file
            .metadata()
            .with_context(|| format!("failed to stat {}", local.display()))?
            .len();

        let url = self.file_url(remote_path)?;
        debug!("PUT {}", url);

        let bar = transfer_bar(size);
        bar.set_message(format!("Uploading {}", local.display()));
        let body = Body::sized(bar.wrap_read(file), size);

        let res = self
            .client
            .put(url)
            .basic_auth(&self.username, Some(&self.password))
            .body(body)
            .send()
            .with_context(|| format!("upload failed for {}", local.display()))?;
        bar.finish_and_clear();

        let status = res.status();
        if !status.is_success() {
            let txt = res.text().unwrap_or_else(|_| "".into());
            bail!(
                "server rejected upload of {}: {} - {}",
                local.display(),
                status,
                txt
            );
        }
        info!("uploaded {} ({} bytes)", remote_path, size);
        Ok(())
    }
}

fn transfer_bar(size: u64) -> ProgressBar {
    let bar = ProgressBar::new(size);
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{bar:40}] {bytes}/{total_bytes}")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar
}
