// Per-file pipeline: upload, resolve or create the public share, build
// the download URL. Components hand back results; the policy over
// failures lives here, not inside the clients.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::dav::DavClient;
use crate::ocs::{download_url, OcsClient, Share};

/// Write access to the remote file tree.
pub trait Transfer {
    fn upload(&self, local: &Path, remote_path: &str) -> Result<()>;
}

/// Share lookup and creation on the remote server.
pub trait ShareApi {
    fn get_public_share(&self, path: &str) -> Result<Option<Share>>;
    fn create_public_share(&self, path: &str) -> Result<Share>;
}

impl Transfer for DavClient {
    fn upload(&self, local: &Path, remote_path: &str) -> Result<()> {
        DavClient::upload(self, local, remote_path)
    }
}

impl ShareApi for OcsClient {
    fn get_public_share(&self, path: &str) -> Result<Option<Share>> {
        OcsClient::get_public_share(self, path)
    }

    fn create_public_share(&self, path: &str) -> Result<Share> {
        OcsClient::create_public_share(self, path)
    }
}

/// Outcome of one positional file argument.
#[derive(Debug)]
pub struct FileReport {
    pub local: PathBuf,
    /// `Ok(Some(url))` on success, `Ok(None)` when a share was resolved
    /// but the server handed back no link, `Err` on any upload or API
    /// failure.
    pub result: Result<Option<String>>,
}

/// Run the pipeline over `files` in argument order and collect one
/// report per attempted file. Stops at the first failure unless the
/// configuration says to keep going; files after the stop point carry
/// no report.
pub fn process_files(
    config: &Config,
    transfer: &dyn Transfer,
    shares: &dyn ShareApi,
    files: &[PathBuf],
) -> Vec<FileReport> {
    let mut reports = Vec::with_capacity(files.len());
    for local in files {
        info!("processing {}", local.display());
        let result = process_one(config, transfer, shares, local);
        let failed = result.is_err();
        reports.push(FileReport {
            local: local.clone(),
            result,
        });
        if failed && !config.keep_going {
            break;
        }
    }
    reports
}

fn process_one(
    config: &Config,
    transfer: &dyn Transfer,
    shares: &dyn ShareApi,
    local: &Path,
) -> Result<Option<String>> {
    let remote_path = config.remote_path_for(local)?;

    if config.upload {
        transfer.upload(local, &remote_path)?;
    }

    // Get-then-create is not atomic; a concurrent invocation on the
    // same path can leave duplicate shares behind.
    let share = match shares.get_public_share(&remote_path)? {
        Some(share) => share,
        None => {
            info!("creating share for {}", remote_path);
            shares.create_public_share(&remote_path)?
        }
    };

    Ok(download_url(&share))
}
