// Runtime configuration: validated once at startup, immutable for the
// rest of the process.

use anyhow::{Context, Result};
use reqwest::Url;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Settings shared by every component for the process lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub username: String,
    pub password: String,
    /// Remote folder uploads land in, relative to the user's file root.
    pub remote_folder: String,
    pub upload: bool,
    pub keep_going: bool,
}

impl Config {
    /// Build the configuration from parsed arguments and the resolved
    /// password. The base URL is the only input rejected here; a
    /// malformed one fails the run before any file is touched.
    pub fn from_cli(cli: &Cli, password: String) -> Result<Self> {
        let base_url = Url::parse(&cli.base_url)
            .with_context(|| format!("invalid base URL: {}", cli.base_url))?;
        Ok(Config {
            base_url,
            username: cli.username.clone(),
            password,
            remote_folder: cli.remote_folder.clone(),
            upload: !cli.no_upload,
            keep_going: cli.keep_going,
        })
    }

    /// Remote path for a local file: `<remote-folder>/<basename>`.
    /// The same path feeds both the upload and the share lookup.
    pub fn remote_path_for(&self, local: &Path) -> Result<String> {
        let name = local
            .file_name()
            .and_then(|s| s.to_str())
            .with_context(|| format!("no usable file name in {}", local.display()))?;
        let folder = self.remote_folder.trim_matches('/');
        if folder.is_empty() {
            Ok(name.to_string())
        } else {
            Ok(format!("{}/{}", folder, name))
        }
    }
}

/// Read the password fallback file from the user's home directory.
pub fn load_password_file() -> Result<String> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    read_password_file(&dir.join(".ncshare_password"))
}

/// Trailing whitespace is stripped so a newline-terminated file works.
fn read_password_file(path: &Path) -> Result<String> {
    let data = std::fs::read_to_string(path)?;
    Ok(data.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            base_url: Url::parse("https://cloud.example.com").unwrap(),
            username: "alice".into(),
            password: "secret".into(),
            remote_folder: "Share".into(),
            upload: true,
            keep_going: false,
        }
    }

    #[test]
    fn remote_path_joins_folder_and_basename() {
        let cfg = config();
        let path = cfg.remote_path_for(Path::new("/tmp/report.pdf")).unwrap();
        assert_eq!(path, "Share/report.pdf");
    }

    #[test]
    fn remote_folder_slashes_are_normalized() {
        let mut cfg = config();
        cfg.remote_folder = "/Backups/2024/".into();
        let path = cfg.remote_path_for(Path::new("notes.txt")).unwrap();
        assert_eq!(path, "Backups/2024/notes.txt");
    }

    #[test]
    fn empty_remote_folder_means_the_file_root() {
        let mut cfg = config();
        cfg.remote_folder = "/".into();
        let path = cfg.remote_path_for(Path::new("notes.txt")).unwrap();
        assert_eq!(path, "notes.txt");
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        let cfg = config();
        assert!(cfg.remote_path_for(Path::new("/")).is_err());
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        let cli = Cli {
            base_url: "cloud.example.com".into(),
            username: "alice".into(),
            password: None,
            remote_folder: "Share".into(),
            no_upload: false,
            keep_going: false,
            verbose: false,
            files: vec![],
        };
        assert!(Config::from_cli(&cli, "secret".into()).is_err());
    }

    #[test]
    fn password_file_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ncshare_password");
        std::fs::write(&path, "s3cret\n").unwrap();
        assert_eq!(read_password_file(&path).unwrap(), "s3cret");
    }

    #[test]
    fn missing_password_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_password_file(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn upload_flag_inverts_no_upload() {
        let cli = Cli {
            base_url: "https://cloud.example.com".into(),
            username: "alice".into(),
            password: None,
            remote_folder: "Share".into(),
            no_upload: true,
            keep_going: false,
            verbose: false,
            files: vec![],
        };
        let cfg = Config::from_cli(&cli, "secret".into()).unwrap();
        assert!(!cfg.upload);
    }
}
