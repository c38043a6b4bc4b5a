// Command-line surface. Kept separate from `config` so the clap
// definition and the validated runtime configuration can evolve apart.

use clap::Parser;
use std::path::PathBuf;

/// Upload files to a Nextcloud server and print a public share link
/// for each of them.
#[derive(Parser, Debug)]
#[command(name = "ncshare", version, about)]
pub struct Cli {
    /// Base URL of the server, e.g. https://cloud.example.com
    #[arg(long, env = "NCSHARE_BASE_URL")]
    pub base_url: String,

    /// Account name on the server
    #[arg(long, env = "NCSHARE_USERNAME")]
    pub username: String,

    /// Account password or app password. When absent, the
    /// ~/.ncshare_password file is consulted, then an interactive
    /// prompt.
    #[arg(long, env = "NCSHARE_PASSWORD")]
    pub password: Option<String>,

    /// Remote folder the files are placed under
    #[arg(long = "path", default_value = "Share")]
    pub remote_folder: String,

    /// Skip the upload step and only resolve or create the share.
    /// The remote file must already exist at the computed path.
    #[arg(long)]
    pub no_upload: bool,

    /// Keep processing the remaining files when one fails
    #[arg(long)]
    pub keep_going: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Local files to upload and share
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_documented_behavior() {
        let cli = Cli::try_parse_from([
            "ncshare",
            "--base-url",
            "https://cloud.example.com",
            "--username",
            "alice",
            "report.pdf",
        ])
        .unwrap();
        assert_eq!(cli.remote_folder, "Share");
        assert!(!cli.no_upload);
        assert!(!cli.keep_going);
        assert_eq!(cli.files, vec![PathBuf::from("report.pdf")]);
    }

    #[test]
    fn at_least_one_file_is_required() {
        let res = Cli::try_parse_from([
            "ncshare",
            "--base-url",
            "https://cloud.example.com",
            "--username",
            "alice",
        ]);
        assert!(res.is_err());
    }
}
