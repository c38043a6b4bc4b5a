// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the upload-and-share
// pipeline.
//
// Module responsibilities:
// - `cli`: clap definition of the flags and positional file arguments.
// - `config`: validated runtime settings, remote path computation and
//   the password fallback file.
// - `dav`: WebDAV upload client (one authenticated PUT per file).
// - `ocs`: OCS Share API client, share records and the download URL
//   builder.
// - `run`: the per-file pipeline and its report type.
//
// Keeping this separation lets the pipeline be exercised in tests
// through the `Transfer` and `ShareApi` seams without a live server.
pub mod cli;
pub mod config;
pub mod dav;
pub mod ocs;
pub mod run;
