//! Curl-compatible command-line front end for `curlflags-core`.
//!
//! # Overview
//! `command` declares the curl flags on a `clap` command, `run` turns the
//! parsed arguments into a request and a client through the core builders,
//! executes the request with ureq and writes the response.
//!
//! # Design
//! - The core never performs I/O; `transport` is the host that does.
//! - Curl's implicit method (`GET`, or `POST` with a body) is layered on by
//!   `flags::CurlDefaults`, not by the core.
//! - Errors map to curl's exit codes in `error`.

pub mod error;
pub mod flags;
pub mod logging;
pub mod output;
pub mod transport;

use std::fs::File;
use std::io::{self, BufWriter};

use clap::{crate_version, ArgMatches, Command};
use curlflags_core::{build_client, build_request, OptionSource};
use tracing::info;

pub use error::{CliError, Result};
pub use flags::{register_flags, CurlDefaults, MatchesSource};
pub use transport::Response;

/// The `curlflags` command with every curl flag registered.
pub fn command() -> Command {
    register_flags(
        Command::new("curlflags")
            .version(crate_version!())
            .about("Send HTTP requests described with curl flags"),
    )
}

/// Build, execute and print one request described by `matches`.
///
/// Returns the response so callers can inspect it after it was written.
pub fn run(matches: &ArgMatches) -> Result<Response> {
    let source = MatchesSource::new(matches);
    let options = CurlDefaults::new(source);

    let args = source.positionals();
    let request = build_request(&options, args.as_slice())?;
    let client = build_client(&options)?;
    info!(method = %request.method, url = %request.url, "request built");

    let agent = transport::agent(&client)?;
    let response = transport::execute(&agent, &request)?;

    if options.is_set("fail") && response.status >= 400 {
        return Err(CliError::HttpStatus(response.status));
    }

    let include = options.is_set("include");
    match options.non_empty("output") {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            output::write_response(&mut file, &response, include)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            output::write_response(&mut stdout, &response, include)?;
        }
    }

    Ok(response)
}
