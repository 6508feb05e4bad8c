use anyhow::Result;
use std::process::ExitCode;

use crate::secret;

/// Print a fresh key on stdout so it can be piped into a secrets store
pub fn run(bytes: u16) -> Result<ExitCode> {
    log::debug!("generating secret key with {bytes} bytes of entropy");
    println!("{}", secret::generate_secret_key(bytes));
    Ok(ExitCode::SUCCESS)
}
