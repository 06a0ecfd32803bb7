//! Console rendering of a flow outcome.

use std::io::{self, Write};

use crate::auth::error::AuthError;
use crate::auth::flow::AuthReport;

pub const SUCCESS_MESSAGE: &str = "Authentication Successful";
pub const FAILURE_MESSAGE: &str = "Authentication Failed";

/// Write the human-readable result lines for `result`.
pub fn write_outcome<W: Write>(out: &mut W, result: &Result<AuthReport, AuthError>) -> io::Result<()> {
    match result {
        Ok(report) => {
            writeln!(out, "Transaction Hash: {}", report.tx_hash)?;
            if let Some(block) = report.receipt.block_number {
                writeln!(out, "Transaction Mined! (block {})", block)?;
            }
            writeln!(out, "{}", SUCCESS_MESSAGE)
        }
        Err(AuthError::VerificationMismatch { .. }) => writeln!(out, "{}", FAILURE_MESSAGE),
        Err(e) => writeln!(out, "{}: {}", FAILURE_MESSAGE, e),
    }
}

/// Write `result` as a single JSON document.
pub fn write_outcome_json<W: Write>(
    out: &mut W,
    result: &Result<AuthReport, AuthError>,
) -> io::Result<()> {
    let document = match result {
        Ok(report) => serde_json::json!({ "authenticated": true, "report": report }),
        Err(e) => serde_json::json!({ "authenticated": false, "error": e.to_string() }),
    };
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)
}
