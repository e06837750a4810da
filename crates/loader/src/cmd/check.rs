//! Check command - Value codec self-check
//!
//! Parses two known sample lines, encodes them, decodes the stored form and
//! compares the result with the parsed record.

use anyhow::{Context, Result, bail};
use memc_protocol::{Payload, codec, parse_line};
use tracing::info;

/// Sample lines with known expected values
pub const SAMPLES: [&str; 2] = [
    "idfa\t1rfw452y52g2gq4g\t55.55\t42.42\t1423,43,567,3,7,23",
    "gaid\t7rfw452y52g2gq4g\t55.55\t42.42\t7423,424",
];

/// Run the check command
pub fn run() -> Result<()> {
    for line in SAMPLES {
        check_line(line)?;
    }
    info!(samples = SAMPLES.len(), "codec check passed");
    Ok(())
}

/// Round-trip one line through parse, encode and decode
pub fn check_line(line: &str) -> Result<()> {
    let record = parse_line(line).with_context(|| format!("sample does not parse: {line:?}"))?;
    let payload = Payload::from_record(&record);
    let decoded = codec::decode(&payload.key, &payload.value)
        .with_context(|| format!("stored value does not decode: {}", payload.key))?;

    if decoded != record {
        bail!("codec mismatch for {}: stored {}, read back {}", payload.key, record, decoded);
    }

    info!(key = %payload.key, bytes = payload.len(), apps = record.app_ids.len(), "sample ok");
    Ok(())
}
