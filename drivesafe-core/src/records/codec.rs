//! Line-delimited JSON encoding.
//!
//! Parsing never fails as a whole: a malformed line is logged and skipped,
//! and the remaining lines are still returned.

use crate::error::Result;
use crate::logging::structured::LogContext;

use super::model::LogRecord;

/// Serialize one record to a single line (no trailing newline).
pub fn encode_line(record: &LogRecord) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

/// Parse a single line.
pub fn parse_line(line: &str) -> serde_json::Result<LogRecord> {
    serde_json::from_str(line)
}

/// Parse every non-blank line, skipping and logging malformed ones.
pub fn parse_lines<'a, I>(lines: I, ctx: &LogContext) -> Vec<LogRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                log::warn!(
                    "{} RECORD_PARSE_FAILED line={} error={}",
                    ctx,
                    index + 1,
                    e
                );
            }
        }
    }

    if skipped > 0 {
        log::info!(
            "{} RECORDS_PARSED parsed={} skipped={}",
            ctx,
            records.len(),
            skipped
        );
    }

    records
}

/// Parse a whole file body.
pub fn parse_text(text: &str, ctx: &LogContext) -> Vec<LogRecord> {
    parse_lines(text.lines(), ctx)
}
