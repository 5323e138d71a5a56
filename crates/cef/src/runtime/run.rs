//! Run: reads CEF lines, writes one JSON document per accepted event.

use std::io::{self, BufRead, Write};
use serde::Serialize;
use tracing::{debug, warn};

use crate::conf::ParserConfig;
use crate::parser::{CefEvent, CefHeader, CefParser, ExtensionValue, ParseOptions};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub accepted: u64,
    pub rejected: u64,
    pub skipped: u64,
}

/// Emitted shape of one event.
#[derive(Debug, Serialize)]
struct Rendered<'a> {
    header: &'a CefHeader,
    extensions: BTreeMap<String, Option<ExtensionValue>>,
}

impl<'a> Rendered<'a> {
    fn new(event: &'a CefEvent, config: &ParserConfig) -> Self {
        Self {
            header: event.header(),
            extensions: event.extensions(config.populated_only, config.include_custom),
        }
    }
}

/// Stream every line of `input` through the parser.
///
/// Blank lines are skipped, rejected lines are logged and counted. Only
/// I/O and serialization failures stop the loop.
pub fn run<R, W>(input: R, mut output: W, config: &ParserConfig) -> io::Result<RunStats>
where
    R: BufRead,
    W: Write,
{
    let parser = CefParser::from_config(config);
    let options: ParseOptions = config.parse_options();
    let mut stats = RunStats::default();

    for (idx, line) in input.split(b'\n').enumerate() {
        let line = line?;
        let line = line.strip_suffix(b"\r").unwrap_or(&line);
        let line_no = idx + 1;

        if line.iter().all(u8::is_ascii_whitespace) {
            stats.skipped += 1;
            continue;
        }

        match parser.parse_bytes(line, &options) {
            Ok(event) => {
                serde_json::to_writer(&mut output, &Rendered::new(&event, config))?;
                output.write_all(b"\n")?;
                stats.accepted += 1;
            }
            Err(e) if e.is_validation() => {
                debug!(line = line_no, "Rejected event: {}", e);
                stats.rejected += 1;
            }
            Err(e) => {
                warn!(line = line_no, "Rejected line: {}", e);
                stats.rejected += 1;
            }
        }
    }

    output.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Locale;

    fn run_str(input: &str, config: &ParserConfig) -> (RunStats, Vec<serde_json::Value>) {
        let mut out = Vec::new();
        let stats = run(input.as_bytes(), &mut out, config).unwrap();
        let docs = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (stats, docs)
    }

    #[test]
    fn test_run_mixed_input() {
        let input = "CEF:0|Apache|apache||200|GET /index.html|Unknown|act=block vendorKey=x\n\
                     \n\
                     test test test chocolate\n\
                     CEF:0|a|b|c|d|e|f|spt=abc\r\n\
                     CEF:0|a|b|c|d|e|f|dst=1.1.1.1\r\n";
        let (stats, docs) = run_str(input, &ParserConfig::default());

        assert_eq!(stats, RunStats { accepted: 2, rejected: 2, skipped: 1 });
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["header"]["deviceVendor"], "Apache");
        assert_eq!(docs[0]["extensions"]["act"], "block");
        assert_eq!(docs[0]["extensions"]["vendorKey"], "x");
        assert_eq!(docs[1]["extensions"]["dst"], "1.1.1.1");
    }

    #[test]
    fn test_run_validation_rejects() {
        let config = ParserConfig {
            validate: true,
            ..Default::default()
        };
        let (stats, docs) = run_str("CEF:0|a|b|c|d|e|f|proto=xdp\n", &config);
        assert_eq!(stats.rejected, 1);
        assert!(docs.is_empty());
    }

    #[test]
    fn test_run_all_fields_without_custom() {
        let config = ParserConfig {
            populated_only: false,
            include_custom: false,
            ..Default::default()
        };
        let (_, docs) = run_str("CEF:0|a|b|c|d|e|f|rt=1423441663000 vendorKey=x", &config);
        let ext = docs[0]["extensions"].as_object().unwrap();

        assert!(ext["act"].is_null());
        assert!(!ext.contains_key("vendorKey"));
        assert_eq!(ext["rt"], "2015-02-09T00:27:43Z");
    }

    #[test]
    fn test_run_uses_configured_locale() {
        let config = ParserConfig {
            locale: Locale::French,
            ..Default::default()
        };
        let (stats, docs) = run_str("CEF:0|a|b|c|d|e|f|rt=juil. 09 2015 00:27:43 UTC", &config);
        assert_eq!(stats.accepted, 1);
        assert_eq!(docs[0]["extensions"]["rt"], "2015-07-09T00:27:43Z");
    }
}
