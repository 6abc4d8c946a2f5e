//! Header classification.

use std::collections::BTreeMap;

use super::types::{Level, Signal, SummaryItem};

/// Header checks in output order.
const HEADER_SIGNALS: [Signal; 3] = [Signal::Csp, Signal::Hsts, Signal::XFrameOptions];

/// Classifies a probed site.
///
/// Always returns four items in the order HTTPS, CSP, HSTS, X-Frame-Options.
/// A header counts as present when it has a non-empty value; the value itself
/// is not inspected. Header lookup is case-insensitive, so callers may pass a
/// map that was not normalized.
///
/// # Arguments
///
/// * `https` - Whether the scanned URL used HTTPS
/// * `headers` - Response headers, ideally keyed by lower-case name
pub fn classify(https: bool, headers: &BTreeMap<String, String>) -> Vec<SummaryItem> {
    let mut summary = Vec::with_capacity(1 + HEADER_SIGNALS.len());

    if https {
        summary.push(SummaryItem::new(Signal::Https, Level::Pass, "Uses HTTPS"));
    } else {
        summary.push(SummaryItem::new(
            Signal::Https,
            Level::Issue,
            "Missing HTTPS (use https://)",
        ));
    }

    for signal in HEADER_SIGNALS {
        let Some(header) = signal.header_name() else {
            continue;
        };
        let name = signal.display_name();
        if header_present(headers, header) {
            summary.push(SummaryItem::new(
                signal,
                Level::Pass,
                format!("{name} header present"),
            ));
        } else {
            summary.push(SummaryItem::new(
                signal,
                Level::Warning,
                format!("{name} header missing"),
            ));
        }
    }

    summary
}

fn header_present(headers: &BTreeMap<String, String>, name: &str) -> bool {
    // Normalized maps hit directly; fall back to a scan for mixed-case keys
    let value = headers.get(name).or_else(|| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    });
    value.is_some_and(|v| !v.is_empty())
}
