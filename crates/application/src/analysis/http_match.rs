//! Measurement vs. control comparisons of the final HTTP response.
//!
//! Each returns `None` when either side lacks the data to compare.

use ferrous_probe_domain::{HttpResponse, TestKeys};
use std::collections::HashSet;

/// Smallest `min/max` body length ratio still counted as the same page.
pub const BODY_PROPORTION_THRESHOLD: f64 = 0.7;

/// Title words shorter than this are ignored.
pub const MIN_TITLE_WORD_LEN: usize = 5;

/// Headers nearly every server sends; they say nothing about which server
/// answered.
const COMMON_HEADERS: &[&str] = &[
    "date",
    "content-type",
    "server",
    "cache-control",
    "vary",
    "set-cookie",
    "location",
    "expires",
    "x-powered-by",
    "content-encoding",
    "last-modified",
    "accept-ranges",
    "pragma",
    "x-frame-options",
    "etag",
    "x-content-type-options",
    "age",
    "via",
    "p3p",
    "x-xss-protection",
    "content-language",
    "cf-ray",
    "strict-transport-security",
    "link",
    "x-varnish",
];

fn measured_response(tk: &TestKeys) -> Option<&HttpResponse> {
    tk.getter.requests.first().map(|r| &r.response)
}

/// Whether the two bodies are about the same size.
///
/// # Returns
/// `None` if either length is unknown or the measured body was truncated,
/// otherwise whether `min/max` exceeds [`BODY_PROPORTION_THRESHOLD`]
pub fn body_length_match(tk: &TestKeys) -> Option<bool> {
    let response = measured_response(tk)?;
    let control = tk.control.http_request.body_length;
    let measurement = response.body_length;
    if control <= 0 || measurement <= 0 || response.body_is_truncated {
        return None;
    }
    let (min, max) = if control < measurement {
        (control, measurement)
    } else {
        (measurement, control)
    };
    Some(min as f64 / max as f64 > BODY_PROPORTION_THRESHOLD)
}

/// Whether both sides got the same HTTP status.
///
/// A differing status is not judged when the control got a 5xx.
pub fn status_code_match(tk: &TestKeys) -> Option<bool> {
    let measurement = measured_response(tk)?.code;
    let control = tk.control.http_request.status_code;
    if control <= 0 || measurement <= 0 {
        return None;
    }
    if control == measurement {
        return Some(true);
    }
    // Some sites answer 5xx to automated clients such as the control.
    if control / 100 == 5 {
        return None;
    }
    Some(false)
}

/// Whether the two responses look like they came from the same server.
///
/// Identical header name sets match outright (names compare
/// case-insensitively). Otherwise at least one shared header outside
/// the common-header list is required.
pub fn headers_match(tk: &TestKeys) -> Option<bool> {
    let response = measured_response(tk)?;
    let control = &tk.control.http_request.headers;
    if control.is_empty() || response.headers.is_empty() {
        return None;
    }

    let ours: HashSet<String> = response.headers.keys().map(|k| k.to_lowercase()).collect();
    let theirs: HashSet<String> = control.keys().map(|k| k.to_lowercase()).collect();
    if ours == theirs {
        return Some(true);
    }

    let uncommon_shared = ours
        .intersection(&theirs)
        .any(|name| !COMMON_HEADERS.contains(&name.as_str()));
    Some(uncommon_shared)
}

/// Whether every title word of [`MIN_TITLE_WORD_LEN`] or more characters
/// appears in both titles.
///
/// # Returns
/// `None` when either title is empty or no response was received
pub fn title_match(tk: &TestKeys) -> Option<bool> {
    let response = measured_response(tk)?;
    let control = &tk.control.http_request.title;
    if response.code <= 0 || response.title.is_empty() || control.is_empty() {
        return None;
    }

    let ours = title_words(&response.title);
    let theirs = title_words(control);
    Some(ours.symmetric_difference(&theirs).next().is_none())
}

fn title_words(title: &str) -> HashSet<String> {
    title
        .split(' ')
        .filter(|w| w.chars().count() >= MIN_TITLE_WORD_LEN)
        .map(str::to_lowercase)
        .collect()
}
