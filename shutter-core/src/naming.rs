//! Screenshot file naming
//!
//! Turns a user template such as `"screenshot_{timestamp}_{count}"` into a
//! file name that has not been handed out before in this session.
//!
//! Tokens are matched literally; there is no escaping syntax. Generation
//! never fails: odd templates are cleaned up rather than rejected.

use chrono::{Local, NaiveDateTime};
use std::collections::HashSet;
use tracing::debug;

/// Template used when none is configured
pub const DEFAULT_TEMPLATE: &str = "screenshot_{timestamp}_{count}";

/// Extension appended to every generated name
pub const EXTENSION: &str = ".png";

/// Timestamp token
pub const TIMESTAMP_TOKEN: &str = "{timestamp}";

/// Sequence number token
pub const COUNT_TOKEN: &str = "{count}";

/// Base used when a template cleans up to nothing
const FALLBACK_BASE: &str = "screenshot";

/// Generates unique screenshot file names for one session
#[derive(Debug, Default)]
pub struct FilenameGenerator {
    /// Every name returned so far
    issued: HashSet<String>,
}

impl FilenameGenerator {
    /// Create a generator with an empty issued-name set
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a name using the current local time
    ///
    /// `count` is the number of captures completed so far, not the sequence
    /// number: the name shows `count + 1`, so `generate(None, 0, true)` on a
    /// fresh session ends in `_001` and `generate(None, 1, true)` in `_002`.
    /// At `u64::MAX` the sequence saturates instead of wrapping.
    pub fn generate(&mut self, template: Option<&str>, count: u64, include_timestamp: bool) -> String {
        self.generate_at(template, count, include_timestamp, Local::now().naive_local())
    }

    /// Generate a name as if the local time were `now`
    pub fn generate_at(
        &mut self,
        template: Option<&str>,
        count: u64,
        include_timestamp: bool,
        now: NaiveDateTime,
    ) -> String {
        let timestamp = include_timestamp.then(|| format_timestamp(now));
        let base = render_base(template, count, timestamp.as_deref());

        let mut candidate = format!("{}{}", base, EXTENSION);
        let mut suffix = 1u64;
        while self.issued.contains(&candidate) {
            candidate = format!("{}_{}{}", base, suffix, EXTENSION);
            suffix += 1;
        }

        debug!("Generated screenshot name {}", candidate);
        self.issued.insert(candidate.clone());
        candidate
    }

    /// Whether `name` has already been handed out
    pub fn is_issued(&self, name: &str) -> bool {
        self.issued.contains(name)
    }

    /// Number of names handed out
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

/// Render a template into a cleaned base name (no extension)
///
/// `timestamp` is `None` when timestamps are disabled.
pub fn render_base(template: Option<&str>, count: u64, timestamp: Option<&str>) -> String {
    let template = match template {
        Some(t) if !t.is_empty() => t,
        _ => DEFAULT_TEMPLATE,
    };

    let mut name = match timestamp {
        Some(ts) if template.contains(TIMESTAMP_TOKEN) => {
            template.replacen(TIMESTAMP_TOKEN, ts, 1).replace(TIMESTAMP_TOKEN, "")
        }
        Some(ts) => match template.rfind('.') {
            Some(dot) => format!("{}_{}{}", &template[..dot], ts, &template[dot..]),
            None => format!("{}_{}", template, ts),
        },
        None => template.replace(TIMESTAMP_TOKEN, ""),
    };

    let sequence = format_sequence(count.saturating_add(1));
    name = name.replace(COUNT_TOKEN, &sequence);

    let cleaned = clean_separators(&name);
    if cleaned.is_empty() {
        format!("{}_{}", FALLBACK_BASE, sequence)
    } else {
        cleaned
    }
}

/// Zero-pad a sequence number to at least three digits
pub fn format_sequence(n: u64) -> String {
    format!("{:03}", n)
}

/// Local date and time as `YYYY-MM-DD_HH-MM-SS`
pub fn format_timestamp(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Collapse runs of `-`/`_` into a single `-` and trim them from both ends
///
/// A lone `_` or `-` is left as is. Applying this twice gives the same
/// result as applying it once.
pub fn clean_separators(s: &str) -> String {
    let is_sep = |c: char| c == '-' || c == '_';

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if !is_sep(c) {
            out.push(c);
            continue;
        }

        let mut run = 1;
        while chars.peek().copied().is_some_and(is_sep) {
            chars.next();
            run += 1;
        }
        out.push(if run > 1 { '-' } else { c });
    }

    out.trim_matches(is_sep).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(12, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_format_sequence() {
        assert_eq!(format_sequence(1), "001");
        assert_eq!(format_sequence(42), "042");
        assert_eq!(format_sequence(1000), "1000");
        assert_eq!(format_sequence(u64::MAX), u64::MAX.to_string());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(noon()), "2024-03-09_12-05-07");
    }

    #[test]
    fn test_clean_separators() {
        assert_eq!(clean_separators("a__b"), "a-b");
        assert_eq!(clean_separators("a_-_b"), "a-b");
        assert_eq!(clean_separators("a_b-c"), "a_b-c");
        assert_eq!(clean_separators("__a__"), "a");
        assert_eq!(clean_separators("-_-"), "");
    }

    #[test]
    fn test_default_template() {
        let mut names = FilenameGenerator::new();
        assert_eq!(
            names.generate_at(None, 0, true, noon()),
            "screenshot_2024-03-09_12-05-07_001.png"
        );
        assert_eq!(
            names.generate_at(Some(""), 0, false, noon()),
            "screenshot-001.png"
        );
    }

    #[test]
    fn test_timestamp_spliced_before_dot() {
        assert_eq!(
            render_base(Some("shot.v2"), 0, Some("TS")),
            "shot_TS.v2"
        );
        assert_eq!(render_base(Some("shot"), 0, Some("TS")), "shot_TS");
    }

    #[test]
    fn test_extra_timestamp_tokens_removed() {
        assert_eq!(
            render_base(Some("{timestamp}x{timestamp}"), 0, Some("TS")),
            "TSx"
        );
    }

    #[test]
    fn test_empty_base_falls_back() {
        assert_eq!(render_base(Some("{timestamp}"), 4, None), "screenshot_005");
        assert_eq!(render_base(Some("__"), 0, None), "screenshot_001");
    }

    #[test]
    fn test_issued_tracking() {
        let mut names = FilenameGenerator::new();
        let first = names.generate_at(Some("x"), 0, false, noon());
        assert!(names.is_issued(&first));
        assert!(!names.is_issued("x_1.png"));
        assert_eq!(names.issued_count(), 1);
    }
}
