//! Formatting helpers shared by the summary and the report adapters.
//!
//! Every function here is total: missing or non-finite input renders as
//! `"Unknown"` rather than failing.

/// Placeholder for metrics that could not be determined.
pub const UNKNOWN: &str = "Unknown";

/// Round to `decimals` places, ties away from zero.
///
/// `format!("{:.N}")` alone rounds exact ties to even (`2.25` -> `"2.2"`).
pub fn round_half_away(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Format a duration given in seconds.
///
/// - under one second: `"500ms"`
/// - under one minute: `"45.20s"`
/// - otherwise: `"2m 5s"`
pub fn format_execution_time(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds.filter(|s| s.is_finite()) else {
        return UNKNOWN.to_string();
    };

    if seconds < 1.0 {
        format!("{}ms", (seconds * 1000.0).round() as i64)
    } else if seconds < 60.0 {
        format!("{:.2}s", round_half_away(seconds, 2))
    } else {
        let minutes = (seconds / 60.0).floor() as u64;
        let remainder = (seconds % 60.0).round() as u64;
        format!("{}m {}s", minutes, remainder)
    }
}

/// Format a word count: `"500 words"`, or `"2.5k words"` from a thousand up.
pub fn format_word_count(count: Option<f64>) -> String {
    let Some(count) = count.filter(|c| c.is_finite()) else {
        return UNKNOWN.to_string();
    };

    if count < 1000.0 {
        format!("{} words", count)
    } else {
        format!("{:.1}k words", round_half_away(count / 1000.0, 1))
    }
}

/// Number of whitespace-delimited tokens in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `"1 recommendation"`, `"3 recommendations"`.
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_execution_time() {
        assert_eq!(format_execution_time(Some(0.5)), "500ms");
        assert_eq!(format_execution_time(Some(0.0)), "0ms");
        assert_eq!(format_execution_time(Some(45.2)), "45.20s");
        assert_eq!(format_execution_time(Some(12.345)), "12.35s");
        assert_eq!(format_execution_time(Some(125.0)), "2m 5s");
        assert_eq!(format_execution_time(Some(60.0)), "1m 0s");
    }

    #[test]
    fn test_format_execution_time_unknown() {
        assert_eq!(format_execution_time(None), "Unknown");
        assert_eq!(format_execution_time(Some(f64::NAN)), "Unknown");
        assert_eq!(format_execution_time(Some(f64::INFINITY)), "Unknown");
    }

    #[test]
    fn test_format_word_count() {
        assert_eq!(format_word_count(Some(500.0)), "500 words");
        assert_eq!(format_word_count(Some(0.0)), "0 words");
        assert_eq!(format_word_count(Some(2500.0)), "2.5k words");
        assert_eq!(format_word_count(Some(1000.0)), "1.0k words");
        assert_eq!(format_word_count(None), "Unknown");
        assert_eq!(format_word_count(Some(f64::NAN)), "Unknown");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_word_count(Some(2250.0)), "2.3k words");
        assert_eq!(format_execution_time(Some(45.125)), "45.13s");
        assert_eq!(round_half_away(12.25, 1), 12.3);
        assert_eq!(round_half_away(-0.5, 0), -1.0);
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Fix  title\ttags\n now"), 4);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "step", "steps"), "1 step");
        assert_eq!(pluralize(0, "step", "steps"), "0 steps");
    }
}
