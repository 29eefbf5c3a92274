use chrono::{DateTime, Utc};

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Show just enough of a token to tell two apart
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(8).collect();
    format!("{}… ({} chars)", visible, token.chars().count())
}

/// Format an optional timestamp for display
pub fn format_date(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(dt) => dt.format("%b %d, %Y %H:%M UTC").to_string(),
        None => "never".to_string(),
    }
}

/// Human-readable age of a timestamp relative to `now`
pub fn age_display(at: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - *at).num_minutes();
    if minutes < 1 {
        // Clock skew lands here too
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJhbGci… (28 chars)");
        assert_eq!(mask_token("abc"), "abc… (3 chars)");
    }

    #[test]
    fn test_format_date() {
        let dt = DateTime::parse_from_rfc3339("2024-03-12T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_date(Some(&dt)), "Mar 12, 2024 09:30 UTC");
        assert_eq!(format_date(None), "never");
    }

    #[test]
    fn test_age_display() {
        let now = Utc::now();
        assert_eq!(age_display(&now, now), "just now");
        assert_eq!(age_display(&(now + Duration::minutes(5)), now), "just now");
        assert_eq!(age_display(&(now - Duration::minutes(5)), now), "5m ago");
        assert_eq!(age_display(&(now - Duration::hours(3)), now), "3h ago");
        assert_eq!(age_display(&(now - Duration::days(2)), now), "2d ago");
    }
}
