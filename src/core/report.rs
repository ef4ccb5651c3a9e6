use crate::domain::model::{Availability, StatusChange};
use chrono::{DateTime, Utc};

pub const ALERT_SUBJECT: &str = "Slot monitor: availability change";

pub const TEST_SUBJECT: &str = "Test: slot monitor (Mailjet test)";

/// The monitor only reads public pages; every alert says so.
pub const SAFETY_NOTICE: &str = "This is a read-only reminder alert. No login or booking was attempted by this monitor.\n\
Please open the link and log in manually if you want to book. Avoid multiple quick logins.";

/// Plain-text alert body listing every page whose status changed.
pub fn render_alert(changes: &[StatusChange], checked_at: DateTime<Utc>) -> String {
    let mut lines = vec![
        "Appointment availability change detected".to_string(),
        String::new(),
        SAFETY_NOTICE.to_string(),
        String::new(),
        "Changes:".to_string(),
    ];

    for change in changes {
        lines.push(format!("- {}", change.url));
        lines.push(format!("  previous: {}", change.previous));
        lines.push(format!("  now:      {}", change.current));
        lines.push(String::new());
    }

    lines.push(format!(
        "Checked at: {} UTC",
        checked_at.format("%Y-%m-%dT%H:%M:%S")
    ));
    lines.join("\n")
}

/// Subject and body for the `--test` send: a sample change block so the
/// recipient sees what a real alert will look like.
pub fn render_test_alert(url: &str) -> (String, String) {
    let sample = StatusChange {
        url: url.to_string(),
        previous: Availability::Unknown,
        current: Availability::PossibleSlots,
    };
    let body = format!(
        "This is a test email from your slot monitor.\n\n{}",
        render_alert(std::slice::from_ref(&sample), Utc::now())
    );
    (TEST_SUBJECT.to_string(), body)
}
