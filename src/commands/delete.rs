use std::io::{self, BufRead, Write};

use calbot_core::gateway::delete_all_upcoming;
use calbot_core::{AppConfig, CalendarGateway};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::console::Console;
use crate::render::{Render, failure, hint, success};

pub const PICK_PROMPT: &str = "Enter event number to delete: ";
pub const CONFIRM_PROMPT: &str = "Delete ALL upcoming events? Type 'yes' to confirm: ";

/// List upcoming events and delete the one the user picks by number.
pub async fn one<G, R, W>(
    gateway: &G,
    config: &AppConfig,
    console: &mut Console<R, W>,
    now: DateTime<Utc>,
) -> io::Result<()>
where
    G: CalendarGateway,
    R: BufRead,
    W: Write,
{
    let events = match gateway.list_events(now, None, config.upcoming_limit).await {
        Ok(events) => events,
        Err(e) => return console.say(failure(&format!("Error: {}", e))),
    };

    if events.is_empty() {
        return console.say("No upcoming events found.");
    }

    console.say("Upcoming events:")?;
    for (i, event) in events.iter().enumerate() {
        console.say(format!("{}. {}", i + 1, event.render(config.timezone)))?;
    }

    let Some(answer) = console.prompt(PICK_PROMPT)? else {
        return Ok(());
    };

    let choice: i64 = match answer.trim().parse() {
        Ok(n) => n,
        Err(_) => return console.say(failure("Enter a valid number.")),
    };

    // 1-based
    let picked = usize::try_from(choice)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| events.get(i));

    let Some(event) = picked else {
        return console.say(failure("Invalid number."));
    };

    match gateway.delete_event(&event.id).await {
        Ok(()) => {
            info!(event_id = %event.id, "Deleted event");
            console.say(success("Event deleted successfully."))
        }
        Err(e) if e.is_gone() => console.say(hint("That event was already deleted.")),
        Err(e) => console.say(failure(&format!("Error deleting event: {}", e))),
    }
}

/// Delete every upcoming event, reporting each one, after an optional
/// confirmation.
pub async fn all<G, R, W>(
    gateway: &G,
    config: &AppConfig,
    console: &mut Console<R, W>,
    now: DateTime<Utc>,
) -> io::Result<()>
where
    G: CalendarGateway,
    R: BufRead,
    W: Write,
{
    if config.confirm_delete_all {
        let answer = console.prompt(CONFIRM_PROMPT)?;
        let confirmed = answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("yes"));
        if !confirmed {
            return console.say("Cancelled.");
        }
    }

    let report = match delete_all_upcoming(gateway, now, config.delete_all_limit).await {
        Ok(report) => report,
        Err(e) => return console.say(failure(&format!("Error: {}", e))),
    };

    if report.attempted() == 0 {
        return console.say("No upcoming events to delete.");
    }

    for outcome in &report.outcomes {
        console.say(outcome.render(config.timezone))?;
    }

    let failed = report.failures().count();
    info!(attempted = report.attempted(), failed, "Bulk delete finished");

    if failed == 0 {
        console.say(success(&format!(
            "All upcoming events deleted ({}).",
            report.deleted()
        )))
    } else {
        console.say(failure(&format!(
            "Finished deleting upcoming events: {} deleted, {} failed.",
            report.deleted(),
            failed
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{FakeGateway, Transcript, config, event_at};
    use calbot_core::{CalendarEvent, RemoteError};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 9, 4, 30, 0).unwrap()
    }

    fn three_events() -> Vec<CalendarEvent> {
        vec![
            event_at("a", "Standup", now() + Duration::hours(1)),
            event_at("b", "Lunch", now() + Duration::hours(3)),
            event_at("c", "", now() + Duration::days(1)),
        ]
    }

    #[tokio::test]
    async fn picked_event_is_deleted() {
        let gateway = FakeGateway::with_events(three_events());
        let mut transcript = Transcript::new("2\n");

        one(&gateway, &config(), &mut transcript.console, now())
            .await
            .unwrap();

        assert_eq!(gateway.delete_calls.borrow().as_slice(), ["b"]);
        let out = transcript.output();
        assert!(out.contains("1. Standup at "));
        assert!(out.contains("3. Unnamed Event at "));
        assert!(out.contains(PICK_PROMPT));
        assert!(out.contains("Event deleted successfully."));
    }

    #[tokio::test]
    async fn listing_uses_upcoming_limit_from_now() {
        let gateway = FakeGateway::with_events(three_events());
        let mut transcript = Transcript::new("1\n");

        one(&gateway, &config(), &mut transcript.console, now())
            .await
            .unwrap();

        assert_eq!(gateway.list_calls.borrow()[0], (now(), None, 10));
    }

    #[tokio::test]
    async fn out_of_range_choice_deletes_nothing() {
        for answer in ["99\n", "0\n", "-1\n"] {
            let gateway = FakeGateway::with_events(three_events());
            let mut transcript = Transcript::new(answer);

            one(&gateway, &config(), &mut transcript.console, now())
                .await
                .unwrap();

            assert!(gateway.delete_calls.borrow().is_empty());
            assert!(transcript.output().contains("Invalid number."), "{answer:?}");
        }
    }

    #[tokio::test]
    async fn non_numeric_choice_deletes_nothing() {
        let gateway = FakeGateway::with_events(three_events());
        let mut transcript = Transcript::new("the second one\n");

        one(&gateway, &config(), &mut transcript.console, now())
            .await
            .unwrap();

        assert!(gateway.delete_calls.borrow().is_empty());
        assert!(transcript.output().contains("Enter a valid number."));
    }

    #[tokio::test]
    async fn nothing_upcoming_skips_the_prompt() {
        let gateway = FakeGateway::default();
        let mut transcript = Transcript::new("1\n");

        one(&gateway, &config(), &mut transcript.console, now())
            .await
            .unwrap();

        let out = transcript.output();
        assert!(out.contains("No upcoming events found."));
        assert!(!out.contains(PICK_PROMPT));
    }

    #[tokio::test]
    async fn failed_delete_is_reported() {
        let gateway = FakeGateway {
            events: three_events(),
            fail_delete_ids: vec!["a".into()],
            ..Default::default()
        };
        let mut transcript = Transcript::new("1\n");

        one(&gateway, &config(), &mut transcript.console, now())
            .await
            .unwrap();

        assert!(
            transcript
                .output()
                .contains("Error deleting event: Remote error (HTTP 500): backend error")
        );
    }

    #[tokio::test]
    async fn event_already_gone_is_only_a_notice() {
        let gateway = FakeGateway {
            events: three_events(),
            fail_delete_ids: vec!["a".into()],
            delete_error: Some(RemoteError::new(Some(410), "Resource has been deleted")),
            ..Default::default()
        };
        let mut transcript = Transcript::new("1\n");

        one(&gateway, &config(), &mut transcript.console, now())
            .await
            .unwrap();

        let out = transcript.output();
        assert!(out.contains("That event was already deleted."));
        assert!(!out.contains("Error deleting event"));
    }

    #[tokio::test]
    async fn delete_all_continues_past_a_failure() {
        let gateway = FakeGateway {
            events: three_events(),
            fail_delete_ids: vec!["b".into()],
            ..Default::default()
        };
        let mut transcript = Transcript::new("yes\n");

        all(&gateway, &config(), &mut transcript.console, now())
            .await
            .unwrap();

        assert_eq!(gateway.delete_calls.borrow().as_slice(), ["a", "b", "c"]);

        let out = transcript.output();
        assert!(out.contains("Deleted: Standup"));
        assert!(out.contains("Deleted: Unnamed Event"));
        assert_eq!(out.matches("Failed: ").count(), 1);
        assert!(out.contains("2 deleted, 1 failed."));
    }

    #[tokio::test]
    async fn delete_all_requires_yes() {
        for answer in ["no\n", "y\n", "\n", ""] {
            let gateway = FakeGateway::with_events(three_events());
            let mut transcript = Transcript::new(answer);

            all(&gateway, &config(), &mut transcript.console, now())
                .await
                .unwrap();

            assert!(gateway.list_calls.borrow().is_empty());
            assert!(gateway.delete_calls.borrow().is_empty());
            assert!(transcript.output().contains("Cancelled."), "{answer:?}");
        }
    }

    #[tokio::test]
    async fn delete_all_without_confirmation_when_disabled() {
        let gateway = FakeGateway::with_events(three_events());
        let mut config = config();
        config.confirm_delete_all = false;
        let mut transcript = Transcript::new("");

        all(&gateway, &config, &mut transcript.console, now())
            .await
            .unwrap();

        assert_eq!(gateway.delete_calls.borrow().len(), 3);
        assert!(!transcript.output().contains(CONFIRM_PROMPT));
        assert!(transcript.output().contains("All upcoming events deleted (3)."));
    }

    #[tokio::test]
    async fn delete_all_with_nothing_upcoming() {
        let gateway = FakeGateway::default();
        let mut transcript = Transcript::new("YES\n");

        all(&gateway, &config(), &mut transcript.console, now())
            .await
            .unwrap();

        assert_eq!(gateway.list_calls.borrow()[0], (now(), None, 2500));
        assert!(transcript.output().contains("No upcoming events to delete."));
    }
}
