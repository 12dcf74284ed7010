// Daemon schedule: a daily tick at a fixed local time, upgraded to a weekly
// pass on the configured weekday.

use chrono::{Datelike, Duration, Local, NaiveDateTime, Utc};
use tracing::{error, info};

use crate::app::{Assistant, PassKind};
use crate::config::Schedule;

/// The next daily tick strictly after `now`.
pub fn next_daily(now: NaiveDateTime, schedule: &Schedule) -> NaiveDateTime {
    let today = now.date().and_time(schedule.daily_time);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// The next tick and what kind of pass it runs.
pub fn next_tick(now: NaiveDateTime, schedule: &Schedule) -> (NaiveDateTime, PassKind) {
    let at = next_daily(now, schedule);
    let kind = if at.weekday() == schedule.weekly_day {
        PassKind::Weekly
    } else {
        PassKind::Daily
    };
    (at, kind)
}

/// Run scheduled passes until Ctrl-C. Each tick runs at most one pass and
/// then regenerates the reports; failures are logged and the loop goes on.
pub async fn run_daemon(assistant: &mut Assistant) -> anyhow::Result<()> {
    let schedule = assistant.config.schedule;
    info!(
        "Daemon started: daily at {}, weekly on {}",
        schedule.daily_time.format("%H:%M"),
        schedule.weekly_day
    );

    loop {
        let now = Local::now().naive_local();
        let (at, kind) = next_tick(now, &schedule);
        let wait = (at - now).to_std().unwrap_or_default();
        info!("Next {} pass at {}", kind, at.format("%Y-%m-%d %H:%M"));

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                if assistant.run_pass_logged(kind, Utc::now()) {
                    if let Err(e) = assistant.generate_reports(Utc::now()) {
                        error!("Report generation failed: {}", e);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, stopping daemon");
                break;
            }
        }
    }
    Ok(())
}
