use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use log::{debug, info};
use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use crate::config::dayofweek::DayOfWeek;
use crate::config::SendTime;
use crate::job::JobRunner;

const POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct FiringPoint {
    day: DayOfWeek,
    time: SendTime,
    last_fired: Option<NaiveDate>,
}

/// Seven firing points, one per weekday, all at the configured time of day.
pub struct WeeklyTrigger {
    points: Vec<FiringPoint>,
}

impl WeeklyTrigger {
    /// A point whose time already passed at construction starts latched for
    /// today: a firing missed before startup is skipped, not sent late.
    pub fn daily_at(time: SendTime, now: NaiveDateTime) -> Self {
        let today = now.date();
        let weekday = DayOfWeek::from(now.weekday());

        let points = DayOfWeek::ALL
            .iter()
            .map(|&day| {
                let already_passed = day == weekday && time.reached(now.time());
                FiringPoint {
                    day,
                    time,
                    last_fired: already_passed.then_some(today),
                }
            })
            .collect();

        Self { points }
    }

    /// Fire every due point, at most once per point per day.
    pub fn run_pending<F: FnMut(DayOfWeek)>(&mut self, now: NaiveDateTime, mut fire: F) {
        let today = now.date();
        let weekday = DayOfWeek::from(now.weekday());

        for point in &mut self.points {
            if point.day != weekday {
                continue;
            }
            if !point.time.reached(now.time()) {
                continue;
            }
            if point.last_fired == Some(today) {
                continue;
            }

            debug!("Firing point {} {} reached at {}", point.day, point.time, now);
            point.last_fired = Some(today);
            fire(point.day);
        }
    }
}

/// Poll the trigger until the process is interrupted.
pub fn run_loop(trigger: &mut WeeklyTrigger, job: &JobRunner) -> Result<()> {
    let term = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&term))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&term))?;

    while !term.load(Ordering::Relaxed) {
        trigger.run_pending(Local::now().naive_local(), |_| job.run());

        // Sleep in short slices so an interrupt is honored promptly
        let mut slept = Duration::ZERO;
        while slept < POLL_INTERVAL && !term.load(Ordering::Relaxed) {
            sleep(Duration::from_secs(1));
            slept += Duration::from_secs(1);
        }
    }

    println!("Bot stopped by user.");
    info!("Bot stopped by user.");
    Ok(())
}
