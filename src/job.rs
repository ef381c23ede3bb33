use chrono::{Datelike, Local};
use log::info;

use crate::config::dayofweek::DayOfWeek;
use crate::config::Config;
use crate::notifier::Notifier;

/// Runs one send: picks today's message, delegates to the notifier and
/// reports the outcome on the console.
pub struct JobRunner<'a> {
    config: &'a Config,
    notifier: &'a Notifier,
    daily_message: String,
}

impl<'a> JobRunner<'a> {
    pub fn new(config: &'a Config, notifier: &'a Notifier, daily_message: String) -> Self {
        Self {
            config,
            notifier,
            daily_message,
        }
    }

    pub fn run(&self) {
        let now = Local::now();
        let today = DayOfWeek::from(now.weekday());
        let text = message_for(today, &self.daily_message);

        info!("Sending scheduled message for {}", today);
        let sent = self
            .notifier
            .send(&self.config.bot_token, &self.config.chat_id, &text);

        let stamp = now.format("%Y-%m-%d %H:%M:%S");
        if sent {
            println!("[{}] {} message sent.", stamp, today);
        } else {
            println!(
                "[{}] Failed to send {} message. See {} for details.",
                stamp,
                today,
                self.config.log_file.display()
            );
        }
    }
}

/// Saturday and Sunday always get their fixed greetings; the operator's
/// message only goes out on weekdays.
pub fn message_for(day: DayOfWeek, daily_message: &str) -> String {
    match day {
        DayOfWeek::Sat => format!("🌞 Happy Weekend - ( {} )!\n\n", day.name()),
        DayOfWeek::Sun => format!(
            "🌞 Hey traders, Happy {}!\n\nWelcome to a new week",
            day.name()
        ),
        _ => daily_message.to_string(),
    }
}
