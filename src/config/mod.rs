pub mod dayofweek;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveTime, Timelike};
use nom::bytes::complete::tag;
use nom::character::complete::digit1;
use nom::combinator::{all_consuming, map_res};
use nom::sequence::separated_pair;
use nom::IResult;
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_SCHEDULE_TIME: &str = "08:00";
pub const DEFAULT_MESSAGE_FILE: &str = "daily_message.txt";
pub const DEFAULT_LOG_FILE: &str = "bot.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Process-wide configuration, loaded once at startup and passed by
/// reference to every component that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub chat_id: String,
    pub send_time: SendTime,
    pub message_file: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot_token = require_env("BOT_TOKEN")?;
        let chat_id = require_env("CHAT_ID")?;

        let schedule_time =
            env::var("SCHEDULE_TIME").unwrap_or_else(|_| DEFAULT_SCHEDULE_TIME.to_string());
        let send_time = SendTime::parse(&schedule_time)
            .with_context(|| format!("Malformed SCHEDULE_TIME '{}'", schedule_time))?;

        let message_file = env::var("MESSAGE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MESSAGE_FILE));
        let log_file = env::var("LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE));
        let log_level =
            env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            bot_token,
            chat_id,
            send_time,
            message_file,
            log_file,
            log_level,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{} must be set as environment variable", name),
    }
}

/// Time of day the daily message goes out, in 24-hour HH:MM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendTime {
    pub hour: u32,
    pub minute: u32,
}

impl SendTime {
    pub fn parse(input: &str) -> Result<Self> {
        let hour_minute = separated_pair(number, tag(":"), number);
        let result = all_consuming(hour_minute)(input.trim());

        let (hour, minute) = result.map_err(|e| anyhow!("Failed to parse: {}", e))?.1;

        if hour > 23 {
            bail!("Hour out of range: {}", hour);
        }
        if minute > 59 {
            bail!("Minute out of range: {}", minute);
        }

        Ok(Self { hour, minute })
    }

    /// Whether the given wall-clock time is at or past this send time.
    pub fn reached(self, time: NaiveTime) -> bool {
        (time.hour(), time.minute()) >= (self.hour, self.minute)
    }
}

impl fmt::Display for SendTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s| str::parse::<u32>(s))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_time() {
        assert_eq!(
            SendTime::parse("08:00").unwrap(),
            SendTime { hour: 8, minute: 0 }
        );
        assert_eq!(
            SendTime::parse("23:59").unwrap(),
            SendTime {
                hour: 23,
                minute: 59
            }
        );
        // Single-digit hour is accepted, the padding is cosmetic
        assert_eq!(
            SendTime::parse("8:05").unwrap(),
            SendTime { hour: 8, minute: 5 }
        );
        assert_eq!(SendTime::parse(" 08:00 ").unwrap().to_string(), "08:00");

        assert!(SendTime::parse("24:00").is_err());
        assert!(SendTime::parse("08:60").is_err());
        assert!(SendTime::parse("0800").is_err());
        assert!(SendTime::parse("08:00:00").is_err());
        assert!(SendTime::parse("").is_err());
    }

    #[test]
    fn test_send_time_reached() {
        let t = SendTime { hour: 8, minute: 30 };
        assert!(!t.reached(NaiveTime::from_hms_opt(8, 29, 59).unwrap()));
        assert!(t.reached(NaiveTime::from_hms_opt(8, 30, 0).unwrap()));
        assert!(t.reached(NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
        assert!(!t.reached(NaiveTime::from_hms_opt(7, 45, 0).unwrap()));
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("BOT_TOKEN", "token123");
        env::set_var("CHAT_ID", "42");
        env::remove_var("SCHEDULE_TIME");
        env::remove_var("MESSAGE_FILE");
        env::remove_var("LOG_FILE");
        env::remove_var("LOG_LEVEL");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bot_token, "token123");
        assert_eq!(config.chat_id, "42");
        assert_eq!(config.send_time.to_string(), DEFAULT_SCHEDULE_TIME);
        assert_eq!(config.message_file, PathBuf::from(DEFAULT_MESSAGE_FILE));
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));

        env::set_var("SCHEDULE_TIME", "19:30");
        let config = Config::from_env().unwrap();
        assert_eq!(config.send_time, SendTime { hour: 19, minute: 30 });

        env::set_var("SCHEDULE_TIME", "25:00");
        assert!(Config::from_env().is_err());
        env::remove_var("SCHEDULE_TIME");

        env::set_var("BOT_TOKEN", "  ");
        assert!(Config::from_env().is_err());

        env::remove_var("BOT_TOKEN");
        assert!(Config::from_env().is_err());
    }
}
