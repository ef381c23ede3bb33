mod config;
mod job;
mod logging;
mod message;
mod notifier;
mod scheduler;

use anyhow::Result;
use chrono::Local;
use log::info;

use config::Config;
use job::JobRunner;
use notifier::Notifier;
use scheduler::WeeklyTrigger;

fn main() -> Result<()> {
    let config = Config::from_env()?;

    logging::setup_logging(&config.log_file, &config.log_level)?;
    info!("Bot starting.");

    // Resolve the message before any scheduling is set up; the run loop
    // itself never blocks on the operator
    let daily_message = message::resolve(&config)?;

    let notifier = Notifier::new()?;
    let job = JobRunner::new(&config, &notifier, daily_message);

    let mut trigger = WeeklyTrigger::daily_at(config.send_time, Local::now().naive_local());
    println!(
        "Bot scheduled: will send daily at {}. Logs: {}",
        config.send_time,
        config.log_file.display()
    );
    info!("Scheduled daily job at {}", config.send_time);

    if message::prompt_yes_no("Send immediately now? (y/n): ")? {
        job.run();
    }

    scheduler::run_loop(&mut trigger, &job)
}
