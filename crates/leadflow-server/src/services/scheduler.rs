//! Sweep Scheduler - Periodic SLA enforcement
//!
//! Runs the claim-window sweep and the reminder firing pass at a fixed
//! interval. Each tick is independent: a failing cycle logs and waits
//! for the next one.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use chrono::Utc;

use crate::{AppReminderService, AppSweepService};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between sweep cycles
    pub interval: Duration,
    /// Enable/disable scheduler
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            enabled: true,
        }
    }
}

/// SLA enforcement scheduler
pub struct SweepScheduler {
    sweep_service: Arc<AppSweepService>,
    reminder_service: Arc<AppReminderService>,
    config: SchedulerConfig,
}

impl SweepScheduler {
    /// Creates a new scheduler
    pub fn new(
        sweep_service: Arc<AppSweepService>,
        reminder_service: Arc<AppReminderService>,
        config: Option<SchedulerConfig>,
    ) -> Self {
        Self {
            sweep_service,
            reminder_service,
            config: config.unwrap_or_default(),
        }
    }

    /// Start the scheduler (runs in background)
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the scheduler loop
    async fn run(self) {
        if !self.config.enabled {
            tracing::info!("📅 Sweep scheduler disabled");
            return;
        }

        tracing::info!(
            "📅 Sweep scheduler started (interval: {:?})",
            self.config.interval
        );

        let mut ticker = interval(self.config.interval);

        // Skip the first immediate tick
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let now = Utc::now();

            match self.sweep_service.sweep(now).await {
                Ok(summary) if summary.total > 0 => {
                    tracing::info!(
                        "🔄 Sweep cycle: {} escalated, {} errors of {} expired",
                        summary.processed,
                        summary.errors,
                        summary.total
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("❌ Sweep cycle failed: {}", e);
                }
            }

            match self.reminder_service.fire_due(now).await {
                Ok(summary) if summary.notified > 0 || summary.errors > 0 => {
                    tracing::info!(
                        "🔔 Reminder cycle: {} notified, {} errors",
                        summary.notified,
                        summary.errors
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("❌ Reminder cycle failed: {}", e);
                }
            }
        }
    }
}

/// Start the scheduler with an optional interval override (seconds)
pub fn start_scheduler(
    sweep_service: Arc<AppSweepService>,
    reminder_service: Arc<AppReminderService>,
    interval_secs: Option<u64>,
) -> tokio::task::JoinHandle<()> {
    let config = SchedulerConfig {
        interval: Duration::from_secs(interval_secs.unwrap_or(60)),
        enabled: true,
    };

    SweepScheduler::new(sweep_service, reminder_service, Some(config)).start()
}
