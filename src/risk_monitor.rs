use std::sync::Arc;

use tokio::time::{ interval, Duration, MissedTickBehavior };

use crate::services::RiskAssessmentService;

/// Periodically re-assesses destinations whose risk level has gone stale.
pub struct RiskMonitor {
    assessments: Arc<RiskAssessmentService>,
    period: Duration,
    stale_after_days: i64,
}

impl RiskMonitor {
    pub fn new(
        assessments: Arc<RiskAssessmentService>,
        interval_secs: u64,
        stale_after_days: i64
    ) -> Self {
        Self {
            assessments,
            period: Duration::from_secs(interval_secs),
            stale_after_days,
        }
    }

    /// Run forever. A zero period disables the monitor and returns at once.
    pub async fn start(self) {
        if self.period.is_zero() {
            tracing::info!("Risk monitor disabled");
            return;
        }

        tracing::info!(
            "Risk monitor running every {}s (stale after {} days)",
            self.period.as_secs(),
            self.stale_after_days
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.sweep().await;
        }
    }

    async fn sweep(&self) {
        match self.assessments.assess_stale(self.stale_after_days).await {
            Ok(report) => {
                tracing::info!(
                    "Risk sweep: {} checked, {} failed, {} alert(s) raised",
                    report.checked,
                    report.failed,
                    report.alerts_raised
                );
            }
            Err(e) => tracing::error!("Risk monitor error: {}", e),
        }
    }
}
