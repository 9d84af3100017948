use crate::instance_pool::InstancePool;
use harness_models::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, instrument};

/// Periodically expires warm instances so long-idle functions cold-start
/// again, keeping the cold/warm distinction meaningful over time.
pub struct IdleWatchdog {
    config: Config,
    pool: Arc<InstancePool>,
}

impl IdleWatchdog {
    pub fn new(config: Config, pool: Arc<InstancePool>) -> Self {
        Self { config, pool }
    }

    #[instrument(skip(self))]
    pub async fn start(&self) {
        info!(
            expire_ms = self.config.idle.expire_ms,
            check_interval_ms = self.config.idle.check_interval_ms,
            "starting idle watchdog"
        );

        let expire = Duration::from_millis(self.config.idle.expire_ms);
        let mut ticker = interval(Duration::from_millis(self.config.idle.check_interval_ms));

        loop {
            ticker.tick().await;
            let removed = self.pool.cleanup_idle_instances(expire).await;
            if removed > 0 {
                info!(removed = removed, "idle cleanup cycle complete");
            }
        }
    }
}
