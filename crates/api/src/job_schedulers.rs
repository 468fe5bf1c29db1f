use crate::event::SendEventRemindersUseCase;
use crate::notification::DeliverDueNotificationsUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::task::JoinHandle;
use actix_web::rt::time::interval;
use klubb_infra::KlubbContext;
use std::time::Duration;
use tracing::debug;

/// Handle to the background job loop. Dropping it does NOT stop the
/// loop, call `stop` for a deterministic shutdown.
pub struct JobHandle {
    handle: JoinHandle<()>,
}

impl JobHandle {
    pub fn stop(self) {
        self.handle.abort();
    }
}

/// Starts the periodic job loop: event reminders and scheduled
/// notification dispatch share one tick.
///
/// Tests never start this loop, they drive the tick use cases directly
/// with a fixed clock.
pub fn start_reminder_job(ctx: KlubbContext) -> JobHandle {
    let handle = actix_web::rt::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(ctx.config.reminder_interval_millis));
        loop {
            tick_interval.tick().await;
            debug!("Running reminder job tick");

            // Tick use cases log their own failures, a failed tick
            // must not kill the loop
            let _ = execute(SendEventRemindersUseCase, &ctx).await;
            let _ = execute(DeliverDueNotificationsUseCase, &ctx).await;
        }
    });

    JobHandle { handle }
}
