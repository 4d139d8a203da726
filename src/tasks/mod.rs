//! Background scheduled tasks for the application.
//!
//! This module centralizes the recurring sweeps (rolling elapsed meetings over
//! to done, expiring memberships and refreshing membership warnings).
//! Call `spawn_all` once during startup to launch them.

use crate::config::TasksConfig;
use crate::services::{MeetingService, MembershipService, NotificationService};

/// Spawn all background sweeps.
///
/// Notes
/// - Each sweep is idempotent as implemented in its service and runs on its own schedule.
/// - This function detaches tasks via `tokio::spawn`; it does not block.
pub fn spawn_all(
    config: &TasksConfig,
    meeting_service: MeetingService,
    membership_service: MembershipService,
    notification_service: NotificationService,
) {
    if !config.enabled {
        log::info!("Background sweeps are disabled");
        return;
    }

    // Meetings whose end time has passed become done
    {
        let svc = meeting_service.clone();
        let interval = config.meeting_sweep_interval;
        tokio::spawn(async move {
            loop {
                match svc.complete_elapsed_meetings().await {
                    Ok(n) if n > 0 => log::info!("Elapsed meetings completed: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to complete elapsed meetings: {e:?}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(interval)).await;
            }
        });
    }

    // Expire due memberships, then refresh the allowance and expiry warnings
    {
        let memberships = membership_service.clone();
        let notifications = notification_service.clone();
        let interval = config.membership_sweep_interval;
        tokio::spawn(async move {
            loop {
                match memberships.expire_due_memberships().await {
                    Ok(n) if n > 0 => log::info!("Expired memberships processed: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to expire memberships: {e:?}"),
                }

                match memberships.active_membership_user_ids().await {
                    Ok(user_ids) => {
                        for user_id in user_ids {
                            if let Err(e) = notifications.check_membership_warnings(user_id).await
                            {
                                log::error!(
                                    "Failed to check membership warnings for {user_id}: {e:?}"
                                );
                            }
                        }
                    }
                    Err(e) => log::error!("Failed to list membership owners: {e:?}"),
                }

                tokio::time::sleep(std::time::Duration::from_secs(interval)).await;
            }
        });
    }
}
