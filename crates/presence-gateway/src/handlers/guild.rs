//! READY / GUILD_CREATE / GUILD_DELETE handlers

use super::HandlerResult;
use crate::events::{GuildCreateEvent, GuildDeleteEvent, ReadyEvent};
use crate::server::GatewayState;
use presence_core::{PresenceStatus, SessionKey};

/// Totals from bootstrapping one or more guild snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapSummary {
    /// Members seen in the snapshots
    pub members: usize,
    /// Sessions opened
    pub opened: usize,
    /// Members whose session could not be opened
    pub failed: usize,
}

impl BootstrapSummary {
    fn merge(&mut self, other: Self) {
        self.members += other.members;
        self.opened += other.opened;
        self.failed += other.failed;
    }
}

/// Handles guild membership events
pub struct GuildHandler;

impl GuildHandler {
    /// Bootstrap every guild delivered with READY
    pub async fn handle_ready(
        state: &GatewayState,
        payload: ReadyEvent,
    ) -> HandlerResult<BootstrapSummary> {
        let guilds = payload.guilds.len();
        let mut summary = BootstrapSummary::default();
        for guild in payload.guilds {
            summary.merge(Self::bootstrap_guild(state, guild).await);
        }

        tracing::info!(
            guilds,
            members = summary.members,
            opened = summary.opened,
            failed = summary.failed,
            "Initial guild snapshots bootstrapped"
        );
        Ok(summary)
    }

    /// Bootstrap the members of a guild that became available or was joined
    pub async fn handle_create(
        state: &GatewayState,
        payload: GuildCreateEvent,
    ) -> HandlerResult<BootstrapSummary> {
        let guild_id = payload.id;
        let summary = Self::bootstrap_guild(state, payload).await;

        tracing::info!(
            guild_id = %guild_id,
            members = summary.members,
            opened = summary.opened,
            failed = summary.failed,
            "Guild bootstrapped"
        );
        Ok(summary)
    }

    /// Forget cached statuses for a guild the tracker left.
    ///
    /// Open sessions are not touched; they close on the next transition or at the
    /// next startup.
    pub fn handle_delete(state: &GatewayState, payload: GuildDeleteEvent) -> usize {
        if payload.unavailable {
            tracing::debug!(guild_id = %payload.id, "Guild unavailable, keeping member statuses");
            return 0;
        }
        state.members().forget_guild(payload.id)
    }

    /// Open sessions for members already in a tracked status.
    ///
    /// A store failure for one member is logged and does not stop the others.
    async fn bootstrap_guild(state: &GatewayState, guild: GuildCreateEvent) -> BootstrapSummary {
        let mut summary = BootstrapSummary::default();

        for member in guild.members {
            let key = SessionKey::new(guild.id, member.user.id);
            let status = PresenceStatus::normalize(&member.status);
            state.members().record(key, status);
            summary.members += 1;

            match state.tracker().bootstrap(key, &status).await {
                Ok(true) => summary.opened += 1,
                Ok(false) => {}
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        %key,
                        error = %e,
                        code = e.error_code(),
                        "Failed to bootstrap member session"
                    );
                }
            }
        }

        summary
    }
}
