//! Applying a reconciliation plan to the live replica set configuration.
//!
//! Instructions are applied strictly sequentially: a submit only starts after
//! the previous one completed and its freshly re-fetched configuration became
//! the base for the next mutation. Concurrent submits would race on the
//! version number. A primary hand-off is driven as an explicit state machine
//! with stabilization waits between the incoming primary's addition and the
//! outgoing primary's removal.

use std::time::Duration;

use replset_config::shared::ReconfigConfig;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::bail;
use crate::error::{ErrorKind, ReplSetResult};
use crate::plan::{MemberAction, ReconcilePlan, ReconfigInstruction};
use crate::replica::ReplicaSetAdmin;
use crate::types::{ReplicaSetConfig, ReplicaSetMember};

/// Phases of the primary hand-off, in execution order.
///
/// The pass stays inside [`ReconfigExecutor::apply`] until the final phase
/// completes or fails, so no other mutation can interleave with a hand-off in
/// progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandoffPhase {
    /// Insert or promote the incoming primary at raised priority.
    AddPrimary,
    /// Wait for the incoming member to catch up with the set.
    CatchUpWait,
    /// Reconnect, then withdraw the outgoing primary.
    RemoveOutgoing,
    /// Wait for the election triggered by the removal to settle.
    SettleWait,
    /// Apply whatever else the plan carries, sequentially.
    ApplyRemaining,
}

/// Applies reconciliation plans against a replica set admin connection.
///
/// The executor borrows the admin handle for the duration of one pass; it is
/// the only component allowed to close and reopen the connection, and only
/// ever does so between submits.
pub struct ReconfigExecutor<'a, A> {
    admin: &'a A,
    config: &'a ReconfigConfig,
}

impl<'a, A> ReconfigExecutor<'a, A>
where
    A: ReplicaSetAdmin,
{
    pub fn new(admin: &'a A, config: &'a ReconfigConfig) -> Self {
        Self { admin, config }
    }

    /// Applies the plan's instructions in order.
    ///
    /// Errors abort the remainder of the plan and are surfaced to the caller;
    /// partial application is recoverable because the next pass re-diffs the
    /// live state and resumes from it.
    pub async fn apply(&self, plan: &ReconcilePlan) -> ReplSetResult<()> {
        if !plan.has_changes() {
            return Ok(());
        }

        let current = self.admin.get_config().await?;

        if plan.handoff {
            self.apply_handoff(plan, current).await
        } else {
            self.apply_batch(&plan.instructions, current).await?;

            Ok(())
        }
    }

    async fn apply_batch(
        &self,
        instructions: &[ReconfigInstruction],
        mut current: ReplicaSetConfig,
    ) -> ReplSetResult<ReplicaSetConfig> {
        for instruction in instructions {
            current = self.apply_instruction(instruction, current).await?;
        }

        Ok(current)
    }

    async fn apply_handoff(
        &self,
        plan: &ReconcilePlan,
        mut current: ReplicaSetConfig,
    ) -> ReplSetResult<()> {
        let (Some(incoming), Some(outgoing)) =
            (plan.instructions.first(), plan.instructions.get(1))
        else {
            bail!(
                ErrorKind::InvalidState,
                "Hand-off plan must lead with the add and remove instruction pair"
            );
        };

        let mut phase = HandoffPhase::AddPrimary;
        loop {
            debug!(phase = ?phase, "hand-off phase starting");

            match phase {
                HandoffPhase::AddPrimary => {
                    current = self.apply_instruction(incoming, current).await?;
                    phase = HandoffPhase::CatchUpWait;
                }
                HandoffPhase::CatchUpWait => {
                    sleep(Duration::from_millis(self.config.handoff_catch_up_ms)).await;
                    phase = HandoffPhase::RemoveOutgoing;
                }
                HandoffPhase::RemoveOutgoing => {
                    // Withdrawing the current primary can trigger an election,
                    // which invalidates the connection the submit would ride
                    // on.
                    self.reconnect().await?;
                    current = self.apply_instruction(outgoing, current).await?;
                    phase = HandoffPhase::SettleWait;
                }
                HandoffPhase::SettleWait => {
                    sleep(Duration::from_millis(self.config.handoff_settle_ms)).await;
                    phase = HandoffPhase::ApplyRemaining;
                }
                HandoffPhase::ApplyRemaining => {
                    self.apply_batch(&plan.instructions[2..], current).await?;
                    break;
                }
            }
        }

        info!(
            incoming = %incoming.host,
            outgoing = %outgoing.host,
            "primary hand-off completed"
        );

        Ok(())
    }

    async fn apply_instruction(
        &self,
        instruction: &ReconfigInstruction,
        current: ReplicaSetConfig,
    ) -> ReplSetResult<ReplicaSetConfig> {
        match instruction.action {
            MemberAction::Add => {
                // Plans built from a cached status can re-request members that
                // a previous pass already added.
                if let Some(member) = current.member_by_host(&instruction.host)
                    && member.priority == instruction.priority
                    && member.votes == instruction.votes
                {
                    debug!(
                        host = %instruction.host,
                        "member already present with the requested settings, skipping"
                    );

                    return Ok(current);
                }

                info!(
                    host = %instruction.host,
                    priority = instruction.priority,
                    primary_role = instruction.is_primary_role,
                    "adding member to the replica set configuration"
                );

                self.submit_mutation(current, |config| upsert_member(config, instruction))
                    .await
            }
            MemberAction::Remove => {
                if current.member_by_host(&instruction.host).is_none() {
                    debug!(
                        host = %instruction.host,
                        "member already absent from the configuration, skipping"
                    );

                    return Ok(current);
                }

                info!(
                    host = %instruction.host,
                    stepping_down = instruction.is_stepping_down,
                    "removing member from the replica set configuration"
                );

                self.submit_mutation(current, |config| {
                    config
                        .members
                        .retain(|member| !member.host.eq_ignore_ascii_case(&instruction.host));
                })
                .await
            }
        }
    }

    /// Submits one mutation with bounded retry and version discipline.
    ///
    /// Every attempt re-applies `mutate` to the latest known configuration and
    /// bumps the version by exactly 1, so a submit never carries a version the
    /// server has not seen the predecessor of. A "not primary" failure closes
    /// and reopens the connection before the next attempt. Exhausting the
    /// budget surfaces the last error.
    async fn submit_mutation<F>(
        &self,
        mut current: ReplicaSetConfig,
        mutate: F,
    ) -> ReplSetResult<ReplicaSetConfig>
    where
        F: Fn(&mut ReplicaSetConfig),
    {
        let retry = &self.config.retry;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let mut submission = current.clone();
            mutate(&mut submission);
            submission.version += 1;

            match self.admin.submit_config(&submission, false).await {
                Ok(fresh) => return Ok(fresh),
                Err(error) => {
                    warn!(
                        attempt,
                        max_attempts = retry.max_attempts,
                        error = %error,
                        "configuration submit failed"
                    );

                    if attempt >= retry.max_attempts {
                        return Err(error);
                    }

                    if error.kind() == ErrorKind::NotPrimary {
                        self.reconnect().await?;
                    }

                    sleep(retry.delay_for(attempt)).await;
                    current = self.admin.get_config().await?;
                }
            }
        }
    }

    async fn reconnect(&self) -> ReplSetResult<()> {
        if let Err(error) = self.admin.close().await {
            warn!(error = %error, "closing the admin connection failed, reopening anyway");
        }

        self.admin.connect().await
    }
}

/// Adds the instruction's member to the configuration, or updates it in place
/// when the host already exists.
///
/// The in-place path is what promotes an existing member to primary during a
/// hand-off: only priority and votes change, the id stays. An appended member
/// gets the instruction's target id when it is known and free, otherwise the
/// next id above the current maximum.
fn upsert_member(config: &mut ReplicaSetConfig, instruction: &ReconfigInstruction) {
    match config
        .members
        .iter_mut()
        .find(|member| member.host.eq_ignore_ascii_case(&instruction.host))
    {
        Some(member) => {
            member.priority = instruction.priority;
            member.votes = instruction.votes;
        }
        None => {
            let id = instruction
                .target_id
                .filter(|id| config.members.iter().all(|member| member.id != *id))
                .unwrap_or_else(|| config.max_member_id() + 1);

            config.members.push(ReplicaSetMember {
                id,
                host: instruction.host.clone(),
                priority: instruction.priority,
                votes: instruction.votes,
            });
        }
    }
}
