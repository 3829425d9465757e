// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SessionManager`: the four operations spec §4.7 names
//! (`create_session`, `send_keys`, `close_session`, `poll_output`),
//! implemented once against a generic [`MuxBridge`] and the Durable
//! Store, with the in-memory [`SessionRegistry`] kept in sync on every
//! mutation.

use crate::bridge::{MuxBridge, MuxError};
use crate::registry::SessionRegistry;
use std::sync::Arc;
use teleclaude_core::{
    Clock, ComputerId, ErrorKind, HumanRole, PersonId, Session, SessionId, SessionState,
    SystemRole,
};
use teleclaude_store::Store;

pub struct SessionManager<M: MuxBridge, C: Clock> {
    bridge: Arc<M>,
    store: Arc<Store>,
    registry: SessionRegistry,
    clock: C,
}

impl<M: MuxBridge, C: Clock> SessionManager<M, C> {
    pub fn new(bridge: Arc<M>, store: Arc<Store>, registry: SessionRegistry, clock: C) -> Self {
        Self {
            bridge,
            store,
            registry,
            clock,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Fills in whichever of `system_role`/`human_role` is `None` from
    /// the named person's directory entry. Neither role given and no
    /// `person_id` given is a contract error — a session needs both
    /// roles from somewhere.
    async fn resolve_roles(
        &self,
        person_id: Option<PersonId>,
        system_role: Option<SystemRole>,
        human_role: Option<HumanRole>,
    ) -> Result<(SystemRole, HumanRole), ErrorKind> {
        if let (Some(system_role), Some(human_role)) = (system_role, human_role) {
            return Ok((system_role, human_role));
        }

        let person = match person_id {
            Some(pid) => Some(
                self.store
                    .get_person(&pid)
                    .await
                    .map_err(|e| e.into_core())?
                    .ok_or_else(|| ErrorKind::contract(format!("unknown person {pid}")))?,
            ),
            None => None,
        };

        let system_role = system_role
            .or_else(|| person.as_ref().map(|p| p.default_system_role))
            .ok_or_else(|| ErrorKind::contract("system_role required without a person_id"))?;
        let human_role = human_role
            .or_else(|| person.as_ref().map(|p| p.human_role))
            .ok_or_else(|| ErrorKind::contract("human_role required without a person_id"))?;
        Ok((system_role, human_role))
    }

    /// Reserves an id, creates the backing multiplexer session with an
    /// unforgeable name derived from it, and records the session (spec
    /// §4.7).
    ///
    /// `person_id`, when given, resolves the session's roles from the
    /// `people` directory: an explicit `system_role`/`human_role` still
    /// wins if supplied, the person's own roles fill in whichever is
    /// left `None` (spec §3: "people ... referenced by Session.human_role
    /// defaults").
    #[allow(clippy::too_many_arguments)]
    pub async fn create_session(
        &self,
        owning_computer: ComputerId,
        project_path: &str,
        title: &str,
        origin_adapter: &str,
        person_id: Option<PersonId>,
        system_role: Option<SystemRole>,
        human_role: Option<HumanRole>,
    ) -> Result<SessionId, ErrorKind> {
        let (system_role, human_role) = self.resolve_roles(person_id, system_role, human_role).await?;

        let id = SessionId::new();
        let name = crate::session_name(&id);
        let now = self.clock.now();

        self.bridge
            .create_session(&name, project_path)
            .await
            .map_err(MuxError::into_kind)?;

        let session = Session {
            id,
            owning_computer,
            project_path: project_path.to_string(),
            multiplexer_session_name: name,
            origin_adapter: origin_adapter.to_string(),
            title: title.to_string(),
            system_role,
            human_role,
            created_at: now,
            last_activity_at: now,
            state: SessionState::Active,
            adapter_metadata: Default::default(),
        };

        self.store
            .create_session(&session)
            .await
            .map_err(|e| e.into_core())?;
        self.registry.insert(session);
        Ok(id)
    }

    /// Sends `text` into the session's pane. Verifies existence once;
    /// idempotent from the caller's perspective — repeated calls under
    /// at-least-once delivery are correct, not a bug (spec §4.2/§4.3).
    pub async fn send_keys(&self, id: &SessionId, text: &str) -> Result<(), ErrorKind> {
        let session = self
            .registry
            .get(id)
            .ok_or_else(|| ErrorKind::contract(format!("unknown session {id}")))?;

        if !self
            .bridge
            .session_exists(&session.multiplexer_session_name)
            .await
            .map_err(MuxError::into_kind)?
        {
            return Err(ErrorKind::permanent(format!(
                "multiplexer session {} missing",
                session.multiplexer_session_name
            )));
        }

        self.bridge
            .send_keys(&session.multiplexer_session_name, text)
            .await
            .map_err(MuxError::into_kind)
    }

    /// Expires pending inbound rows, kills the multiplexer session, and
    /// marks the session closed. Cancelling the session's worker task is
    /// the caller's responsibility (the queue crate owns worker
    /// lifecycles) — this method only handles storage and the
    /// multiplexer.
    pub async fn close_session(&self, id: &SessionId) -> Result<(), ErrorKind> {
        let mut session = self
            .registry
            .get(id)
            .ok_or_else(|| ErrorKind::contract(format!("unknown session {id}")))?;

        self.store
            .expire_session_inbound(id)
            .await
            .map_err(|e| e.into_core())?;

        self.bridge
            .kill_session(&session.multiplexer_session_name)
            .await
            .map_err(MuxError::into_kind)?;

        let now = self.clock.now();
        session
            .transition(SessionState::Closed)
            .map_err(|_| ErrorKind::contract(format!("session {id} already closed")))?;
        self.store
            .set_session_state(id, SessionState::Closed, now)
            .await
            .map_err(|e| e.into_core())?;
        self.registry.update(session);
        Ok(())
    }

    /// Returns new pane bytes since the pane's last capture. The
    /// session-file sink variant (spec §4.4) lives in the outbox poller,
    /// which chooses between this and a file read based on
    /// `adapter_metadata`, never branching on adapter identity.
    pub async fn poll_output(&self, id: &SessionId) -> Result<String, ErrorKind> {
        let session = self
            .registry
            .get(id)
            .ok_or_else(|| ErrorKind::contract(format!("unknown session {id}")))?;
        self.bridge
            .capture_pane(&session.multiplexer_session_name)
            .await
            .map_err(MuxError::into_kind)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
