// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RoleRequirement`: the per-endpoint clearance matrix (spec §4.6). An
//! empty role set means "any" — the endpoint only requires a valid
//! identity, not a specific role.

use teleclaude_core::{ErrorKind, HumanRole, Session, SystemRole};

#[derive(Debug, Clone, Copy)]
pub struct RoleRequirement {
    system_roles: &'static [SystemRole],
    human_roles: &'static [HumanRole],
}

impl RoleRequirement {
    /// No role restriction beyond a valid identity.
    pub const fn any() -> Self {
        Self {
            system_roles: &[],
            human_roles: &[],
        }
    }

    pub const fn system(roles: &'static [SystemRole]) -> Self {
        Self {
            system_roles: roles,
            human_roles: &[],
        }
    }

    pub const fn human(roles: &'static [HumanRole]) -> Self {
        Self {
            system_roles: &[],
            human_roles: roles,
        }
    }

    fn allows(&self, session: &Session) -> bool {
        let system_ok = self.system_roles.is_empty() || self.system_roles.contains(&session.system_role);
        let human_ok = self.human_roles.is_empty() || self.human_roles.contains(&session.human_role);
        system_ok && human_ok
    }

    /// Denial is always a [`ErrorKind::Role`] (spec §7): always 403, never
    /// retried.
    pub fn check(&self, session: &Session) -> Result<(), ErrorKind> {
        if self.allows(session) {
            Ok(())
        } else {
            Err(ErrorKind::role(format!(
                "session {} (system_role={}, human_role={}) is not cleared for this endpoint",
                session.id, session.system_role, session.human_role
            )))
        }
    }
}

#[cfg(test)]
#[path = "role_tests.rs"]
mod tests;
