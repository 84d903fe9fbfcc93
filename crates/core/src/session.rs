//! The authenticated caller, passed explicitly into every operation.
//!
//! A `Session` is established when a login issues a token and is rebuilt
//! from that token on each request. It is cleared at logout, when the
//! refresh sessions are revoked and the access token is left to expire.

use serde::Serialize;

use crate::roles::Role;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: DbId,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The owner filter to apply to guest queries: `None` means every owner.
    pub fn owner_scope(&self) -> Option<DbId> {
        if self.is_admin() {
            None
        } else {
            Some(self.user_id)
        }
    }
}
