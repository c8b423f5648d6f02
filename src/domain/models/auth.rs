use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    FrontDesk,
    Coach,
    Member,
}

impl Role {
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "owner" => Some(Role::Owner),
            "admin" => Some(Role::Admin),
            "front_desk" => Some(Role::FrontDesk),
            "coach" => Some(Role::Coach),
            "member" => Some(Role::Member),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::FrontDesk => "front_desk",
            Role::Coach => "coach",
            Role::Member => "member",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin | Role::FrontDesk | Role::Coach)
    }

    /// Roles that operate across all branches. Front-desk and coach
    /// accounts are pinned to the branch in their identity metadata.
    pub fn is_global(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller, resolved from the identity provider's
/// metadata blob. Never persisted by this service.
#[derive(Debug, Serialize, Clone)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub branch_id: Option<String>,
    pub member_id: Option<String>,
}

impl Principal {
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Role '{}' is not permitted to perform this operation",
                self.role
            )))
        }
    }

    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Role '{}' is not a staff role",
                self.role
            )))
        }
    }

    /// Effective branch filter for branch-scoped queries.
    ///
    /// Global roles pass the caller's filter through untouched. Scoped
    /// roles are forced onto their own branch: asking for another branch
    /// is rejected, and a scoped principal without branch metadata is
    /// rejected outright rather than granted a global view.
    pub fn scoped_branch(&self, requested: Option<String>) -> Result<Option<String>, AppError> {
        if self.role.is_global() {
            return Ok(requested);
        }

        let own = self.branch_id.clone().ok_or_else(|| {
            AppError::Forbidden(format!("Role '{}' has no branch assigned", self.role))
        })?;

        match requested {
            None => Ok(Some(own)),
            Some(b) if b == own => Ok(Some(own)),
            Some(b) => Err(AppError::Forbidden(format!(
                "Not permitted to access branch {}",
                b
            ))),
        }
    }
}

/// Token pair handed back by the identity provider after a password
/// sign-in or a refresh.
#[derive(Debug, Serialize, Clone)]
pub struct IdentitySession {
    pub access_token: String,
    pub refresh_token: String,
    pub principal: Principal,
}
