use serde::{Deserialize, Serialize};
use tradegate_core::{AppError, AppResult, NonEmptyString};

use crate::RoleId;

/// Role name users fall back to when their last role is deleted.
pub const DEFAULT_FALLBACK_ROLE_NAME: &str = "ROLE_USER";

/// Validated role fields not yet bound to a stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDraft {
    name: NonEmptyString,
    description: Option<String>,
}

impl RoleDraft {
    /// Validates role fields. Names are trimmed; blank descriptions become absent.
    pub fn new(name: impl Into<String>, description: Option<String>) -> AppResult<Self> {
        let name: String = name.into();
        let name = NonEmptyString::new(name.trim())
            .map_err(|_| AppError::Validation("role name is required".to_owned()))?;
        let description = description
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self { name, description })
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Named bundle of permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    description: Option<String>,
}

impl Role {
    /// Binds validated fields to a stored identifier.
    #[must_use]
    pub fn new(id: RoleId, draft: RoleDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the editable fields of this role.
    #[must_use]
    pub fn draft(&self) -> RoleDraft {
        RoleDraft {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}
