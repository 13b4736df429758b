use serde::{Deserialize, Serialize};
use tradegate_core::{AppError, AppResult, NonEmptyString};

use crate::PermissionId;

/// Maximum permission name length in characters.
pub const PERMISSION_NAME_MAX_LENGTH: usize = 30;

/// Maximum permission description length in characters.
pub const PERMISSION_DESCRIPTION_MAX_LENGTH: usize = 300;

/// Validated permission fields not yet bound to a stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDraft {
    name: NonEmptyString,
    description: Option<String>,
}

impl PermissionDraft {
    /// Validates permission fields.
    ///
    /// The name is trimmed and must hold between 1 and
    /// [`PERMISSION_NAME_MAX_LENGTH`] characters. A blank description is
    /// stored as absent.
    pub fn new(name: impl Into<String>, description: Option<String>) -> AppResult<Self> {
        let name: String = name.into();
        let name = NonEmptyString::new(name.trim())
            .map_err(|_| AppError::Validation("permission name is required".to_owned()))?;

        if name.as_str().chars().count() > PERMISSION_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "permission name must not exceed {PERMISSION_NAME_MAX_LENGTH} characters"
            )));
        }

        let description = description
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        if let Some(description) = &description
            && description.chars().count() > PERMISSION_DESCRIPTION_MAX_LENGTH
        {
            return Err(AppError::Validation(format!(
                "permission description must not exceed {PERMISSION_DESCRIPTION_MAX_LENGTH} characters"
            )));
        }

        Ok(Self { name, description })
    }

    /// Returns the permission name.
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

/// Named capability that roles aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    name: NonEmptyString,
    description: Option<String>,
}

impl Permission {
    /// Binds validated fields to a stored identifier.
    #[must_use]
    pub fn new(id: PermissionId, draft: PermissionDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
        }
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the unique permission name.
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
