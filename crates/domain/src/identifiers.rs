//! Storage-assigned identifiers for graph nodes and links.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a storage-assigned identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier value.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a user record.
    UserId
);

entity_id!(
    /// Unique identifier for a role.
    RoleId
);

entity_id!(
    /// Unique identifier for a permission.
    PermissionId
);

entity_id!(
    /// Unique identifier for a role-to-permission link row.
    RolePermissionId
);

entity_id!(
    /// Unique identifier for a user-to-role link row.
    UserRoleId
);
