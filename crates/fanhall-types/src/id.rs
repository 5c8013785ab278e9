//! Entity identifier newtypes
//!
//! Ids are server-assigned monotonic integers (BIGSERIAL). `UserId(0)` is
//! the anonymous principal: it is never a real account and fails every
//! permission predicate.

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Parse an id from its decimal string form
            pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
                Ok(Self(s.parse()?))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Unique account identifier
    UserId
);
id_type!(
    /// Unique fandom (community) identifier
    FandomId
);
id_type!(
    /// Unique blog identifier
    BlogId
);
id_type!(
    /// Unique post identifier
    PostId
);
id_type!(
    /// Unique comment identifier
    CommentId
);

impl UserId {
    /// The anonymous principal. Attached to requests without credentials.
    pub const ANONYMOUS: UserId = UserId(0);

    /// Whether this principal is the anonymous one
    pub fn is_anonymous(self) -> bool {
        self.0 == 0
    }
}
