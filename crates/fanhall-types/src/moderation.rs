//! Moderation permission flags and scope kinds
//!
//! Grants carry an ordered set of named boolean flags. The flag names
//! double as column names in the grant tables, so each enum maps to a
//! fixed column string and the SQL layer can select a static query per
//! flag instead of synthesizing SQL at runtime.

use serde::{Deserialize, Serialize};

/// Permission flags a fandom moderator can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FandomFlag {
    /// Edit the fandom itself
    EditF,
    /// Manage the fandom's moderator roster
    ManageF,
    /// Ban users at fandom scope
    BanF,
    /// Create blogs inside the fandom
    CreateB,
    /// Edit any blog inside the fandom
    EditB,
    /// Edit any post inside the fandom
    EditP,
    /// Edit any comment inside the fandom
    EditC,
}

impl FandomFlag {
    /// Column name in `fandom_moders`
    pub fn column(self) -> &'static str {
        match self {
            Self::EditF => "edit_f",
            Self::ManageF => "manage_f",
            Self::BanF => "ban_f",
            Self::CreateB => "create_b",
            Self::EditB => "edit_b",
            Self::EditP => "edit_p",
            Self::EditC => "edit_c",
        }
    }
}

/// Permission flags a blog moderator can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogFlag {
    /// Edit the blog itself
    EditB,
    /// Manage the blog's moderator roster
    ManageB,
    /// Ban users at blog scope
    BanB,
    /// Create posts in the blog
    CreateP,
    /// Edit any post in the blog
    EditP,
    /// Edit any comment in the blog
    EditC,
}

impl BlogFlag {
    /// Column name in `blog_moders`
    pub fn column(self) -> &'static str {
        match self {
            Self::EditB => "edit_b",
            Self::ManageB => "manage_b",
            Self::BanB => "ban_b",
            Self::CreateP => "create_p",
            Self::EditP => "edit_p",
            Self::EditC => "edit_c",
        }
    }
}

/// Containment level at which a grant or ban is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Fandom,
    Blog,
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fandom => write!(f, "fandom"),
            Self::Blog => write!(f, "blog"),
        }
    }
}
