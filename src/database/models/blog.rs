use serde::{Deserialize, Serialize};

use super::{non_empty, Timestamp};
use crate::auth::IdentityClaim;
use crate::database::DocumentId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Draft,
    Published,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
        }
    }
}

/// Author details copied from the creator's identity claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogAuthor {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&IdentityClaim> for BlogAuthor {
    fn from(claim: &IdentityClaim) -> Self {
        Self {
            uid: claim.uid.clone(),
            email: claim.email.clone(),
            name: claim.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub content: String,
    #[serde(default)]
    pub status: BlogStatus,
    pub author: BlogAuthor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBlogPost {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub content: Option<String>,
}

impl NewBlogPost {
    /// New posts always start as drafts. `None` when title or content is
    /// missing.
    pub fn into_post(self, author: &IdentityClaim, now: Timestamp) -> Option<BlogPost> {
        Some(BlogPost {
            id: None,
            title: non_empty(self.title)?,
            thumbnail: non_empty(self.thumbnail),
            content: non_empty(self.content)?,
            status: BlogStatus::Draft,
            author: BlogAuthor::from(author),
            created_at: Some(now),
            updated_at: Some(now),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogStatusChange {
    pub status: BlogStatus,
}
