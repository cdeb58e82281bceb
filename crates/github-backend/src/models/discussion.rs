use serde::Deserialize;

/// `data` of the repository id lookup
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryIdData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryNode {
    #[serde(default)]
    pub id: Option<String>,
}

/// `data` of the `createDiscussion` mutation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiscussionData {
    #[serde(rename = "createDiscussion")]
    pub create_discussion: Option<CreateDiscussionPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiscussionPayload {
    pub discussion: Option<DiscussionNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}
