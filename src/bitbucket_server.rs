use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    event::{self, Provider, PushPayload, ValidationError},
    sanitize,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub slug: String,
    pub project: Project,
    #[serde(rename = "scmId")]
    pub scm_id: String,
    #[serde(default)]
    pub links: HashMap<String, Vec<Link>>,
}

impl Repository {
    pub fn hostname(&self) -> String {
        self.links()
            .get("self")
            .and_then(|links| links.first())
            .map(|link| sanitize::hostname(&link.href))
            .unwrap_or_default()
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.project.key, self.slug).to_lowercase()
    }

    pub fn scm(&self) -> &str {
        &self.scm_id
    }

    pub fn links(&self) -> &HashMap<String, Vec<Link>> {
        &self.links
    }

    /// `clone` links for the http(s) and ssh protocols, in payload order.
    pub fn clone_links(&self) -> impl Iterator<Item = &Link> {
        self.links()
            .get("clone")
            .into_iter()
            .flatten()
            .filter(|link| {
                link.name.as_deref().map_or(false, |name| {
                    ["http", "https", "ssh"]
                        .iter()
                        .any(|proto| name.eq_ignore_ascii_case(proto))
                })
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ref {
    #[serde(rename = "displayId")]
    pub display_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    #[serde(rename = "ref")]
    pub reference: Option<Ref>,
}

/// `repo:refs_changed` event.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    #[serde(default)]
    pub changes: Vec<Change>,
    pub repository: Repository,
}

impl PushPayload for PushEvent {
    const PROVIDER: Provider = Provider::BitbucketServer;

    fn branch(&self) -> Result<String, ValidationError> {
        event::first_branch(
            self.changes
                .iter()
                .filter_map(|change| change.reference.as_ref())
                .map(|r| (r.kind.as_deref().unwrap_or(""), r.display_id.as_deref())),
        )
    }

    fn hostname(&self) -> String {
        self.repository.hostname()
    }

    fn full_name(&self) -> String {
        self.repository.full_name()
    }

    fn scm_type(&self) -> String {
        self.repository.scm().to_owned()
    }

    fn clone_urls(&self) -> Vec<String> {
        self.repository
            .clone_links()
            .map(|link| sanitize::without_credentials(&link.href))
            .collect()
    }
}
