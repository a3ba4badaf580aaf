use serde::Deserialize;

use crate::{
    event::{self, Provider, PushPayload, ValidationError},
    sanitize,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Links {
    pub html: Link,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub scm: String,
    pub links: Links,
}

impl Repository {
    pub fn hostname(&self) -> String {
        sanitize::hostname(&self.links.html.href)
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn scm(&self) -> &str {
        &self.scm
    }

    fn is_git(&self) -> bool {
        self.scm.eq_ignore_ascii_case("git")
    }

    /// Bitbucket Cloud doesn't send clone links with pushes, so they are
    /// built from the web link. Mercurial repositories only get the https one.
    pub fn clone_urls(&self) -> Vec<String> {
        let html = sanitize::without_credentials(self.links.html.href.trim_end_matches('/'));
        if !self.is_git() {
            return vec![html];
        }

        let mut urls = vec![format!("{}.git", html)];
        let host = self.hostname();
        if !host.is_empty() {
            urls.push(format!("ssh://{}/{}.git", host, self.full_name));
        }
        urls
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    /// Absent when the ref was deleted.
    pub new: Option<Target>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Push {
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// `repo:push` event.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    pub push: Push,
    pub repository: Repository,
}

impl PushPayload for PushEvent {
    const PROVIDER: Provider = Provider::Bitbucket;

    fn branch(&self) -> Result<String, ValidationError> {
        event::first_branch(
            self.push
                .changes
                .iter()
                .filter_map(|change| change.new.as_ref())
                .map(|target| (target.kind.as_str(), target.name.as_deref())),
        )
    }

    fn hostname(&self) -> String {
        self.repository.hostname()
    }

    fn full_name(&self) -> String {
        self.repository.full_name().to_owned()
    }

    fn scm_type(&self) -> String {
        self.repository.scm().to_owned()
    }

    fn clone_urls(&self) -> Vec<String> {
        self.repository.clone_urls()
    }
}
