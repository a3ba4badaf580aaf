use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::de::DeserializeOwned;

use crate::http::json_error;

/// Provider-agnostic description of a push, handed to whatever triggers
/// pipelines.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushEvent {
    pub branch: String,
    pub hostname: String,
    pub full_name: String,
    pub scm_type: String,
    pub clone_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("payload must contain branch name")]
    MissingBranch,
}

impl ResponseError for ValidationError {
    fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::MissingBranch => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error(self.status_code(), self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Bitbucket,
    BitbucketServer,
    GitHub,
    GitLab,
}

impl Provider {
    /// Header carrying the event type.
    pub fn event_header(self) -> &'static str {
        match self {
            Provider::Bitbucket | Provider::BitbucketServer => "X-Event-Key",
            Provider::GitHub => "X-GitHub-Event",
            Provider::GitLab => "X-Gitlab-Event",
        }
    }

    /// Value of [`Self::event_header`] for a push.
    pub fn push_event(self) -> &'static str {
        match self {
            Provider::Bitbucket => "repo:push",
            Provider::BitbucketServer => "repo:refs_changed",
            Provider::GitHub => "push",
            Provider::GitLab => "Push Hook",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::Bitbucket => "bitbucket",
            Provider::BitbucketServer => "bitbucketserver",
            Provider::GitHub => "github",
            Provider::GitLab => "gitlab",
        })
    }
}

/// A provider's push webhook body.
pub trait PushPayload: DeserializeOwned {
    const PROVIDER: Provider;

    fn branch(&self) -> Result<String, ValidationError>;
    fn hostname(&self) -> String;
    fn full_name(&self) -> String;
    fn scm_type(&self) -> String;
    /// Clone URLs with credentials stripped.
    fn clone_urls(&self) -> Vec<String>;

    fn to_event(&self) -> Result<PushEvent, ValidationError> {
        let branch = self.branch()?;
        Ok(PushEvent {
            branch,
            hostname: self.hostname(),
            full_name: self.full_name(),
            scm_type: self.scm_type(),
            clone_urls: self.clone_urls(),
        })
    }
}

/// Branch name of a fully qualified `refs/heads/<branch>` ref.
pub fn branch_of_ref(reference: &str) -> Result<String, ValidationError> {
    match reference.strip_prefix("refs/heads/") {
        Some(branch) if !branch.is_empty() => Ok(branch.to_owned()),
        _ => Err(ValidationError::MissingBranch),
    }
}

/// Picks the first ref tagged as a branch, in payload order.
///
/// `refs` yields `(type, display name)` of every change that has a ref.
pub fn first_branch<'a, I>(refs: I) -> Result<String, ValidationError>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    refs.into_iter()
        .find(|(kind, _)| kind.eq_ignore_ascii_case("branch"))
        .and_then(|(_, name)| name)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .ok_or(ValidationError::MissingBranch)
}
