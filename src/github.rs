use serde::Deserialize;

use crate::{
    event::{self, Provider, PushPayload, ValidationError},
    sanitize,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub html_url: String,
    pub clone_url: Option<String>,
    pub ssh_url: Option<String>,
    pub git_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub reference: String,
    pub repository: Repository,
}

impl PushPayload for PushEvent {
    const PROVIDER: Provider = Provider::GitHub;

    fn branch(&self) -> Result<String, ValidationError> {
        event::branch_of_ref(&self.reference)
    }

    fn hostname(&self) -> String {
        sanitize::hostname(&self.repository.html_url)
    }

    fn full_name(&self) -> String {
        self.repository.full_name.clone()
    }

    fn scm_type(&self) -> String {
        "git".into()
    }

    fn clone_urls(&self) -> Vec<String> {
        let Repository {
            clone_url,
            ssh_url,
            git_url,
            ..
        } = &self.repository;

        [clone_url, ssh_url, git_url]
            .iter()
            .filter_map(|url| url.as_deref())
            .map(sanitize::without_credentials)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(reference: &str) -> PushEvent {
        serde_json::from_value(json!({
            "ref": reference,
            "before": "0000000000000000000000000000000000000000",
            "after": "1111111111111111111111111111111111111111",
            "repository": {
                "name": "repo",
                "full_name": "org/repo",
                "html_url": "https://github.com/org/repo",
                "clone_url": "https://github.com/org/repo.git",
                "ssh_url": "git@github.com:org/repo.git",
                "git_url": "git://github.com/org/repo.git"
            }
        }))
        .unwrap()
    }

    #[test]
    fn branch_push() {
        let event = payload("refs/heads/main").to_event().unwrap();
        assert_eq!(event.branch, "main");
        assert_eq!(event.hostname, "github.com");
        assert_eq!(event.full_name, "org/repo");
        assert_eq!(event.scm_type, "git");
        assert_eq!(
            event.clone_urls,
            vec![
                "https://github.com/org/repo.git".to_owned(),
                "git@github.com:org/repo.git".to_owned(),
                "git://github.com/org/repo.git".to_owned(),
            ]
        );
    }

    #[test]
    fn tag_push() {
        assert_eq!(
            payload("refs/tags/v1.0").to_event(),
            Err(ValidationError::MissingBranch)
        );
    }

    #[test]
    fn absent_clone_urls_are_skipped() {
        let event: PushEvent = serde_json::from_value(json!({
            "ref": "refs/heads/main",
            "repository": {
                "full_name": "org/repo",
                "html_url": "https://github.example.com/org/repo",
                "clone_url": "https://token@github.example.com/org/repo.git"
            }
        }))
        .unwrap();
        assert_eq!(
            event.clone_urls(),
            vec!["https://github.example.com/org/repo.git".to_owned()]
        );
    }
}
