// GitHub API endpoint functions.
// Fixed-range pagination over organization resources and the open pull request query.

use serde::de::DeserializeOwned;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{Member, Owner, PullRequest, Repository, RepositoryPayload};

/// Page size requested from list endpoints.
pub const PER_PAGE: u32 = 100;

/// Page ceiling for the repository listing.
pub const REPO_PAGES: u32 = 7;

/// Page ceiling for the member listing.
pub const MEMBER_PAGES: u32 = 6;

/// Organization resource that can be paginated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Repositories,
    Members,
}

impl Resource {
    fn endpoint(self, org: &str) -> String {
        match self {
            Resource::Repositories => format!("/orgs/{}/repos", org),
            Resource::Members => format!("/orgs/{}/members", org),
        }
    }

    fn filters(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Resource::Repositories => &[("type", "private")],
            Resource::Members => &[],
        }
    }

    /// Number of pages fetched for this resource.
    pub fn max_pages(self) -> u32 {
        match self {
            Resource::Repositories => REPO_PAGES,
            Resource::Members => MEMBER_PAGES,
        }
    }
}

impl GitHubClient {
    /// Fetch pages `1..=max_pages` of `resource` and flatten them in order.
    ///
    /// The page count is fixed: the loop does not stop on a short page, and
    /// anything past `max_pages * PER_PAGE` items is not fetched.
    pub async fn paginate<T: DeserializeOwned>(
        &mut self,
        resource: Resource,
        org: &str,
        max_pages: u32,
    ) -> Result<Vec<T>> {
        let endpoint = resource.endpoint(org);
        let mut items = Vec::new();

        for page in 1..=max_pages {
            let mut params = vec![("page", page.to_string()), ("per_page", PER_PAGE.to_string())];
            params.extend(
                resource
                    .filters()
                    .iter()
                    .map(|(key, value)| (*key, value.to_string())),
            );

            let batch: Vec<T> = self.get_json(&endpoint, &params).await?;
            tracing::debug!(?resource, page, count = batch.len(), "fetched page");
            items.extend(batch);
        }

        tracing::info!(?resource, org, total = items.len(), "pagination finished");
        Ok(items)
    }

    /// Get the organization's private repositories.
    pub async fn get_org_repos(&mut self, org: &str) -> Result<Vec<Repository>> {
        let payloads: Vec<RepositoryPayload> = self
            .paginate(Resource::Repositories, org, Resource::Repositories.max_pages())
            .await?;
        Ok(payloads.into_iter().map(Repository::from).collect())
    }

    /// Get the organization's members.
    pub async fn get_org_members(&mut self, org: &str) -> Result<Vec<Member>> {
        let owners: Vec<Owner> = self
            .paginate(Resource::Members, org, Resource::Members.max_pages())
            .await?;
        Ok(owners.into_iter().map(Member::from).collect())
    }

    /// Get open pull requests for a repository in the organization.
    pub async fn get_open_pulls(&mut self, org: &str, repo: &str) -> Result<Vec<PullRequest>> {
        self.get_json(&format!("/repos/{}/{}/pulls", org, repo), &[("state", "open")])
            .await
    }
}
