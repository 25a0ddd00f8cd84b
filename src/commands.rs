// Command dispatch.
// Routes the parsed invocation mode to its action and collects launcher items.

use crate::cache::NEVER_EXPIRE;
use crate::cli::{Command, join_query};
use crate::context::Context;
use crate::error::Result;
use crate::feedback::{Feedback, Item};
use crate::filter::{MatchOn, filter};
use crate::github::{Member, Repository};

/// Cache key for the organization's private repositories.
pub const REPOS_CACHE_KEY: &str = "private";

/// Cache key for the organization's members.
pub const MEMBERS_CACHE_KEY: &str = "private-users";

/// Rules applied to repository names and member logins.
pub const MATCH: MatchOn = MatchOn::STARTSWITH
    .union(MatchOn::CAPITALS)
    .union(MatchOn::ATOM)
    .union(MatchOn::INITIALS_STARTSWITH)
    .union(MatchOn::SUBSTRING);

/// Candidates must score above this to be shown.
pub const MIN_SCORE: f64 = 50.0;

/// Run one invocation. No subcommand yields an empty item list.
pub async fn dispatch(ctx: &mut Context, command: Option<&Command>) -> Result<Feedback> {
    let mut feedback = Feedback::new();

    match command {
        Some(Command::List) => list_actions(&mut feedback),
        Some(Command::Repos { query }) => {
            search_repos(ctx, &join_query(query), &mut feedback).await?
        }
        Some(Command::Users { query }) => {
            search_members(ctx, &join_query(query), &mut feedback).await?
        }
        Some(Command::Pulls { query }) => {
            open_pulls(ctx, &join_query(query), &mut feedback).await?
        }
        Some(Command::Refreshcache) => refresh_cache(ctx, &mut feedback)?,
        None => tracing::debug!("no mode given"),
    }

    Ok(feedback)
}

/// Show available workflow actions.
pub fn list_actions(feedback: &mut Feedback) {
    let actions = [
        ("View Log File", "Open the log file in Console.app", "log"),
        (
            "View Source",
            "Open the ghelper repository in your browser",
            "source",
        ),
        (
            "CLEAR REPOSITORY CACHE",
            "Clears any cached repositories (next lookup will rebuild the cache).",
            "refreshcache",
        ),
    ];

    for (title, subtitle, arg) in actions {
        feedback.push(Item::new(title, subtitle).arg(arg).uid(arg).valid(true));
    }
}

/// Filter the cached repositories by name, populating the cache on a miss.
pub async fn search_repos(ctx: &mut Context, query: &str, feedback: &mut Feedback) -> Result<()> {
    let repos: Vec<Repository> = ctx
        .cache
        .cached_or_fetch(
            REPOS_CACHE_KEY,
            NEVER_EXPIRE,
            ctx.client.get_org_repos(&ctx.org),
        )
        .await?;

    for repo in filter(query, &repos, |r| r.name.as_str(), MATCH, MIN_SCORE) {
        feedback.push(
            Item::new(&repo.name, &repo.url)
                .arg(&repo.name)
                .uid(format!("repo-{}", repo.id))
                .valid(true),
        );
    }
    Ok(())
}

/// Filter the cached members by login, populating the cache on a miss.
pub async fn search_members(
    ctx: &mut Context,
    query: &str,
    feedback: &mut Feedback,
) -> Result<()> {
    let members: Vec<Member> = ctx
        .cache
        .cached_or_fetch(
            MEMBERS_CACHE_KEY,
            NEVER_EXPIRE,
            ctx.client.get_org_members(&ctx.org),
        )
        .await?;

    for member in filter(query, &members, |m| m.login.as_str(), MATCH, MIN_SCORE) {
        feedback.push(
            Item::new(&member.login, &member.url)
                .arg(&member.login)
                .uid(format!("member-{}", member.id))
                .valid(true),
        );
    }
    Ok(())
}

/// List open pull requests for the repository named by `repo`. Never cached.
pub async fn open_pulls(ctx: &mut Context, repo: &str, feedback: &mut Feedback) -> Result<()> {
    let pulls = ctx.client.get_open_pulls(&ctx.org, repo).await?;

    if pulls.is_empty() {
        feedback.push(Item::new(format!("Could not find any open PRs for {}", repo), "").valid(true));
        return Ok(());
    }

    for pr in &pulls {
        feedback.push(
            Item::new(pr.display_title(), pr.display_subtitle())
                .arg(&pr.html_url)
                .valid(true),
        );
    }
    Ok(())
}

/// Report the repository cache age, then drop both cached listings.
pub fn refresh_cache(ctx: &Context, feedback: &mut Feedback) -> Result<()> {
    let age = ctx.cache.age(REPOS_CACHE_KEY);
    feedback.push(Item::new(
        age.as_secs().to_string(),
        "seconds since the cache was built",
    ));
    feedback.push(Item::new("removing cache file", ""));

    ctx.cache.clear(REPOS_CACHE_KEY)?;
    ctx.cache.clear(MEMBERS_CACHE_KEY)?;

    if ctx.dry_run {
        feedback.push(Item::new("dry run: cache kept", "nothing was removed"));
    } else {
        feedback.push(Item::new(
            "cache removed",
            "next repo search will trigger a rebuild",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::error::GhelperError;
    use crate::github::{GitHubClient, MEMBER_PAGES, REPO_PAGES};
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        server: MockServer,
        cache_dir: TempDir,
    }

    impl Harness {
        async fn start() -> Self {
            Self {
                server: MockServer::start().await,
                cache_dir: TempDir::new().unwrap(),
            }
        }

        fn context(&self, dry_run: bool) -> Context {
            let client = GitHubClient::with_base_url("secret", &self.server.uri()).unwrap();
            Context::new(
                "acme",
                client,
                CacheStore::new(self.cache_dir.path()),
                dry_run,
            )
        }

        /// Serve `first_page` as page 1 of `endpoint` and empty arrays after it,
        /// expecting each page to be requested `runs` times.
        async fn mount_pages(&self, endpoint: &str, pages: u32, first_page: Value, runs: u64) {
            for page in 1..=pages {
                let body = if page == 1 { first_page.clone() } else { json!([]) };
                Mock::given(method("GET"))
                    .and(path(endpoint))
                    .and(query_param("page", page.to_string()))
                    .and(query_param("per_page", "100"))
                    .respond_with(ResponseTemplate::new(200).set_body_json(body))
                    .expect(runs)
                    .mount(&self.server)
                    .await;
            }
        }

        async fn mount_repos(&self, names: &[&str], runs: u64) {
            let repos: Vec<Value> = names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    json!({
                        "id": i + 1,
                        "name": name,
                        "url": format!("https://api.github.com/repos/acme/{}", name),
                        "html_url": format!("https://github.com/acme/{}", name),
                    })
                })
                .collect();
            self.mount_pages("/orgs/acme/repos", REPO_PAGES, Value::Array(repos), runs)
                .await;
        }

        async fn mount_pulls(&self, repo: &str, body: Value) {
            Mock::given(method("GET"))
                .and(path(format!("/repos/acme/{}/pulls", repo)))
                .and(query_param("state", "open"))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&self.server)
                .await;
        }
    }

    fn titles(feedback: &Feedback) -> Vec<&str> {
        feedback.items().iter().map(|i| i.title.as_str()).collect()
    }

    fn repos_cmd(query: &str) -> Command {
        Command::Repos {
            query: vec![query.to_string()],
        }
    }

    #[tokio::test]
    async fn test_list_actions() {
        let harness = Harness::start().await;
        let mut ctx = harness.context(false);

        let feedback = dispatch(&mut ctx, Some(&Command::List)).await.unwrap();
        assert_eq!(
            titles(&feedback),
            ["View Log File", "View Source", "CLEAR REPOSITORY CACHE"]
        );
        for item in feedback.items() {
            assert!(item.valid);
            assert_eq!(item.arg, item.uid);
        }
        assert_eq!(feedback.items()[2].arg.as_deref(), Some("refreshcache"));
    }

    #[tokio::test]
    async fn test_no_mode_emits_nothing() {
        let harness = Harness::start().await;
        let mut ctx = harness.context(true);

        let feedback = dispatch(&mut ctx, None).await.unwrap();
        assert!(feedback.is_empty());
    }

    #[tokio::test]
    async fn test_search_repos_filters_and_caches() {
        let harness = Harness::start().await;
        harness
            .mount_repos(&["ghelper", "other-repo", "github-tools"], 1)
            .await;
        let mut ctx = harness.context(false);

        let feedback = dispatch(&mut ctx, Some(&repos_cmd("gh"))).await.unwrap();
        assert_eq!(titles(&feedback), ["ghelper", "github-tools"]);

        let first = &feedback.items()[0];
        assert_eq!(first.subtitle, "https://github.com/acme/ghelper");
        assert_eq!(first.arg.as_deref(), Some("ghelper"));
        assert_eq!(first.uid.as_deref(), Some("repo-1"));
        assert!(first.valid);

        // Served from the cache: the mocks expect a single run.
        let again = dispatch(&mut ctx, Some(&repos_cmd("other"))).await.unwrap();
        assert_eq!(titles(&again), ["other-repo"]);
        assert!(harness.cache_dir.path().join("private.json").exists());
    }

    #[tokio::test]
    async fn test_empty_query_lists_all_cached_repos() {
        let harness = Harness::start().await;
        harness
            .mount_repos(&["ghelper", "other-repo", "github-tools"], 1)
            .await;
        let mut ctx = harness.context(false);

        let feedback = dispatch(&mut ctx, Some(&repos_cmd(""))).await.unwrap();
        assert_eq!(titles(&feedback), ["ghelper", "other-repo", "github-tools"]);
    }

    #[tokio::test]
    async fn test_refresh_then_search_refetches() {
        let harness = Harness::start().await;
        harness.mount_repos(&["ghelper"], 2).await;
        let mut ctx = harness.context(false);

        dispatch(&mut ctx, Some(&repos_cmd("gh"))).await.unwrap();
        let refreshed = dispatch(&mut ctx, Some(&Command::Refreshcache)).await.unwrap();
        assert_eq!(titles(&refreshed)[1..], ["removing cache file", "cache removed"]);
        assert!(!harness.cache_dir.path().join("private.json").exists());

        let feedback = dispatch(&mut ctx, Some(&repos_cmd("gh"))).await.unwrap();
        assert_eq!(titles(&feedback), ["ghelper"]);
    }

    #[tokio::test]
    async fn test_refresh_reports_age_and_clears_members() {
        let harness = Harness::start().await;
        let ctx = harness.context(false);
        ctx.cache
            .write(MEMBERS_CACHE_KEY, &Vec::<Member>::new())
            .unwrap();

        let mut feedback = Feedback::new();
        refresh_cache(&ctx, &mut feedback).unwrap();

        assert_eq!(feedback.len(), 3);
        assert_eq!(feedback.items()[0].title, "0");
        assert!(!ctx.cache.path_for(MEMBERS_CACHE_KEY).exists());
    }

    #[tokio::test]
    async fn test_dry_run_refresh_keeps_cache() {
        let harness = Harness::start().await;
        CacheStore::new(harness.cache_dir.path())
            .write(REPOS_CACHE_KEY, &Vec::<Repository>::new())
            .unwrap();
        let mut ctx = harness.context(true);

        let feedback = dispatch(&mut ctx, Some(&Command::Refreshcache)).await.unwrap();
        assert_eq!(feedback.items()[2].title, "dry run: cache kept");
        assert!(ctx.cache.path_for(REPOS_CACHE_KEY).exists());
    }

    #[tokio::test]
    async fn test_search_members_by_login() {
        let harness = Harness::start().await;
        harness
            .mount_pages(
                "/orgs/acme/members",
                MEMBER_PAGES,
                json!([
                    { "id": 1, "login": "octocat", "html_url": "https://github.com/octocat" },
                    { "id": 2, "login": "hubot", "html_url": "https://github.com/hubot" }
                ]),
                1,
            )
            .await;
        let mut ctx = harness.context(false);

        let command = Command::Users {
            query: vec!["octo".to_string()],
        };
        let feedback = dispatch(&mut ctx, Some(&command)).await.unwrap();

        assert_eq!(titles(&feedback), ["octocat"]);
        let item = &feedback.items()[0];
        assert_eq!(item.subtitle, "https://github.com/octocat");
        assert_eq!(item.arg.as_deref(), Some("octocat"));
        assert_eq!(item.uid.as_deref(), Some("member-1"));
        assert!(harness.cache_dir.path().join("private-users.json").exists());
    }

    #[tokio::test]
    async fn test_dry_run_search_does_not_write_cache() {
        let harness = Harness::start().await;
        harness.mount_repos(&["ghelper"], 1).await;
        let mut ctx = harness.context(true);

        let feedback = dispatch(&mut ctx, Some(&repos_cmd("gh"))).await.unwrap();
        assert_eq!(titles(&feedback), ["ghelper"]);
        assert!(!harness.cache_dir.path().join("private.json").exists());
    }

    #[tokio::test]
    async fn test_pulls_empty_emits_single_notice() {
        let harness = Harness::start().await;
        harness.mount_pulls("ghelper", json!([])).await;
        let mut ctx = harness.context(false);

        let command = Command::Pulls {
            query: vec!["ghelper".to_string()],
        };
        let feedback = dispatch(&mut ctx, Some(&command)).await.unwrap();

        assert_eq!(titles(&feedback), ["Could not find any open PRs for ghelper"]);
        assert!(feedback.items()[0].arg.is_none());
    }

    #[tokio::test]
    async fn test_pulls_one_item_per_pull_request() {
        let harness = Harness::start().await;
        let pulls: Vec<Value> = (1..=3)
            .map(|n| {
                json!({
                    "number": n,
                    "title": format!("Change {}", n),
                    "user": { "id": 7, "login": "octocat", "html_url": "https://github.com/octocat" },
                    "created_at": "2025-03-01T12:00:00Z",
                    "html_url": format!("https://github.com/acme/ghelper/pull/{}", n),
                })
            })
            .collect();
        harness.mount_pulls("ghelper", Value::Array(pulls)).await;
        let mut ctx = harness.context(false);

        let command = Command::Pulls {
            query: vec!["ghelper".to_string()],
        };
        let feedback = dispatch(&mut ctx, Some(&command)).await.unwrap();

        assert_eq!(feedback.len(), 3);
        for (n, item) in (1..=3).zip(feedback.items()) {
            assert_eq!(item.title, format!("Change {} (PR-{})", n, n));
            assert_eq!(
                item.subtitle,
                "Opened by: octocat, on: 2025-03-01T12:00:00Z"
            );
            assert_eq!(
                item.arg.as_deref(),
                Some(format!("https://github.com/acme/ghelper/pull/{}", n).as_str())
            );
        }
    }

    #[tokio::test]
    async fn test_api_failure_propagates_without_caching() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&harness.server)
            .await;
        let mut ctx = harness.context(false);

        let result = dispatch(&mut ctx, Some(&repos_cmd("gh"))).await;
        assert!(matches!(result, Err(GhelperError::Unauthorized)));
        assert!(!harness.cache_dir.path().join("private.json").exists());
    }
}
