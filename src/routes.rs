use tracing::debug;

/// Tabs of the pull request page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum PullRequestSection {
    Conversation,
    Commits,
    FilesChanged,
    Checks,
}

impl PullRequestSection {
    pub fn as_str(self) -> &'static str {
        match self {
            PullRequestSection::Conversation => "conversation",
            PullRequestSection::Commits => "commits",
            PullRequestSection::FilesChanged => "changes",
            PullRequestSection::Checks => "checks",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteParams<'a> {
    pub repo_path: &'a str,
    pub pull_request_id: &'a str,
    pub pull_request_section: Option<PullRequestSection>,
}

/// Turns route parameters into a URL the host can navigate to.
pub trait Routes {
    fn to_pull_request(&self, params: RouteParams<'_>) -> String;
}

/// `{base_url}/{repo}/pulls/{id}[/{section}]`, the Harness Code route
/// scheme. An empty base yields host-relative paths.
#[derive(Debug, Clone, Default)]
pub struct WebRoutes {
    base_url: String,
}

impl WebRoutes {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Links have no host and cannot be opened outside the viewer.
    pub fn is_relative(&self) -> bool {
        self.base_url.is_empty()
    }
}

impl Routes for WebRoutes {
    fn to_pull_request(&self, params: RouteParams<'_>) -> String {
        let mut url = format!(
            "{}/{}/pulls/{}",
            self.base_url, params.repo_path, params.pull_request_id
        );
        if let Some(section) = params.pull_request_section {
            url.push('/');
            url.push_str(section.as_str());
        }
        debug!(%url, "built pull request route");
        url
    }
}
