//! Constants for the jira-wrapper client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Issues requested per search page; also the largest single-request search.
pub const SEARCH_PAGE_SIZE: u64 = 100;

/// Default `max_results` for a search.
pub const DEFAULT_MAX_RESULTS: u64 = 100;

/// Field catalog entries requested per page.
pub const FIELD_PAGE_SIZE: u64 = 50;

/// Assignable users requested per page, and the step between page offsets.
pub const USER_PAGE_SIZE: u64 = 100;

/// First `startAt` used when listing assignable users.
pub const USER_SEARCH_FIRST_OFFSET: u64 = 1;

/// Offset at which user listing gives up even if pages keep coming.
pub const USER_SEARCH_CAP: u64 = 1_000_000;

/// Display name used for an empty assignee, reporter or creator.
pub const UNASSIGNED_DISPLAY_NAME: &str = "Not assigned";

/// Status a newly created issue starts in; no transition is applied for it.
pub const DEFAULT_STATUS: &str = "Backlog";

pub(crate) const SEARCH_PATH: &str = "rest/api/2/search";
pub(crate) const FIELD_SEARCH_PATH: &str = "rest/api/3/field/search";
pub(crate) const CREATE_ISSUE_PATH: &str = "rest/api/2/issue/";
pub(crate) const ASSIGNABLE_USERS_PATH: &str = "rest/api/2/user/assignable/search";
pub(crate) const MYSELF_PATH: &str = "rest/api/2/myself";
