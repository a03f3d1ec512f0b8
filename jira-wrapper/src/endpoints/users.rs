use tracing::debug;

use crate::client::{JiraClient, decode};
use crate::consts::{ASSIGNABLE_USERS_PATH, USER_PAGE_SIZE, USER_SEARCH_CAP, USER_SEARCH_FIRST_OFFSET};
use crate::error::Result;
use crate::models::JiraUser;

impl JiraClient {
  /// List the users that can be assigned issues in `project_key`.
  ///
  /// Pages are requested at offsets 1, 101, 201, … until Jira returns an
  /// empty page.
  pub async fn get_project_users(&self, project_key: &str) -> Result<Vec<JiraUser>> {
    let mut users = Vec::new();

    for start_at in (USER_SEARCH_FIRST_OFFSET..USER_SEARCH_CAP).step_by(USER_PAGE_SIZE as usize) {
      let query = [
        ("project", project_key.to_string()),
        ("startAt", start_at.to_string()),
        ("maxResults", USER_PAGE_SIZE.to_string()),
      ];
      let page: Vec<JiraUser> = decode(self.get(ASSIGNABLE_USERS_PATH, &query).await?, "assignable users")?;
      if page.is_empty() {
        break;
      }
      debug!(project_key, start_at, count = page.len(), "fetched assignable users");
      users.extend(page);
    }

    Ok(users)
  }
}
