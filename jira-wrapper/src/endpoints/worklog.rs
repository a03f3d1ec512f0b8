use crate::client::JiraClient;
use crate::error::Result;
use crate::models::WorklogEntry;
use crate::parser::parse_worklog;

impl JiraClient {
  /// Fetch the worklog of an issue, oldest entry first.
  pub async fn get_worklog(&self, issue_key: &str) -> Result<Vec<WorklogEntry>> {
    let response = self
      .get(&format!("rest/api/3/issue/{issue_key}/worklog"), &[])
      .await?;
    parse_worklog(&response, issue_key)
  }
}
