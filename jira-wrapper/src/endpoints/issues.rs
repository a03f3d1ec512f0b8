use serde::Deserialize;
use tracing::{info, warn};

use crate::client::{JiraClient, decode};
use crate::consts::CREATE_ISSUE_PATH;
use crate::endpoints::issue_path;
use crate::error::{JiraError, Result};
use crate::models::LinkedIssueSpec;
use crate::requests::{AssigneeUpdate, IssueUpdate, LabelOperation, NewIssue, TransitionRequest};

#[derive(Debug, Deserialize)]
struct CreatedIssue {
  key: String,
}

impl JiraClient {
  /// Create an issue and return its key.
  ///
  /// When the target status is anything other than "Backlog" the issue is
  /// moved there afterwards, then each link is added in order. These steps
  /// run after the issue exists and are not rolled back: if one fails the
  /// result is [`JiraError::IncompleteCreate`] carrying the new key.
  pub async fn create_issue(&self, issue: &NewIssue) -> Result<String> {
    let response = self.post(CREATE_ISSUE_PATH, &[], &issue.to_request()).await?;
    let CreatedIssue { key } = decode(response, "create issue response")?;
    info!(issue_key = %key, "created issue");

    if let Err(source) = self.finish_create(&key, issue).await {
      warn!(issue_key = %key, error = %source, "issue created but follow-up failed");
      return Err(JiraError::IncompleteCreate {
        key,
        source: Box::new(source),
      });
    }
    Ok(key)
  }

  async fn finish_create(&self, issue_key: &str, issue: &NewIssue) -> Result<()> {
    if issue.needs_transition() {
      self.change_transition(issue_key, issue.target_status()).await?;
    }
    self.add_links(issue_key, issue.linked_issues()).await
  }

  /// Close an issue through the transition named exactly `final_column`,
  /// recording `resolution` on the way.
  pub async fn resolve_issue(&self, issue_key: &str, resolution: &str, final_column: &str) -> Result<()> {
    let options = self.get_transitions(issue_key).await?;
    let transition = options
      .iter()
      .find(|option| option.name == final_column)
      .ok_or_else(|| JiraError::TransitionNotFound {
        issue_key: issue_key.to_string(),
        destination: final_column.to_string(),
      })?;

    let path = format!("{}/transitions", issue_path(issue_key));
    let query = [("expand", "transitions.fields".to_string())];
    self
      .post(&path, &query, &TransitionRequest::with_resolution(&transition.id, resolution))
      .await?;
    info!(issue_key, resolution, final_column, "resolved issue");
    Ok(())
  }

  pub async fn comment_issue(&self, issue_key: &str, body: &str) -> Result<()> {
    self.put(&issue_path(issue_key), &IssueUpdate::comment(body)).await?;
    info!(issue_key, "added comment");
    Ok(())
  }

  /// Add labels to an issue. Spaces are removed from each label first, as
  /// on creation, since Jira rejects labels containing them.
  pub async fn add_labels(&self, issue_key: &str, labels: &[&str]) -> Result<()> {
    let operations = labels
      .iter()
      .map(|label| LabelOperation::Add(label.replace(' ', "")))
      .collect();
    self.put(&issue_path(issue_key), &IssueUpdate::labels(operations)).await?;
    info!(issue_key, ?labels, "added labels");
    Ok(())
  }

  /// Remove labels from an issue. Names are sent as given.
  pub async fn remove_labels(&self, issue_key: &str, labels: &[&str]) -> Result<()> {
    let operations = labels
      .iter()
      .map(|label| LabelOperation::Remove(label.to_string()))
      .collect();
    self.put(&issue_path(issue_key), &IssueUpdate::labels(operations)).await?;
    info!(issue_key, ?labels, "removed labels");
    Ok(())
  }

  /// Assign an issue to the user with `account_id`
  pub async fn assign_issue(&self, issue_key: &str, account_id: &str) -> Result<()> {
    self.put(&issue_path(issue_key), &AssigneeUpdate::new(account_id)).await?;
    info!(issue_key, account_id, "assigned issue");
    Ok(())
  }

  pub async fn update_priority(&self, issue_key: &str, priority: &str) -> Result<()> {
    self.put(&issue_path(issue_key), &IssueUpdate::priority(priority)).await?;
    info!(issue_key, priority, "updated priority");
    Ok(())
  }

  /// Add each link with its own request, in order, stopping at the first
  /// failure.
  pub async fn add_links(&self, issue_key: &str, links: &[LinkedIssueSpec]) -> Result<()> {
    for link in links {
      self.put(&issue_path(issue_key), &IssueUpdate::link(link)).await?;
      info!(issue_key, linked_key = %link.linked_key, relation = %link.relation_name, "linked issue");
    }
    Ok(())
  }
}
