use tracing::info;

use crate::client::{JiraClient, decode};
use crate::error::{JiraError, Result};
use crate::models::{TransitionList, TransitionOption};
use crate::requests::TransitionRequest;

fn transitions_path(issue_key: &str) -> String {
  format!("rest/api/3/issue/{issue_key}/transitions")
}

/// Pick the first transition whose name contains `destination`.
///
/// Matching is a case-sensitive substring test, so `"Prog"` selects
/// `"In Progress"`. Options are tried in the order Jira returned them.
pub fn resolve_transition<'a>(
  issue_key: &str,
  options: &'a [TransitionOption],
  destination: &str,
) -> Result<&'a TransitionOption> {
  options
    .iter()
    .find(|option| option.name.contains(destination))
    .ok_or_else(|| JiraError::TransitionNotFound {
      issue_key: issue_key.to_string(),
      destination: destination.to_string(),
    })
}

impl JiraClient {
  /// Get the transitions currently available for an issue
  pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<TransitionOption>> {
    let response = self.get(&transitions_path(issue_key), &[]).await?;
    let list: TransitionList = decode(response, "transition list")?;
    Ok(list.transitions)
  }

  /// Move an issue along the transition with `transition_id`
  pub async fn apply_transition(&self, issue_key: &str, transition_id: &str) -> Result<()> {
    self
      .post(&transitions_path(issue_key), &[], &TransitionRequest::new(transition_id))
      .await?;
    info!(issue_key, transition_id, "applied transition");
    Ok(())
  }

  /// Fetch the live transitions, resolve `destination` against them and
  /// apply the match.
  pub async fn change_transition(&self, issue_key: &str, destination: &str) -> Result<()> {
    let options = self.get_transitions(issue_key).await?;
    let transition = resolve_transition(issue_key, &options, destination)?;
    self.apply_transition(issue_key, &transition.id).await
  }
}
