//! # Issue Parser
//!
//! Turns raw search results into [`Issue`] records. Scalar fields,
//! components, custom fields and (optionally) the worklog are extracted as
//! four independent units joined before the issue is assembled; the first
//! failure fails the whole issue.

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use tracing::trace;

use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::models::{
  Field, FieldCatalog, FieldValue, Issue, IssuePriority, IssueProject, IssueStatus, IssueType, IssueUser, ParentIssue,
  WorklogEntry,
};

type JsonObject = Map<String, Value>;

/// Jira's own timestamp layout, e.g. `2024-01-15T09:30:00.000+0000`.
const JIRA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

impl JiraClient {
  /// Parse one raw issue object.
  ///
  /// Custom fields are resolved against copies of `catalog` entries. When
  /// `include_worklog` is set, the issue's worklog is fetched with one extra
  /// request.
  pub async fn parse_issue(&self, raw: &Value, catalog: &FieldCatalog, include_worklog: bool) -> Result<Issue> {
    let object = raw
      .as_object()
      .ok_or_else(|| JiraError::parse("issue is not a JSON object"))?;
    let key = required_string(object, "key", "issue")?;
    let id = required_string(object, "id", &key)?;
    let fields = required_object(object, "fields", &key)?;

    let (scalars, custom_fields, components, worklogs) = tokio::try_join!(
      async { parse_scalars(fields, &key) },
      async { Ok::<_, JiraError>(parse_custom_fields(fields, catalog)) },
      async { parse_components(fields, &key) },
      async {
        if include_worklog {
          self.get_worklog(&key).await
        } else {
          Ok(Vec::new())
        }
      },
    )?;
    trace!(issue_key = %key, custom_fields = custom_fields.len(), "parsed issue");

    Ok(Issue {
      key,
      id,
      summary: scalars.summary,
      description: scalars.description,
      status: scalars.status,
      priority: scalars.priority,
      assignee: scalars.assignee,
      reporter: scalars.reporter,
      creator: scalars.creator,
      created: scalars.created,
      updated: scalars.updated,
      resolved: scalars.resolved,
      labels: scalars.labels,
      components,
      project: scalars.project,
      issue_type: scalars.issue_type,
      parent: scalars.parent,
      worklogs,
      custom_fields,
    })
  }

  /// Parse every issue of a search page, in page order.
  ///
  /// Accepts either a search response (`{"issues": [...]}`) or a bare array.
  pub(crate) async fn parse_page(&self, page: &Value, catalog: &FieldCatalog, include_worklog: bool) -> Result<Vec<Issue>> {
    let raw_issues = match page.get("issues").unwrap_or(page) {
      Value::Array(issues) => issues,
      _ => return Err(JiraError::parse("search response has no issue list")),
    };

    let mut issues = Vec::with_capacity(raw_issues.len());
    for raw in raw_issues {
      issues.push(self.parse_issue(raw, catalog, include_worklog).await?);
    }
    Ok(issues)
  }
}

struct Scalars {
  summary: String,
  description: Option<String>,
  status: IssueStatus,
  priority: IssuePriority,
  assignee: IssueUser,
  reporter: IssueUser,
  creator: IssueUser,
  created: DateTime<FixedOffset>,
  updated: Option<DateTime<FixedOffset>>,
  resolved: Option<DateTime<FixedOffset>>,
  labels: Vec<String>,
  project: IssueProject,
  issue_type: IssueType,
  parent: Option<ParentIssue>,
}

fn parse_scalars(fields: &JsonObject, key: &str) -> Result<Scalars> {
  let status = required_object(fields, "status", key)?;
  let priority = required_object(fields, "priority", key)?;
  let project = required_object(fields, "project", key)?;
  let issue_type = required_object(fields, "issuetype", key)?;

  let parent = match fields.get("parent") {
    None | Some(Value::Null) => None,
    Some(_) => {
      let parent = required_object(fields, "parent", key)?;
      Some(ParentIssue {
        id: required_string(parent, "id", key)?,
        key: required_string(parent, "key", key)?,
      })
    }
  };

  let labels = match fields.get("labels") {
    Some(Value::Array(labels)) => labels.iter().filter_map(Value::as_str).map(str::to_string).collect(),
    _ => Vec::new(),
  };

  Ok(Scalars {
    summary: required_string(fields, "summary", key)?,
    description: optional_string(fields, "description"),
    status: IssueStatus {
      id: required_string(status, "id", key)?,
      name: required_string(status, "name", key)?,
      description: optional_string(status, "description").unwrap_or_default(),
    },
    priority: IssuePriority {
      id: required_string(priority, "id", key)?,
      name: required_string(priority, "name", key)?,
    },
    assignee: parse_user(fields, "assignee"),
    reporter: parse_user(fields, "reporter"),
    creator: parse_user(fields, "creator"),
    created: required_timestamp(fields, "created", key)?,
    updated: optional_timestamp(fields, "updated", key)?,
    resolved: optional_timestamp(fields, "resolutiondate", key)?,
    labels,
    project: IssueProject {
      id: required_string(project, "id", key)?,
      key: required_string(project, "key", key)?,
      name: required_string(project, "name", key)?,
    },
    issue_type: IssueType {
      id: required_string(issue_type, "id", key)?,
      name: required_string(issue_type, "name", key)?,
      description: optional_string(issue_type, "description").unwrap_or_default(),
    },
    parent,
  })
}

/// An absent, null or empty user object means nobody is assigned.
fn parse_user(fields: &JsonObject, slot: &str) -> IssueUser {
  match fields.get(slot).and_then(Value::as_object) {
    Some(user) if !user.is_empty() => IssueUser {
      account_id: optional_string(user, "accountId").unwrap_or_default(),
      display_name: optional_string(user, "displayName").unwrap_or_default(),
    },
    _ => IssueUser::unassigned(),
  }
}

/// Component names in the order Jira lists them.
pub fn parse_components(fields: &JsonObject, key: &str) -> Result<Vec<String>> {
  match fields.get("components") {
    Some(Value::Array(components)) => components
      .iter()
      .map(|component| {
        component
          .as_object()
          .ok_or_else(|| JiraError::parse(format!("{key}: component is not an object")))
          .and_then(|component| required_string(component, "name", key))
      })
      .collect(),
    _ => Ok(Vec::new()),
  }
}

/// Resolve every field whose key contains "custom" and whose value has a
/// supported token kind, keeping response order.
pub fn parse_custom_fields(fields: &JsonObject, catalog: &FieldCatalog) -> Vec<Field> {
  fields
    .iter()
    .filter(|(id, _)| id.contains("custom"))
    .filter_map(|(id, raw)| FieldValue::from_json(raw).map(|value| catalog.resolve(id, value)))
    .collect()
}

/// Entries of a `GET issue/{key}/worklog` response.
pub(crate) fn parse_worklog(page: &Value, key: &str) -> Result<Vec<WorklogEntry>> {
  let Some(entries) = page.get("worklogs").and_then(Value::as_array) else {
    return Err(JiraError::parse(format!("{key}: worklog response has no worklogs")));
  };

  entries
    .iter()
    .map(|entry| {
      let entry = entry
        .as_object()
        .ok_or_else(|| JiraError::parse(format!("{key}: worklog entry is not an object")))?;
      let author = entry.get("author").and_then(Value::as_object);
      let time_spent_seconds = entry
        .get("timeSpentSeconds")
        .and_then(Value::as_u64)
        .ok_or_else(|| JiraError::parse(format!("{key}: worklog entry has no valid timeSpentSeconds")))?;

      Ok(WorklogEntry {
        account_id: author
          .and_then(|author| optional_string(author, "accountId"))
          .unwrap_or_default(),
        display_name: author
          .and_then(|author| optional_string(author, "displayName"))
          .unwrap_or_default(),
        created: required_timestamp(entry, "created", key)?,
        updated: required_timestamp(entry, "updated", key)?,
        started: required_timestamp(entry, "started", key)?,
        time_spent_seconds,
      })
    })
    .collect()
}

/// Parse RFC 3339 or Jira's `+0000` offset form.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(raw)
    .or_else(|_| DateTime::parse_from_str(raw, JIRA_TIMESTAMP_FORMAT))
    .ok()
}

fn missing(key: &str, field: &str) -> JiraError {
  JiraError::parse(format!("{key}: missing required field '{field}'"))
}

fn required_object<'a>(object: &'a JsonObject, field: &str, key: &str) -> Result<&'a JsonObject> {
  object
    .get(field)
    .and_then(Value::as_object)
    .ok_or_else(|| missing(key, field))
}

/// Strings are taken as-is; numeric ids are converted to their text form.
fn optional_string(object: &JsonObject, field: &str) -> Option<String> {
  match object.get(field)? {
    Value::String(text) => Some(text.clone()),
    Value::Number(number) => Some(number.to_string()),
    _ => None,
  }
}

fn required_string(object: &JsonObject, field: &str, key: &str) -> Result<String> {
  optional_string(object, field).ok_or_else(|| missing(key, field))
}

fn optional_timestamp(object: &JsonObject, field: &str, key: &str) -> Result<Option<DateTime<FixedOffset>>> {
  match object.get(field) {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(raw)) => parse_timestamp(raw)
      .map(Some)
      .ok_or_else(|| JiraError::parse(format!("{key}: invalid timestamp in '{field}': {raw}"))),
    Some(_) => Err(JiraError::parse(format!("{key}: '{field}' is not a timestamp"))),
  }
}

fn required_timestamp(object: &JsonObject, field: &str, key: &str) -> Result<DateTime<FixedOffset>> {
  optional_timestamp(object, field, key)?.ok_or_else(|| missing(key, field))
}

#[cfg(test)]
mod tests {
  use chrono::{Datelike, Timelike};
  use jira_wrapper_test_utils::fixtures::{IssueJson, search_page};
  use serde_json::json;

  use super::*;
  use crate::client::create_jira_client;

  fn offline_client() -> JiraClient {
    create_jira_client("http://127.0.0.1:9", "user", "token")
  }

  fn catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
      Field::new("summary", "Summary"),
      Field::new("customfield_10010", "Team"),
      Field::new("customfield_10011", "Severity"),
      Field::new("customfield_10012", "Estimate"),
      Field::new("customfield_10013", "Story Points"),
      Field::new("customfield_10014", "Flagged"),
    ])
  }

  #[tokio::test]
  async fn test_parse_issue_scalars() -> anyhow::Result<()> {
    let raw = IssueJson::new("PROJ-1", "10001").build();

    let issue = offline_client().parse_issue(&raw, &catalog(), false).await?;

    assert_eq!(issue.key(), "PROJ-1");
    assert_eq!(issue.id(), "10001");
    assert_eq!(issue.summary(), "Summary of PROJ-1");
    assert_eq!(issue.description(), Some("Description of PROJ-1"));
    assert_eq!(issue.status().name, "In Progress");
    assert_eq!(issue.status().id, "10001");
    assert_eq!(issue.status().description, "Work has started");
    assert_eq!(issue.priority().name, "Medium");
    assert_eq!(issue.assignee().display_name, "Ada Lovelace");
    assert_eq!(issue.assignee().account_id, "acc-assignee");
    assert_eq!(issue.reporter().display_name, "Grace Hopper");
    assert_eq!(issue.creator().account_id, "acc-creator");
    assert_eq!(issue.labels(), ["backend".to_string()]);
    assert_eq!(issue.components(), ["API".to_string()]);
    assert_eq!(issue.project().key, "PROJ");
    assert_eq!(issue.issue_type().name, "Task");
    assert_eq!(issue.created().year(), 2024);
    assert_eq!(issue.created().hour(), 9);
    assert!(issue.updated().is_some());
    assert!(issue.resolved().is_none());
    assert!(issue.worklogs().is_empty());
    assert!(!issue.is_subtask());
    Ok(())
  }

  #[tokio::test]
  async fn test_parse_mixed_custom_fields() -> anyhow::Result<()> {
    let raw = IssueJson::new("PROJ-2", "10002")
      .field("customfield_10010", json!("Platform"))
      .field("customfield_10011", json!({ "self": "x", "value": "Critical", "id": "3" }))
      .field("customfield_10012", json!(2.5))
      .field("customfield_10013", json!(8))
      .field("customfield_10014", json!(null))
      .build();

    let issue = offline_client().parse_issue(&raw, &catalog(), false).await?;
    let fields = issue.custom_fields();

    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].name, "Team");
    assert_eq!(fields[0].value, Some(FieldValue::Text("Platform".to_string())));
    assert_eq!(fields[1].name, "Severity");
    assert_eq!(fields[1].value, Some(FieldValue::Text("Critical".to_string())));
    assert_eq!(fields[2].name, "Estimate");
    assert_eq!(fields[2].value, Some(FieldValue::Float(2.5)));
    assert_eq!(fields[3].name, "Story Points");
    assert_eq!(fields[3].value, Some(FieldValue::Integer(8)));
    assert!(issue.custom_field("customfield_10014").is_none());
    Ok(())
  }

  #[tokio::test]
  async fn test_custom_fields_are_isolated_between_issues() -> anyhow::Result<()> {
    let client = offline_client();
    let catalog = catalog();
    let first = IssueJson::new("PROJ-3", "10003")
      .field("customfield_10010", json!("Platform"))
      .build();
    let second = IssueJson::new("PROJ-4", "10004")
      .field("customfield_10010", json!("Mobile"))
      .build();

    let mut first_fields = client.parse_issue(&first, &catalog, false).await?.into_custom_fields();
    let second_issue = client.parse_issue(&second, &catalog, false).await?;
    first_fields[0].set_value(FieldValue::Integer(42));

    assert_eq!(
      second_issue.custom_field("customfield_10010").unwrap().value,
      Some(FieldValue::Text("Mobile".to_string()))
    );
    assert_eq!(catalog.find("customfield_10010").unwrap().value, None);
    Ok(())
  }

  #[tokio::test]
  async fn test_missing_users_default_to_not_assigned() -> anyhow::Result<()> {
    let raw = IssueJson::new("PROJ-5", "10005")
      .without_field("assignee")
      .field("reporter", json!(null))
      .field("creator", json!({}))
      .build();

    let issue = offline_client().parse_issue(&raw, &catalog(), false).await?;

    for user in [issue.assignee(), issue.reporter(), issue.creator()] {
      assert_eq!(user.display_name, "Not assigned");
      assert_eq!(user.account_id, "");
      assert!(!user.is_assigned());
    }
    Ok(())
  }

  #[tokio::test]
  async fn test_subtask_flag_follows_parent() -> anyhow::Result<()> {
    let client = offline_client();
    let subtask = IssueJson::new("PROJ-7", "10007").parent("10006", "PROJ-6").build();
    let explicit_null = IssueJson::new("PROJ-8", "10008").field("parent", json!(null)).build();
    let page = search_page(0, 2, vec![subtask, explicit_null]);

    let issues = client.parse_page(&page, &catalog(), false).await?;

    assert!(issues[0].is_subtask());
    assert_eq!(issues[0].parent().unwrap().key, "PROJ-6");
    assert_eq!(issues[0].parent().unwrap().id, "10006");
    assert!(!issues[1].is_subtask());
    for issue in &issues {
      assert_eq!(issue.is_subtask(), issue.parent().is_some());
    }
    Ok(())
  }

  #[tokio::test]
  async fn test_missing_status_fails_the_page() {
    let good = IssueJson::new("PROJ-9", "10009").build();
    let bad = IssueJson::new("PROJ-10", "10010").without_field("status").build();
    let page = search_page(0, 2, vec![good, bad]);

    let error = offline_client()
      .parse_page(&page, &catalog(), false)
      .await
      .unwrap_err();

    assert!(matches!(error, JiraError::Parse(_)));
    assert!(error.to_string().contains("PROJ-10"));
    assert!(error.to_string().contains("status"));
  }

  #[tokio::test]
  async fn test_parse_page_accepts_bare_array() -> anyhow::Result<()> {
    let page = json!([IssueJson::new("PROJ-11", "10011").build()]);
    let issues = offline_client().parse_page(&page, &catalog(), false).await?;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].key(), "PROJ-11");
    Ok(())
  }

  #[test]
  fn test_parse_components_keeps_order() {
    let fields = json!({ "components": [{ "name": "Web" }, { "name": "API" }, { "name": "CLI" }] });
    let components = parse_components(fields.as_object().unwrap(), "PROJ-1").unwrap();
    assert_eq!(components, vec!["Web", "API", "CLI"]);
  }

  #[test]
  fn test_parse_timestamp_formats() {
    let jira = parse_timestamp("2024-01-15T09:30:00.000+0000").unwrap();
    assert_eq!(jira.minute(), 30);
    let rfc = parse_timestamp("2024-01-15T09:30:00+02:00").unwrap();
    assert_eq!(rfc.offset().local_minus_utc(), 7200);
    assert!(parse_timestamp("yesterday").is_none());
  }

  #[test]
  fn test_parse_worklog_entries() {
    let page = json!({
        "worklogs": [{
            "author": { "accountId": "acc-1", "displayName": "Ada" },
            "created": "2024-01-15T12:00:00.000+0000",
            "updated": "2024-01-15T12:30:00.000+0000",
            "started": "2024-01-15T08:00:00.000+0000",
            "timeSpentSeconds": 3600
        }]
    });

    let entries = parse_worklog(&page, "PROJ-1").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].account_id, "acc-1");
    assert_eq!(entries[0].display_name, "Ada");
    assert_eq!(entries[0].time_spent_seconds, 3600);
    assert_eq!(entries[0].started.hour(), 8);
  }

  #[test]
  fn test_parse_worklog_rejects_negative_time() {
    let page = json!({
        "worklogs": [{
            "author": { "accountId": "acc-1", "displayName": "Ada" },
            "created": "2024-01-15T12:00:00.000+0000",
            "updated": "2024-01-15T12:30:00.000+0000",
            "started": "2024-01-15T08:00:00.000+0000",
            "timeSpentSeconds": -5
        }]
    });
    assert!(parse_worklog(&page, "PROJ-1").is_err());
  }
}
