//! JSON payloads shaped like Jira Cloud REST responses.

use serde_json::{Map, Value, json};

/// Builder for a single raw issue as returned inside `search.issues`.
///
/// [`IssueJson::new`] produces an issue with every field the parser requires;
/// tests then override or drop individual fields.
#[derive(Debug, Clone)]
pub struct IssueJson {
  key: String,
  id: String,
  fields: Map<String, Value>,
}

impl IssueJson {
  pub fn new(key: &str, id: &str) -> Self {
    let fields = json!({
      "summary": format!("Summary of {key}"),
      "description": format!("Description of {key}"),
      "status": { "id": "10001", "name": "In Progress", "description": "Work has started" },
      "priority": { "id": "3", "name": "Medium" },
      "assignee": { "accountId": "acc-assignee", "displayName": "Ada Lovelace" },
      "reporter": { "accountId": "acc-reporter", "displayName": "Grace Hopper" },
      "creator": { "accountId": "acc-creator", "displayName": "Alan Turing" },
      "created": "2024-01-15T09:30:00.000+0000",
      "updated": "2024-01-16T10:00:00.000+0000",
      "resolutiondate": null,
      "labels": ["backend"],
      "components": [{ "id": "1", "name": "API" }],
      "project": { "id": "10000", "key": "PROJ", "name": "Project" },
      "issuetype": { "id": "10002", "name": "Task", "description": "A task" }
    });

    let fields = match fields {
      Value::Object(map) => map,
      _ => Map::new(),
    };

    Self {
      key: key.to_string(),
      id: id.to_string(),
      fields,
    }
  }

  /// Set (or replace) a field under `fields`.
  pub fn field(mut self, name: &str, value: Value) -> Self {
    self.fields.insert(name.to_string(), value);
    self
  }

  /// Remove a field from `fields` entirely.
  pub fn without_field(mut self, name: &str) -> Self {
    self.fields.remove(name);
    self
  }

  /// Mark the issue as a subtask of `parent_key`.
  pub fn parent(self, parent_id: &str, parent_key: &str) -> Self {
    self.field("parent", json!({ "id": parent_id, "key": parent_key }))
  }

  pub fn build(self) -> Value {
    let link = format!("https://example.atlassian.net/rest/api/2/issue/{}", self.id);
    json!({
      "id": self.id,
      "key": self.key,
      "self": link,
      "fields": Value::Object(self.fields),
    })
  }
}

/// One page of `GET rest/api/2/search`.
pub fn search_page(start_at: u64, total: u64, issues: Vec<Value>) -> Value {
  json!({
    "startAt": start_at,
    "maxResults": issues.len(),
    "total": total,
    "issues": issues,
  })
}

/// Issues `PROJ-{from}` to `PROJ-{to - 1}`, with ids offset by 10000.
pub fn issues_range(from: u64, to: u64) -> Vec<Value> {
  (from..to)
    .map(|n| IssueJson::new(&format!("PROJ-{n}"), &(10000 + n).to_string()).build())
    .collect()
}

/// One page of `GET rest/api/3/field/search`.
pub fn field_page(start_at: u64, total: u64, fields: &[(&str, &str)]) -> Value {
  let values: Vec<Value> = fields
    .iter()
    .map(|(id, name)| json!({ "id": id, "name": name, "schema": { "type": "string" } }))
    .collect();
  json!({
    "startAt": start_at,
    "maxResults": 50,
    "total": total,
    "isLast": start_at + values.len() as u64 >= total,
    "values": values,
  })
}

/// One worklog entry as returned by `GET rest/api/3/issue/{key}/worklog`.
pub fn worklog_entry(account_id: &str, display_name: &str, time_spent_seconds: u64) -> Value {
  json!({
    "author": { "accountId": account_id, "displayName": display_name },
    "created": "2024-01-15T12:00:00.000+0000",
    "updated": "2024-01-15T12:30:00.000+0000",
    "started": "2024-01-15T08:00:00.000+0000",
    "timeSpent": "1h",
    "timeSpentSeconds": time_spent_seconds,
  })
}

/// Body of `GET rest/api/3/issue/{key}/worklog`.
pub fn worklog_page(entries: Vec<Value>) -> Value {
  json!({
    "startAt": 0,
    "maxResults": entries.len(),
    "total": entries.len(),
    "worklogs": entries,
  })
}

/// Body of `GET rest/api/3/issue/{key}/transitions`.
pub fn transitions(options: &[(&str, &str)]) -> Value {
  let transitions: Vec<Value> = options
    .iter()
    .map(|(id, name)| json!({ "id": id, "name": name, "to": { "name": name } }))
    .collect();
  json!({ "transitions": transitions })
}

/// One entry of `GET rest/api/2/user/assignable/search`.
pub fn user(account_id: &str, display_name: &str, email: &str) -> Value {
  json!({
    "accountId": account_id,
    "displayName": display_name,
    "emailAddress": email,
    "active": true,
  })
}
