use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::consts::UNASSIGNED_DISPLAY_NAME;

/// Represents Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

/// Value of a custom field, typed by the JSON token it was read from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
  Text(String),
  Float(f64),
  Integer(i64),
}

impl FieldValue {
  /// Interpret a raw custom field value.
  ///
  /// Strings become `Text`, objects become the `Text` of their `"value"`
  /// member (empty when absent), numbers become `Integer` or `Float`. Any
  /// other token kind yields `None`.
  pub fn from_json(raw: &Value) -> Option<Self> {
    match raw {
      Value::String(text) => Some(Self::Text(text.clone())),
      Value::Object(object) => Some(Self::Text(match object.get("value") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
      })),
      Value::Number(number) => match number.as_i64() {
        Some(integer) => Some(Self::Integer(integer)),
        None => number.as_f64().map(Self::Float),
      },
      _ => None,
    }
  }
}

impl From<&FieldValue> for Value {
  fn from(value: &FieldValue) -> Self {
    match value {
      FieldValue::Text(text) => Value::String(text.clone()),
      FieldValue::Float(float) => Value::from(*float),
      FieldValue::Integer(integer) => Value::from(*integer),
    }
  }
}

impl fmt::Display for FieldValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(text) => f.write_str(text),
      Self::Float(float) => write!(f, "{float}"),
      Self::Integer(integer) => write!(f, "{integer}"),
    }
  }
}

/// A field definition from the catalog, optionally carrying an issue's value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
  pub id: String,
  pub name: String,
  pub value: Option<FieldValue>,
}

impl Field {
  /// A catalog entry without a value
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      value: None,
    }
  }

  /// An independent copy of this field carrying `value`
  pub fn with_value(&self, value: FieldValue) -> Self {
    Self {
      value: Some(value),
      ..self.clone()
    }
  }

  pub fn set_value(&mut self, value: FieldValue) {
    self.value = Some(value);
  }
}

/// Every field known to the Jira instance, in the order Jira listed them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCatalog {
  fields: Vec<Field>,
}

impl FieldCatalog {
  pub fn new(fields: Vec<Field>) -> Self {
    Self { fields }
  }

  pub fn find(&self, id: &str) -> Option<&Field> {
    self.fields.iter().find(|field| field.id == id)
  }

  /// Copy the catalog entry for `id` and attach `value` to the copy.
  ///
  /// Ids unknown to the catalog keep the id as their display name.
  pub fn resolve(&self, id: &str, value: FieldValue) -> Field {
    match self.find(id) {
      Some(field) => field.with_value(value),
      None => {
        warn!(field_id = id, "custom field missing from the field catalog");
        Field::new(id, id).with_value(value)
      }
    }
  }

  pub fn fields(&self) -> &[Field] {
    &self.fields
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }
}

/// Person attached to an issue as assignee, reporter or creator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueUser {
  pub account_id: String,
  pub display_name: String,
}

impl IssueUser {
  /// Placeholder for an empty user slot
  pub fn unassigned() -> Self {
    Self {
      account_id: String::new(),
      display_name: UNASSIGNED_DISPLAY_NAME.to_string(),
    }
  }

  pub fn is_assigned(&self) -> bool {
    !self.account_id.is_empty()
  }
}

/// Represents a Jira issue status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueStatus {
  pub id: String,
  pub name: String,
  pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuePriority {
  pub id: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueProject {
  pub id: String,
  pub key: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueType {
  pub id: String,
  pub name: String,
  pub description: String,
}

/// Reference from a subtask to its parent issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentIssue {
  pub id: String,
  pub key: String,
}

/// One logged unit of work on an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorklogEntry {
  pub account_id: String,
  pub display_name: String,
  pub created: DateTime<FixedOffset>,
  pub updated: DateTime<FixedOffset>,
  pub started: DateTime<FixedOffset>,
  pub time_spent_seconds: u64,
}

/// Represents a parsed Jira issue.
///
/// Built by the issue parser and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
  pub(crate) key: String,
  pub(crate) id: String,
  pub(crate) summary: String,
  pub(crate) description: Option<String>,
  pub(crate) status: IssueStatus,
  pub(crate) priority: IssuePriority,
  pub(crate) assignee: IssueUser,
  pub(crate) reporter: IssueUser,
  pub(crate) creator: IssueUser,
  pub(crate) created: DateTime<FixedOffset>,
  pub(crate) updated: Option<DateTime<FixedOffset>>,
  pub(crate) resolved: Option<DateTime<FixedOffset>>,
  pub(crate) labels: Vec<String>,
  pub(crate) components: Vec<String>,
  pub(crate) project: IssueProject,
  pub(crate) issue_type: IssueType,
  pub(crate) parent: Option<ParentIssue>,
  pub(crate) worklogs: Vec<WorklogEntry>,
  pub(crate) custom_fields: Vec<Field>,
}

impl Issue {
  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn summary(&self) -> &str {
    &self.summary
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn status(&self) -> &IssueStatus {
    &self.status
  }

  pub fn priority(&self) -> &IssuePriority {
    &self.priority
  }

  pub fn assignee(&self) -> &IssueUser {
    &self.assignee
  }

  pub fn reporter(&self) -> &IssueUser {
    &self.reporter
  }

  pub fn creator(&self) -> &IssueUser {
    &self.creator
  }

  pub fn created(&self) -> DateTime<FixedOffset> {
    self.created
  }

  pub fn updated(&self) -> Option<DateTime<FixedOffset>> {
    self.updated
  }

  pub fn resolved(&self) -> Option<DateTime<FixedOffset>> {
    self.resolved
  }

  pub fn labels(&self) -> &[String] {
    &self.labels
  }

  pub fn components(&self) -> &[String] {
    &self.components
  }

  pub fn project(&self) -> &IssueProject {
    &self.project
  }

  pub fn issue_type(&self) -> &IssueType {
    &self.issue_type
  }

  pub fn parent(&self) -> Option<&ParentIssue> {
    self.parent.as_ref()
  }

  /// True exactly when the issue has a parent
  pub fn is_subtask(&self) -> bool {
    self.parent.is_some()
  }

  /// Worklog entries; empty unless the search asked for them
  pub fn worklogs(&self) -> &[WorklogEntry] {
    &self.worklogs
  }

  /// Custom field values in the order they appeared in the response
  pub fn custom_fields(&self) -> &[Field] {
    &self.custom_fields
  }

  pub fn custom_field(&self, id: &str) -> Option<&Field> {
    self.custom_fields.iter().find(|field| field.id == id)
  }

  pub fn into_custom_fields(self) -> Vec<Field> {
    self.custom_fields
  }
}

/// One workflow transition available from an issue's current status
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransitionOption {
  pub id: String,
  pub name: String,
}

/// Represents a list of Jira transitions
#[derive(Debug, Deserialize)]
pub(crate) struct TransitionList {
  pub transitions: Vec<TransitionOption>,
}

/// Assignable user of a project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  pub account_id: String,
  #[serde(default)]
  pub display_name: String,
  #[serde(default)]
  pub email_address: Option<String>,
}

/// Link to add from a new or existing issue to `linked_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedIssueSpec {
  pub linked_key: String,
  pub relation_name: String,
  pub inward: String,
  pub outward: String,
}

impl LinkedIssueSpec {
  /// A "Related" link, phrased "is related to" in both directions
  pub fn related(linked_key: impl Into<String>) -> Self {
    Self {
      linked_key: linked_key.into(),
      relation_name: "Related".to_string(),
      inward: "is related to".to_string(),
      outward: "is related to".to_string(),
    }
  }

  pub fn relation(mut self, name: impl Into<String>, inward: impl Into<String>, outward: impl Into<String>) -> Self {
    self.relation_name = name.into();
    self.inward = inward.into();
    self.outward = outward.into();
    self
  }
}

/// Issue priority names accepted on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
  Trivial,
  Lowest,
  Low,
  Medium,
  High,
  Highest,
}

impl fmt::Display for Priority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Trivial => "Trivial",
      Self::Lowest => "Lowest",
      Self::Low => "Low",
      Self::Medium => "Medium",
      Self::High => "High",
      Self::Highest => "Highest",
    };
    f.write_str(name)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
      Field::new("customfield_10010", "Team"),
      Field::new("customfield_10020", "Story Points"),
    ])
  }

  #[test]
  fn test_field_value_from_json_token_kinds() {
    assert_eq!(
      FieldValue::from_json(&json!("Platform")),
      Some(FieldValue::Text("Platform".to_string()))
    );
    assert_eq!(
      FieldValue::from_json(&json!({ "id": "1", "value": "Blue" })),
      Some(FieldValue::Text("Blue".to_string()))
    );
    assert_eq!(
      FieldValue::from_json(&json!({ "id": "1" })),
      Some(FieldValue::Text(String::new()))
    );
    assert_eq!(FieldValue::from_json(&json!(3.5)), Some(FieldValue::Float(3.5)));
    assert_eq!(FieldValue::from_json(&json!(8)), Some(FieldValue::Integer(8)));
    assert_eq!(FieldValue::from_json(&json!(null)), None);
    assert_eq!(FieldValue::from_json(&json!(true)), None);
    assert_eq!(FieldValue::from_json(&json!(["a"])), None);
  }

  #[test]
  fn test_resolve_clones_catalog_entry() {
    let catalog = catalog();

    let mut first = catalog.resolve("customfield_10010", FieldValue::Text("Platform".to_string()));
    let second = catalog.resolve("customfield_10010", FieldValue::Text("Mobile".to_string()));
    first.set_value(FieldValue::Text("Changed".to_string()));

    assert_eq!(first.name, "Team");
    assert_eq!(first.value, Some(FieldValue::Text("Changed".to_string())));
    assert_eq!(second.value, Some(FieldValue::Text("Mobile".to_string())));
    assert_eq!(catalog.find("customfield_10010").unwrap().value, None);
  }

  #[test]
  fn test_resolve_unknown_field_uses_id_as_name() {
    let field = catalog().resolve("customfield_99999", FieldValue::Integer(1));
    assert_eq!(field.id, "customfield_99999");
    assert_eq!(field.name, "customfield_99999");
    assert_eq!(field.value, Some(FieldValue::Integer(1)));
  }

  #[test]
  fn test_field_value_into_json() {
    assert_eq!(Value::from(&FieldValue::Text("a".to_string())), json!("a"));
    assert_eq!(Value::from(&FieldValue::Integer(5)), json!(5));
    assert_eq!(Value::from(&FieldValue::Float(2.5)), json!(2.5));
  }

  #[test]
  fn test_linked_issue_defaults() {
    let link = LinkedIssueSpec::related("PROJ-2");
    assert_eq!(link.relation_name, "Related");
    assert_eq!(link.inward, "is related to");
    assert_eq!(link.outward, "is related to");

    let blocks = LinkedIssueSpec::related("PROJ-3").relation("Blocks", "is blocked by", "blocks");
    assert_eq!(blocks.relation_name, "Blocks");
    assert_eq!(blocks.outward, "blocks");
  }

  #[test]
  fn test_jira_user_deserialization() {
    let user: JiraUser = serde_json::from_value(json!({
        "accountId": "abc",
        "displayName": "Ada",
        "emailAddress": "ada@example.com",
        "active": true
    }))
    .unwrap();
    assert_eq!(user.account_id, "abc");
    assert_eq!(user.display_name, "Ada");
    assert_eq!(user.email_address.as_deref(), Some("ada@example.com"));
  }

  #[test]
  fn test_priority_display() {
    assert_eq!(Priority::Highest.to_string(), "Highest");
    assert_eq!(Priority::Trivial.to_string(), "Trivial");
  }
}
