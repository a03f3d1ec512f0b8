//! # Request Payloads
//!
//! Typed bodies for Jira write requests. Optional members are omitted from
//! the JSON when unset.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::consts::DEFAULT_STATUS;
use crate::models::{Field, LinkedIssueSpec, Priority};

/// Everything needed to create an issue, built up with chained setters.
///
/// ```
/// use jira_wrapper::{LinkedIssueSpec, NewIssue, Priority};
///
/// let issue = NewIssue::new("PROJ", "Task", Priority::High, "Rotate the API keys")
///   .description("Keys expire on Friday")
///   .status("In Progress")
///   .labels(["security", "ops"])
///   .link(LinkedIssueSpec::related("PROJ-1"));
/// assert_eq!(issue.target_status(), "In Progress");
/// ```
#[derive(Debug, Clone)]
pub struct NewIssue {
  project_key: String,
  issue_type: String,
  priority: Priority,
  summary: String,
  description: Option<String>,
  status: String,
  labels: Option<Vec<String>>,
  components: Option<Vec<String>>,
  custom_fields: Map<String, Value>,
  linked_issues: Vec<LinkedIssueSpec>,
}

impl NewIssue {
  pub fn new(
    project_key: impl Into<String>,
    issue_type: impl Into<String>,
    priority: Priority,
    summary: impl Into<String>,
  ) -> Self {
    Self {
      project_key: project_key.into(),
      issue_type: issue_type.into(),
      priority,
      summary: summary.into(),
      description: None,
      status: DEFAULT_STATUS.to_string(),
      labels: None,
      components: None,
      custom_fields: Map::new(),
      linked_issues: Vec::new(),
    }
  }

  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Column to move the issue to after creation. Defaults to "Backlog",
  /// which needs no transition.
  pub fn status(mut self, status: impl Into<String>) -> Self {
    self.status = status.into();
    self
  }

  /// Labels to set. Jira labels cannot contain spaces, so they are removed.
  pub fn labels<I, S>(mut self, labels: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.labels = Some(labels.into_iter().map(|label| label.as_ref().replace(' ', "")).collect());
    self
  }

  pub fn components<I, S>(mut self, components: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.components = Some(components.into_iter().map(Into::into).collect());
    self
  }

  /// Set a custom field by id to a raw JSON value.
  pub fn custom_field(mut self, id: impl Into<String>, value: impl Into<Value>) -> Self {
    self.custom_fields.insert(id.into(), value.into());
    self
  }

  /// Set a custom field from a resolved [`Field`]. Fields without a value are
  /// ignored.
  pub fn field(self, field: &Field) -> Self {
    match &field.value {
      Some(value) => self.custom_field(field.id.clone(), Value::from(value)),
      None => self,
    }
  }

  /// Link the new issue to another one; links are applied in call order.
  pub fn link(mut self, link: LinkedIssueSpec) -> Self {
    self.linked_issues.push(link);
    self
  }

  pub fn target_status(&self) -> &str {
    &self.status
  }

  pub fn linked_issues(&self) -> &[LinkedIssueSpec] {
    &self.linked_issues
  }

  /// Whether creating this issue is followed by a transition
  pub fn needs_transition(&self) -> bool {
    !self.status.eq_ignore_ascii_case(DEFAULT_STATUS)
  }

  /// The `fields` document for `POST issue/`. Custom fields are merged last,
  /// so an id that names a built-in field replaces its value.
  pub(crate) fn to_request(&self) -> CreateIssueRequest {
    let mut fields = Map::new();
    fields.insert("project".to_string(), json!({ "key": self.project_key }));
    fields.insert("summary".to_string(), Value::from(self.summary.as_str()));
    if let Some(description) = &self.description {
      fields.insert("description".to_string(), Value::from(description.as_str()));
    }
    fields.insert("issuetype".to_string(), json!({ "name": self.issue_type }));
    fields.insert("priority".to_string(), json!({ "name": self.priority.to_string() }));
    if let Some(labels) = &self.labels {
      fields.insert("labels".to_string(), json!(labels));
    }
    if let Some(components) = &self.components {
      let components: Vec<Value> = components.iter().map(|name| json!({ "name": name })).collect();
      fields.insert("components".to_string(), Value::Array(components));
    }
    fields.extend(self.custom_fields.clone());

    CreateIssueRequest { fields }
  }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueRequest {
  pub fields: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct KeyRef {
  pub key: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NameRef {
  pub name: String,
}

impl NameRef {
  pub fn new(name: &str) -> Self {
    Self { name: name.to_string() }
  }
}

/// Represents a transition request payload
#[derive(Debug, Serialize)]
pub(crate) struct TransitionRequest {
  pub transition: TransitionId,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fields: Option<ResolutionFields>,
}

impl TransitionRequest {
  pub fn new(transition_id: &str) -> Self {
    Self {
      transition: TransitionId {
        id: transition_id.to_string(),
      },
      fields: None,
    }
  }

  pub fn with_resolution(transition_id: &str, resolution: &str) -> Self {
    Self {
      fields: Some(ResolutionFields {
        resolution: NameRef::new(resolution),
      }),
      ..Self::new(transition_id)
    }
  }
}

#[derive(Debug, Serialize)]
pub(crate) struct TransitionId {
  pub id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResolutionFields {
  pub resolution: NameRef,
}

/// `PUT rest/api/2/issue/{key}` body using the `update` verb form
#[derive(Debug, Default, Serialize)]
pub(crate) struct IssueUpdate {
  pub update: UpdateOperations,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct UpdateOperations {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comment: Option<Vec<Add<CommentBody>>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub labels: Option<Vec<LabelOperation>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub priority: Option<Vec<Set<NameRef>>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub issuelinks: Option<Vec<Add<IssueLink>>>,
}

impl IssueUpdate {
  pub fn comment(body: &str) -> Self {
    Self::with(UpdateOperations {
      comment: Some(vec![Add {
        add: CommentBody { body: body.to_string() },
      }]),
      ..Default::default()
    })
  }

  pub fn labels(operations: Vec<LabelOperation>) -> Self {
    Self::with(UpdateOperations {
      labels: Some(operations),
      ..Default::default()
    })
  }

  pub fn priority(name: &str) -> Self {
    Self::with(UpdateOperations {
      priority: Some(vec![Set { set: NameRef::new(name) }]),
      ..Default::default()
    })
  }

  pub fn link(link: &LinkedIssueSpec) -> Self {
    Self::with(UpdateOperations {
      issuelinks: Some(vec![Add {
        add: IssueLink {
          link_type: LinkType {
            name: link.relation_name.clone(),
            inward: link.inward.clone(),
            outward: link.outward.clone(),
          },
          outward_issue: KeyRef {
            key: link.linked_key.clone(),
          },
        },
      }]),
      ..Default::default()
    })
  }

  fn with(update: UpdateOperations) -> Self {
    Self { update }
  }
}

#[derive(Debug, Serialize)]
pub(crate) struct Add<T> {
  pub add: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct Set<T> {
  pub set: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentBody {
  pub body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LabelOperation {
  Add(String),
  Remove(String),
}

#[derive(Debug, Serialize)]
pub(crate) struct IssueLink {
  #[serde(rename = "type")]
  pub link_type: LinkType,
  #[serde(rename = "outwardIssue")]
  pub outward_issue: KeyRef,
}

#[derive(Debug, Serialize)]
pub(crate) struct LinkType {
  pub name: String,
  pub inward: String,
  pub outward: String,
}

/// `PUT rest/api/2/issue/{key}` body setting the assignee directly
#[derive(Debug, Serialize)]
pub(crate) struct AssigneeUpdate {
  pub fields: AssigneeFields,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssigneeFields {
  pub assignee: AccountRef,
}

#[derive(Debug, Serialize)]
pub(crate) struct AccountRef {
  #[serde(rename = "accountId")]
  pub account_id: String,
}

impl AssigneeUpdate {
  pub fn new(account_id: &str) -> Self {
    Self {
      fields: AssigneeFields {
        assignee: AccountRef {
          account_id: account_id.to_string(),
        },
      },
    }
  }
}
