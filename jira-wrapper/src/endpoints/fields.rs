use serde::Deserialize;
use tracing::debug;

use crate::client::{JiraClient, decode};
use crate::consts::{FIELD_PAGE_SIZE, FIELD_SEARCH_PATH};
use crate::error::Result;
use crate::models::{Field, FieldCatalog};
use crate::pagination::page_windows;

#[derive(Debug, Deserialize)]
struct FieldSearchPage {
  total: u64,
  #[serde(default)]
  values: Vec<FieldDefinition>,
}

#[derive(Debug, Deserialize)]
struct FieldDefinition {
  id: String,
  name: String,
}

impl JiraClient {
  /// Load every field defined on the instance, in the order Jira lists them.
  ///
  /// One probe request learns the total, then the catalog is read in pages
  /// of [`FIELD_PAGE_SIZE`].
  pub async fn load_fields(&self) -> Result<FieldCatalog> {
    let probe = self.get(FIELD_SEARCH_PATH, &[("maxResults", "0".to_string())]).await?;
    let total = decode::<FieldSearchPage>(probe, "field search probe")?.total;

    let mut fields = Vec::new();
    for (start_at, _) in page_windows(total, FIELD_PAGE_SIZE) {
      let query = [
        ("startAt", start_at.to_string()),
        ("maxResults", FIELD_PAGE_SIZE.to_string()),
      ];
      let page: FieldSearchPage = decode(self.get(FIELD_SEARCH_PATH, &query).await?, "field search page")?;
      if page.values.is_empty() {
        break;
      }
      fields.extend(page.values.into_iter().map(|field| Field::new(field.id, field.name)));
    }

    debug!(total, loaded = fields.len(), "loaded field catalog");
    Ok(FieldCatalog::new(fields))
  }
}

#[cfg(test)]
mod tests {
  use jira_wrapper_test_utils::fixtures::field_page;
  use wiremock::matchers::{basic_auth, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::endpoints::test_support::test_client;
  use crate::error::JiraError;

  async fn mount_probe(server: &MockServer, total: u64) {
    Mock::given(method("GET"))
      .and(path("/rest/api/3/field/search"))
      .and(query_param("maxResults", "0"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(field_page(0, total, &[])))
      .expect(1)
      .mount(server)
      .await;
  }

  #[tokio::test]
  async fn test_load_fields_pages_through_catalog() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);
    mount_probe(&mock_server, 52).await;

    let first: Vec<(String, String)> = (0..50)
      .map(|n| (format!("customfield_{n}"), format!("Field {n}")))
      .collect();
    let first: Vec<(&str, &str)> = first.iter().map(|(id, name)| (id.as_str(), name.as_str())).collect();

    Mock::given(method("GET"))
      .and(path("/rest/api/3/field/search"))
      .and(query_param("startAt", "0"))
      .and(query_param("maxResults", "50"))
      .respond_with(ResponseTemplate::new(200).set_body_json(field_page(0, 52, &first)))
      .expect(1)
      .mount(&mock_server)
      .await;
    Mock::given(method("GET"))
      .and(path("/rest/api/3/field/search"))
      .and(query_param("startAt", "50"))
      .and(query_param("maxResults", "50"))
      .respond_with(ResponseTemplate::new(200).set_body_json(field_page(
        50,
        52,
        &[("summary", "Summary"), ("status", "Status")],
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    let catalog = client.load_fields().await?;

    assert_eq!(catalog.len(), 52);
    assert_eq!(catalog.fields()[0].id, "customfield_0");
    assert_eq!(catalog.fields()[51].name, "Status");
    assert_eq!(catalog.find("summary").map(|f| f.name.as_str()), Some("Summary"));
    assert!(catalog.fields().iter().all(|field| field.value.is_none()));
    Ok(())
  }

  #[tokio::test]
  async fn test_load_fields_below_one_page() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);
    mount_probe(&mock_server, 2).await;

    Mock::given(method("GET"))
      .and(path("/rest/api/3/field/search"))
      .and(query_param("startAt", "0"))
      .respond_with(ResponseTemplate::new(200).set_body_json(field_page(
        0,
        2,
        &[("customfield_10010", "Team"), ("summary", "Summary")],
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    let catalog = client.load_fields().await?;
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.fields()[0].name, "Team");
    Ok(())
  }

  #[tokio::test]
  async fn test_load_fields_empty_catalog() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);
    mount_probe(&mock_server, 0).await;

    let catalog = client.load_fields().await?;
    assert!(catalog.is_empty());
    Ok(())
  }

  #[tokio::test]
  async fn test_load_fields_stops_on_empty_page() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);
    mount_probe(&mock_server, 120).await;

    Mock::given(method("GET"))
      .and(path("/rest/api/3/field/search"))
      .and(query_param("startAt", "0"))
      .respond_with(ResponseTemplate::new(200).set_body_json(field_page(0, 120, &[("a", "A")])))
      .mount(&mock_server)
      .await;
    Mock::given(method("GET"))
      .and(path("/rest/api/3/field/search"))
      .and(query_param("startAt", "50"))
      .respond_with(ResponseTemplate::new(200).set_body_json(field_page(50, 120, &[])))
      .expect(1)
      .mount(&mock_server)
      .await;
    Mock::given(method("GET"))
      .and(path("/rest/api/3/field/search"))
      .and(query_param("startAt", "100"))
      .respond_with(ResponseTemplate::new(200).set_body_json(field_page(100, 120, &[("b", "B")])))
      .expect(0)
      .mount(&mock_server)
      .await;

    let catalog = client.load_fields().await?;
    assert_eq!(catalog.len(), 1);
    Ok(())
  }

  #[tokio::test]
  async fn test_load_fields_propagates_auth_failure() {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("GET"))
      .and(path("/rest/api/3/field/search"))
      .respond_with(ResponseTemplate::new(401))
      .mount(&mock_server)
      .await;

    assert!(matches!(client.load_fields().await, Err(JiraError::Authentication)));
  }
}
