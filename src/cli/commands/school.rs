use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::PageParams;
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, or_dash, truncate_with_ellipsis};

#[derive(Debug, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub website: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Default, Serialize)]
pub struct CreateSchoolRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Tabled)]
pub(crate) struct SchoolDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Email")]
    pub(crate) email: String,
    #[tabled(rename = "Website")]
    pub(crate) website: String,
    #[tabled(rename = "Status")]
    pub(crate) status: String,
}

impl From<&School> for SchoolDisplay {
    fn from(school: &School) -> Self {
        Self {
            id: school.id.clone(),
            name: truncate_with_ellipsis(&school.name, 40),
            email: school.email.clone(),
            website: or_dash(&school.website),
            status: school.status.clone(),
        }
    }
}

/// List registered schools (admin session required)
pub async fn list_schools(
    api_client: &ApiClient,
    status: Option<&str>,
    page: PageParams<'_>,
    format: &str,
) -> CliResult<String> {
    let mut request = api_client.get("/api/v1/schools");
    if let Some(s) = status {
        request = request.query(&[("status", s)]);
    }
    let request = page.apply(request);

    let schools: Vec<School> = ApiClient::handle_response(request.send().await?).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&schools)?),
        _ => Ok(format_table(&schools)),
    }
}

pub(crate) fn format_table(schools: &[School]) -> String {
    if schools.is_empty() {
        return "No schools found.".to_string();
    }

    let rows: Vec<SchoolDisplay> = schools.iter().map(|s| s.into()).collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    table.to_string()
}

/// Register a school (no login needed)
pub async fn create_school(
    api_client: &ApiClient,
    request: CreateSchoolRequest,
) -> CliResult<String> {
    let response = api_client.post("/api/v1/schools").json(&request).send().await?;

    let school: School = ApiClient::handle_response(response).await?;
    Ok(format!("✓ Registered school: {} ({})", school.name, school.id))
}

pub async fn set_status(api_client: &ApiClient, id: &str, status: &str) -> CliResult<String> {
    let response = api_client
        .patch(&format!("/api/v1/schools/{}", id))
        .json(&json!({ "status": status }))
        .send()
        .await?;

    let school: School = ApiClient::handle_response(response).await?;
    Ok(format!("✓ School {} is now {}", school.id, school.status))
}
