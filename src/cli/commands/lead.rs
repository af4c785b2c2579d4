use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::PageParams;
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, or_dash, truncate_with_ellipsis};

#[derive(Debug, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub school_name: String,
    pub message: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Default, Serialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Tabled)]
pub(crate) struct LeadDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Email")]
    pub(crate) email: String,
    #[tabled(rename = "Phone")]
    pub(crate) phone: String,
    #[tabled(rename = "School")]
    pub(crate) school_name: String,
    #[tabled(rename = "Status")]
    pub(crate) status: String,
}

impl From<&Lead> for LeadDisplay {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id.clone(),
            name: truncate_with_ellipsis(&lead.name, 30),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            school_name: or_dash(&truncate_with_ellipsis(&lead.school_name, 30)),
            status: lead.status.clone(),
        }
    }
}

/// List leads, newest first (admin session required)
pub async fn list_leads(
    api_client: &ApiClient,
    status: Option<&str>,
    page: PageParams<'_>,
    format: &str,
) -> CliResult<String> {
    let mut request = api_client.get("/api/v1/leads");
    if let Some(s) = status {
        request = request.query(&[("status", s)]);
    }
    let request = page.apply(request);

    let leads: Vec<Lead> = ApiClient::handle_response(request.send().await?).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&leads)?),
        _ => Ok(format_table(&leads)),
    }
}

pub(crate) fn format_table(leads: &[Lead]) -> String {
    if leads.is_empty() {
        return "No leads found.".to_string();
    }

    let rows: Vec<LeadDisplay> = leads.iter().map(|l| l.into()).collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    table.to_string()
}

/// Submit a contact form lead (no login needed)
pub async fn create_lead(api_client: &ApiClient, request: CreateLeadRequest) -> CliResult<String> {
    let response = api_client.post("/api/v1/leads").json(&request).send().await?;

    let lead: Lead = ApiClient::handle_response(response).await?;
    Ok(format!("✓ Created lead: {} ({})", lead.name, lead.id))
}

/// Move a lead to a new status (e.g. contacted, closed)
pub async fn set_status(api_client: &ApiClient, id: &str, status: &str) -> CliResult<String> {
    let response = api_client
        .patch(&format!("/api/v1/leads/{}", id))
        .json(&json!({ "status": status }))
        .send()
        .await?;

    let lead: Lead = ApiClient::handle_response(response).await?;
    Ok(format!("✓ Lead {} is now {}", lead.id, lead.status))
}
