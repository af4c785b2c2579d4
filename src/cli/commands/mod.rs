pub mod admin;
pub mod blog;
pub mod lead;
pub mod school;
pub mod serve;
pub mod voice;

use crate::cli::api_client::ApiClient;
use crate::cli::error::{CliError, CliResult};

/// Common pagination and sorting parameters for all list commands
#[derive(Debug, Default)]
pub struct PageParams<'a> {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort: Option<&'a str>,
    pub order: Option<&'a str>,
}

impl PageParams<'_> {
    /// Append the set parameters to a request
    pub(crate) fn apply(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(l) = self.limit {
            request = request.query(&[("limit", l.to_string())]);
        }
        if let Some(o) = self.offset {
            request = request.query(&[("offset", o.to_string())]);
        }
        if let Some(s) = self.sort {
            request = request.query(&[("sort", s)]);
        }
        if let Some(ord) = self.order {
            request = request.query(&[("order", ord)]);
        }
        request
    }
}

/// Log in unless already logged in. Admin-only commands call this first.
pub async fn ensure_admin(api_client: &mut ApiClient, password: Option<&str>) -> CliResult<()> {
    if api_client.is_logged_in() {
        return Ok(());
    }
    let password = password.ok_or(CliError::PasswordRequired)?;
    api_client.login(password).await
}

/// Refuse destructive commands without `--force`
pub(crate) fn require_force(force: bool) -> CliResult<()> {
    if force {
        Ok(())
    } else {
        Err(CliError::InvalidArgument {
            message: "Delete operation requires --force flag. This action is destructive and cannot be undone.".to_string(),
        })
    }
}

#[cfg(test)]
mod test_support;
