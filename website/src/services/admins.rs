use reqwest::Client;

use dto::admin::AdminDto;

use crate::Result;

use super::{read_json, read_text, send};

pub async fn list_active_admins(api_url: &str, token: &str) -> Result<Vec<AdminDto>> {
    let url = format!("{}/user/admin/active", api_url);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list admins. Try again later.").await?;

    read_json(response, "Unable to parse admins.").await
}

pub async fn list_inactive_admins(api_url: &str, token: &str) -> Result<Vec<AdminDto>> {
    let url = format!("{}/user/admin/inactive", api_url);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list inactive admins. Try again later.").await?;

    read_json(response, "Unable to parse admins.").await
}

pub async fn get_admin(api_url: &str, token: &str, admin_id: i64) -> Result<AdminDto> {
    let url = format!("{}/user/{}", api_url, admin_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to get admin. Try again later.").await?;

    read_json(response, "Unable to parse admin.").await
}

pub async fn update_admin(
    api_url: &str,
    token: &str,
    admin_id: i64,
    data: &AdminDto,
) -> Result<AdminDto> {
    let url = format!("{}/user/update/{}", api_url, admin_id);
    let request = Client::new().patch(url).bearer_auth(token).json(data);
    let response = send(request, "Unable to update admin. Try again later.").await?;

    read_json(response, "Unable to parse admin.").await
}

/// Deactivates the admin. The backend refuses to remove the last active one.
pub async fn unsubscribe_admin(api_url: &str, token: &str, admin_id: i64) -> Result<String> {
    let url = format!("{}/user/delete/{}", api_url, admin_id);
    let request = Client::new()
        .patch(url)
        .bearer_auth(token)
        .json(&serde_json::json!({}));
    let response = send(request, "Unable to deactivate admin. Try again later.").await?;

    read_text(response, "Unable to read admin response.").await
}

pub async fn reactivate_admin(api_url: &str, token: &str, admin_id: i64) -> Result<String> {
    let url = format!("{}/user/resubscribe/{}", api_url, admin_id);
    let request = Client::new()
        .patch(url)
        .bearer_auth(token)
        .json(&serde_json::json!({}));
    let response = send(request, "Unable to reactivate admin. Try again later.").await?;

    read_text(response, "Unable to read admin response.").await
}
