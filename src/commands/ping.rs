use crate::api::ApiClient;
use crate::api::models::PingResponse;

/// Check the connection to the server and who the token belongs to
pub fn run(client: &ApiClient) -> anyhow::Result<()> {
    let response = client.ping()?;
    println!("{}", format_ping(client.server_url(), &response));
    Ok(())
}

pub fn format_ping(server_url: &str, response: &PingResponse) -> String {
    format!(
        "REANA server: {server_url}\n\
         REANA server version: {}\n\
         REANA client version: {}\n\
         Authenticated as: <{}>\n\
         Status: Connected",
        response.reana_server_version,
        env!("CARGO_PKG_VERSION"),
        response.email
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ping() {
        let response: PingResponse = serde_json::from_str(
            r#"{"email": "john.doe@example.org", "reana_server_version": "0.9.0a5"}"#,
        )
        .unwrap();

        let text = format_ping("https://reana.example.org", &response);
        assert!(text.contains("REANA server: https://reana.example.org"));
        assert!(text.contains("REANA server version: 0.9.0a5"));
        assert!(text.contains("Authenticated as: <john.doe@example.org>"));
        assert!(text.ends_with("Status: Connected"));
    }
}
