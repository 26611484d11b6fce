use accountapi_http::{AccountApiClient, AccountApiError, AccountData};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("accountapi_http=debug")),
        )
        .init();

    let client = AccountApiClient::from_env().map_err(anyhow::Error::msg)?;

    let account = AccountData::new("ad27e265-9605-4b4b-a0e5-3003ea9cc4dc")
        .with_organisation_id("eb0bd6f5-c3f5-44b2-b677-acd23cdde73c")
        .with_kind("accounts")
        .with_attributes(json!({
            "country": "GB",
            "bank_id": "400300",
            "bank_id_code": "GBDSC",
            "bic": "NWBKGB22",
            "name": ["Samantha Holder"]
        }));

    let created = match client.create(&account).await {
        Ok(created) => created,
        Err(AccountApiError::Conflict { message }) => {
            println!("already registered: {message}");
            client.fetch(&account.id).await?
        }
        Err(err) => return Err(err.into()),
    };
    println!("account {} at version {:?}", created.id, created.version);

    client
        .delete(&created.id, created.version.unwrap_or_default())
        .await?;
    println!("deleted {}", created.id);

    Ok(())
}
