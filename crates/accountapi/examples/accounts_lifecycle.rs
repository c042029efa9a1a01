//! Example walking one account through its lifecycle
//!
//! This example shows how to:
//! 1. Create an account (twice, to see the existing-account error)
//! 2. List accounts for a country as a stream
//! 3. Delete the account at its current version
//!
//! # Prerequisites
//!
//! A running Account API:
//! ```bash
//! export ACCOUNTAPI_BASE_URL=http://localhost:8080
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --example accounts_lifecycle --features trace
//! ```

use accountapi::{Account, AccountAttributes, Client, Error};
use futures::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "trace")]
    accountapi::observability::init_tracing();

    println!("🏦 Account Lifecycle Example\n");

    let client = Client::from_env()?;
    let accounts = client.accounts();

    let account = Account::new(
        uuid::Uuid::new_v4().to_string(),
        uuid::Uuid::new_v4().to_string(),
        "GB",
    )
    .with_attributes(
        AccountAttributes::new("GB")
            .with_bank_id("400300", "GBDSC")
            .with_bic("NWBKGB22"),
    );

    println!("📝 Creating account {}...", account.id);
    let created = accounts.create(account.clone()).await?;
    println!("✅ Created at version {}\n", created.version);

    println!("🔁 Creating the same account again...");
    match accounts.create(account).await {
        Err(Error::AlreadyExists { account }) => {
            println!("✅ Already exists at version {}\n", account.version);
        }
        other => println!("⚠️  Unexpected result: {:?}\n", other),
    }

    println!("📋 Listing GB accounts...");
    let mut stream = accounts.list([("country", "GB")]).await?;
    let mut count = 0;
    while let Some(listed) = stream.next().await {
        count += 1;
        println!("   {} ({})", listed.id, listed.attributes.country);
    }
    if let Some(err) = stream.error() {
        println!("❌ Listing ended early: {}", err);
    }
    println!("✅ {} accounts listed\n", count);

    println!("🗑️  Deleting account...");
    accounts.delete(&created.id, created.version).await?;
    println!("✅ Deleted");

    Ok(())
}
