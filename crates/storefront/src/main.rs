use anyhow::Context;

use storefront::{Storefront, StorefrontConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = StorefrontConfig::from_env().context("invalid storefront configuration")?;
    storefront_observability::init_with(config.log_format);

    let storefront = Storefront::with_http_lookup(config)?;
    for record in storefront.rejected() {
        tracing::warn!(position = record.position, reason = %record.reason, "catalog record skipped");
    }

    let views = storefront.visible_products();
    println!("{}", serde_json::to_string_pretty(&views).context("failed to render catalog")?);
    Ok(())
}
