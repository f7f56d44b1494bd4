use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::catalog::MachineTypeCatalog;
use crate::error::Result;

const OFFERS_BASE_URL: &str = "https://pricing.us-east-1.amazonaws.com/offers/v1.0/aws/AmazonEC2/current";

// The region offer files are large; the read is a single blocking call with
// no retry, so give it a generous ceiling.
const FETCH_TIMEOUT: Duration = Duration::from_secs(300);

/// Live catalog backed by the public AWS pricing offers endpoint.
///
/// Downloads the EC2 offer document for one region and collects every
/// `instanceType` product attribute. The endpoint is unauthenticated, so this
/// stays a thin wrapper with no credential handling.
pub struct PricingCatalog {
    region: String,
}

#[derive(Debug, Deserialize)]
struct OfferDocumentDto {
    products: HashMap<String, ProductDto>,
}

#[derive(Debug, Deserialize)]
struct ProductDto {
    #[serde(default)]
    attributes: HashMap<String, String>,
}

impl PricingCatalog {
    pub fn new(region: &str) -> Self {
        PricingCatalog {
            region: region.to_string(),
        }
    }

    fn offer_url(&self) -> String {
        format!("{}/{}/index.json", OFFERS_BASE_URL, self.region)
    }
}

impl MachineTypeCatalog for PricingCatalog {
    fn machine_types(&self) -> Result<Vec<String>> {
        let url = self.offer_url();
        log::info!("Fetching EC2 offer document from '{}'...", url);

        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;

        let document: OfferDocumentDto = client.get(&url).send()?.error_for_status()?.json()?;

        let mut machine_types: Vec<String> = document
            .products
            .values()
            .filter_map(|product| product.attributes.get("instanceType").cloned())
            .collect();

        // The offer document lists one product per (type, OS, tenancy, ...)
        // combination, so the same instanceType shows up many times. The
        // product keys are hash-like and unordered; sort for a stable list.
        machine_types.sort();
        machine_types.dedup();

        log::info!("Offer document yielded {} distinct machine types.", machine_types.len());
        Ok(machine_types)
    }
}
