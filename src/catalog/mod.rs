pub mod pricing;
pub mod snapshot;

use crate::error::{Error, Result};

/// Source of candidate machine-type identifiers.
///
/// The synthesis core only ever sees the raw list; implementations cover the
/// live pricing endpoint ([`pricing::PricingCatalog`]) and a local snapshot
/// file ([`snapshot::SnapshotCatalog`]) for offline runs and tests.
pub trait MachineTypeCatalog {
    fn machine_types(&self) -> Result<Vec<String>>;
}

/// Normalizes a raw catalog into the allowed-value list for the
/// instance-type parameter.
///
/// Entries are lower-cased, entries without a `.` (not a two-part type like
/// `m5.large`) are dropped, and duplicates are removed keeping first-seen
/// order. An empty result is a fatal configuration error: the template would
/// declare an instance-type parameter nobody can satisfy.
pub fn qualify_machine_types<I>(raw: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let mut qualified: Vec<String> = Vec::new();

    for entry in raw {
        let entry = entry.to_lowercase();
        if !entry.contains('.') {
            log::debug!("Dropping non two-part machine type '{}'", entry);
            continue;
        }
        if !qualified.contains(&entry) {
            qualified.push(entry);
        }
    }

    if qualified.is_empty() {
        return Err(Error::EmptyCatalog);
    }

    log::info!("Qualified {} machine types from the catalog.", qualified.len());
    Ok(qualified)
}
