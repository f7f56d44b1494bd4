pub mod catalog;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod render;

use crate::error::Result;

/// Synthesizes the provisioning template from a raw machine-type catalog.
///
/// Qualifies the catalog, assembles and validates the resource graph, and
/// renders it to YAML. Pure and deterministic: the same catalog always yields
/// a byte-identical document, and no output exists on error.
pub fn synthesize_template(raw_machine_types: Vec<String>) -> Result<String> {
    let machine_types = catalog::qualify_machine_types(raw_machine_types)?;
    log::info!("Catalog qualified. Starting template synthesis.");

    let template = domain::stack::build_template(&machine_types)?;
    log::info!("Resource graph assembled and validated.");

    let rendered = render::yaml::to_yaml(&template)?;
    log::info!("Template serialized ({} bytes of YAML).", rendered.len());

    Ok(rendered)
}
