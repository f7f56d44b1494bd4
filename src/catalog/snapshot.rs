use std::path::PathBuf;

use serde::Deserialize;

use crate::catalog::MachineTypeCatalog;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

/// Offline catalog read from a JSON snapshot file.
///
/// The file mirrors the pricing service's attribute-values response shape:
///
/// ```json
/// { "AttributeValues": [ { "Value": "m5.large" }, { "Value": "t3.micro" } ] }
/// ```
pub struct SnapshotCatalog {
    file_path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeValuesDto {
    attribute_values: Vec<AttributeValueDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeValueDto {
    value: String,
}

impl SnapshotCatalog {
    pub fn new(file_path: PathBuf) -> Self {
        SnapshotCatalog { file_path }
    }
}

impl MachineTypeCatalog for SnapshotCatalog {
    fn machine_types(&self) -> Result<Vec<String>> {
        log::info!("Loading machine-type snapshot from '{}'...", self.file_path.display());

        let root_dto: AttributeValuesDto = parse_json_file(&self.file_path)?;

        Ok(root_dto.attribute_values.into_iter().map(|attribute| attribute.value).collect())
    }
}
