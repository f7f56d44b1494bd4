use std::collections::HashSet;

use crate::domain::condition::Condition;
use crate::domain::parameter::Parameter;
use crate::domain::resource::Resource;
use crate::error::{Error, Result};

/// The root container: parameters, conditions and resources in declaration
/// order. Only [`TemplateBuilder::finalize`] produces one, so every template
/// in circulation has passed cross-reference validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub description: String,
    /// Free-form (key, value) metadata rendered at the top of the document.
    pub metadata: Vec<(String, String)>,
    pub parameters: Vec<Parameter>,
    pub conditions: Vec<Condition>,
    pub resources: Vec<Resource>,
}

/// Accumulates declarations in order and validates the finished graph at an
/// explicit finalize step, decoupling declaration order from any incidental
/// execution order.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    description: String,
    metadata: Vec<(String, String)>,
    parameters: Vec<Parameter>,
    conditions: Vec<Condition>,
    resources: Vec<Resource>,
}

impl TemplateBuilder {
    pub fn new(description: &str) -> Self {
        TemplateBuilder {
            description: description.to_string(),
            ..TemplateBuilder::default()
        }
    }

    pub fn set_metadata(&mut self, key: &str, value: &str) {
        self.metadata.push((key.to_string(), value.to_string()));
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<()> {
        if self.parameters.iter().any(|p| p.name == parameter.name) {
            return Err(Error::DuplicateName(parameter.name));
        }
        self.parameters.push(parameter);
        Ok(())
    }

    pub fn add_condition(&mut self, condition: Condition) -> Result<()> {
        if self.conditions.iter().any(|c| c.name == condition.name) {
            return Err(Error::DuplicateName(condition.name));
        }
        self.conditions.push(condition);
        Ok(())
    }

    pub fn add_resource(&mut self, resource: Resource) -> Result<()> {
        let logical_id = resource.logical_id();
        if self.resources.iter().any(|r| r.logical_id() == logical_id) {
            return Err(Error::DuplicateName(logical_id.to_string()));
        }
        self.resources.push(resource);
        Ok(())
    }

    /// Validates the accumulated graph and returns the finished template.
    ///
    /// Checks, in order:
    /// 1. every condition expression reads a declared parameter,
    /// 2. every resource's inclusion condition is a declared condition,
    /// 3. every expression reference resolves to a declared parameter or a
    ///    logical id within this template.
    pub fn finalize(self) -> Result<Template> {
        let parameter_names: HashSet<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
        let condition_names: HashSet<&str> = self.conditions.iter().map(|c| c.name.as_str()).collect();
        let logical_ids: HashSet<&str> = self.resources.iter().map(|r| r.logical_id()).collect();

        for condition in &self.conditions {
            for parameter in condition.referenced_parameters() {
                if !parameter_names.contains(parameter.as_str()) {
                    return Err(Error::UndeclaredReference {
                        resource: condition.name.clone(),
                        reference: parameter,
                    });
                }
            }
        }

        for resource in &self.resources {
            if let Some(condition) = resource.condition() {
                if !condition_names.contains(condition) {
                    return Err(Error::UndeclaredReference {
                        resource: resource.logical_id().to_string(),
                        reference: condition.to_string(),
                    });
                }
            }

            for reference in resource.referenced_names() {
                let resolves = parameter_names.contains(reference.as_str()) || logical_ids.contains(reference.as_str());
                if !resolves {
                    return Err(Error::UndeclaredReference {
                        resource: resource.logical_id().to_string(),
                        reference,
                    });
                }
            }
        }

        log::debug!(
            "Template finalized: {} parameters, {} conditions, {} resources.",
            self.parameters.len(),
            self.conditions.len(),
            self.resources.len()
        );

        Ok(Template {
            description: self.description,
            metadata: self.metadata,
            parameters: self.parameters,
            conditions: self.conditions,
            resources: self.resources,
        })
    }
}
