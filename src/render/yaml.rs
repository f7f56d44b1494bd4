//! Serialization boundary: converts the validated domain graph into the
//! orchestrator's YAML document.
//!
//! `serde_yaml::Mapping` preserves insertion order, so the rendered sections
//! follow declaration order exactly and re-rendering the same graph yields a
//! byte-identical document.

use serde_yaml::{Mapping, Value};

use crate::domain::condition::ConditionExpr;
use crate::domain::expr::Expr;
use crate::domain::parameter::Parameter;
use crate::domain::resource::{InitConfig, Instance, Resource, Volume, WaitCondition};
use crate::domain::template::Template;
use crate::error::Result;

/// Renders a template to its final YAML text.
pub fn to_yaml(template: &Template) -> Result<String> {
    let value = template_value(template);
    let rendered = serde_yaml::to_string(&value)?;
    Ok(rendered)
}

fn template_value(template: &Template) -> Value {
    let mut root = Mapping::new();
    root.insert(key("Description"), Value::String(template.description.clone()));

    if !template.metadata.is_empty() {
        let mut metadata = Mapping::new();
        for (name, value) in &template.metadata {
            metadata.insert(key(name), Value::String(value.clone()));
        }
        root.insert(key("Metadata"), Value::Mapping(metadata));
    }

    let mut parameters = Mapping::new();
    for parameter in &template.parameters {
        parameters.insert(key(&parameter.name), parameter_value(parameter));
    }
    root.insert(key("Parameters"), Value::Mapping(parameters));

    let mut conditions = Mapping::new();
    for condition in &template.conditions {
        conditions.insert(key(&condition.name), condition_value(&condition.expr));
    }
    root.insert(key("Conditions"), Value::Mapping(conditions));

    let mut resources = Mapping::new();
    for resource in &template.resources {
        resources.insert(key(resource.logical_id()), resource_value(resource));
    }
    root.insert(key("Resources"), Value::Mapping(resources));

    Value::Mapping(root)
}

fn parameter_value(parameter: &Parameter) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(key("Type"), Value::String(parameter.parameter_type.type_string().to_string()));

    if !parameter.allowed_values.is_empty() {
        let values = parameter.allowed_values.iter().map(|v| Value::String(v.clone())).collect();
        mapping.insert(key("AllowedValues"), Value::Sequence(values));
    }
    if let Some(min_value) = parameter.min_value {
        mapping.insert(key("MinValue"), Value::Number(min_value.into()));
    }
    if let Some(max_value) = parameter.max_value {
        mapping.insert(key("MaxValue"), Value::Number(max_value.into()));
    }
    if let Some(pattern) = &parameter.allowed_pattern {
        mapping.insert(key("AllowedPattern"), Value::String(pattern.clone()));
    }
    if let Some(default) = &parameter.default {
        mapping.insert(key("Default"), Value::String(default.clone()));
    }

    Value::Mapping(mapping)
}

fn condition_value(expr: &ConditionExpr) -> Value {
    match expr {
        ConditionExpr::Equals { parameter, value } => single_entry(
            "Fn::Equals",
            Value::Sequence(vec![
                expr_value(&Expr::reference(parameter)),
                Value::String(value.clone()),
            ]),
        ),
        ConditionExpr::Not(inner) => single_entry("Fn::Not", Value::Sequence(vec![condition_value(inner)])),
    }
}

fn resource_value(resource: &Resource) -> Value {
    match resource {
        Resource::Volume(volume) => volume_value(volume),
        Resource::Instance(instance) => instance_value(instance),
        Resource::WaitConditionHandle(_) => {
            let mut mapping = Mapping::new();
            mapping.insert(key("Type"), Value::String("AWS::CloudFormation::WaitConditionHandle".to_string()));
            Value::Mapping(mapping)
        }
        Resource::WaitCondition(wait) => wait_condition_value(wait),
    }
}

fn volume_value(volume: &Volume) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(key("Type"), Value::String("AWS::EC2::Volume".to_string()));
    if let Some(condition) = &volume.condition {
        mapping.insert(key("Condition"), Value::String(condition.clone()));
    }

    let mut properties = Mapping::new();
    properties.insert(key("VolumeType"), expr_value(&volume.volume_type));
    properties.insert(key("AvailabilityZone"), expr_value(&volume.availability_zone));
    properties.insert(key("Size"), expr_value(&volume.size));
    mapping.insert(key("Properties"), Value::Mapping(properties));

    Value::Mapping(mapping)
}

fn wait_condition_value(wait: &WaitCondition) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(key("Type"), Value::String("AWS::CloudFormation::WaitCondition".to_string()));
    mapping.insert(key("Condition"), Value::String(wait.condition.clone()));

    let mut properties = Mapping::new();
    properties.insert(key("Handle"), expr_value(&wait.handle));
    properties.insert(key("Timeout"), Value::Number(wait.timeout_seconds.into()));
    mapping.insert(key("Properties"), Value::Mapping(properties));

    Value::Mapping(mapping)
}

fn instance_value(instance: &Instance) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(key("Type"), Value::String("AWS::EC2::Instance".to_string()));
    mapping.insert(key("Metadata"), init_metadata_value(&instance.init));

    let mut properties = Mapping::new();
    properties.insert(key("InstanceType"), expr_value(&instance.instance_type));
    properties.insert(key("ImageId"), expr_value(&instance.image_id));
    properties.insert(key("KeyName"), expr_value(&instance.key_name));
    properties.insert(key("SubnetId"), expr_value(&instance.subnet_id));

    let volumes = instance
        .volumes
        .iter()
        .map(|mount_point| {
            let mut entry = Mapping::new();
            entry.insert(key("Device"), Value::String(mount_point.device.clone()));
            entry.insert(key("VolumeId"), expr_value(&mount_point.volume_id));
            Value::Mapping(entry)
        })
        .collect();
    properties.insert(key("Volumes"), Value::Sequence(volumes));

    properties.insert(key("UserData"), expr_value(&instance.user_data));
    mapping.insert(key("Properties"), Value::Mapping(properties));

    Value::Mapping(mapping)
}

/// Renders the instance's init metadata: one config set installing the
/// partitioning package and the per-pool disk config files.
fn init_metadata_value(init: &InitConfig) -> Value {
    let mut packages_by_manager = Mapping::new();
    for (manager, package) in &init.packages {
        let entry = packages_by_manager
            .entry(key(manager))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if let Value::Mapping(packages) = entry {
            packages.insert(key(package), Value::Sequence(Vec::new()));
        }
    }

    let mut files = Mapping::new();
    for file in &init.files {
        let mut entry = Mapping::new();
        entry.insert(key("owner"), Value::String(file.owner.clone()));
        entry.insert(key("group"), Value::String(file.group.clone()));
        entry.insert(key("mode"), Value::String(file.mode.clone()));
        entry.insert(key("content"), expr_value(&file.content));
        files.insert(key(&file.path), Value::Mapping(entry));
    }

    let mut config = Mapping::new();
    config.insert(key("packages"), Value::Mapping(packages_by_manager));
    config.insert(key("files"), Value::Mapping(files));

    let mut config_sets = Mapping::new();
    config_sets.insert(
        key("default"),
        Value::Sequence(vec![Value::String("disksconfig".to_string())]),
    );

    let mut init_mapping = Mapping::new();
    init_mapping.insert(key("configSets"), Value::Mapping(config_sets));
    init_mapping.insert(key("disksconfig"), Value::Mapping(config));

    single_entry("AWS::CloudFormation::Init", Value::Mapping(init_mapping))
}

fn expr_value(expr: &Expr) -> Value {
    match expr {
        Expr::Str(text) => Value::String(text.clone()),
        Expr::Ref(target) => single_entry("Ref", Value::String(target.clone())),
        Expr::Sub(template) => single_entry("Fn::Sub", Value::String(template.clone())),
        Expr::Join { separator, parts } => single_entry(
            "Fn::Join",
            Value::Sequence(vec![
                Value::String(separator.clone()),
                Value::Sequence(parts.iter().map(expr_value).collect()),
            ]),
        ),
        Expr::Base64(inner) => single_entry("Fn::Base64", expr_value(inner)),
    }
}

fn single_entry(name: &str, value: Value) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(key(name), value);
    Value::Mapping(mapping)
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_renders_long_form() {
        let value = expr_value(&Expr::reference("ImageId"));
        let rendered = serde_yaml::to_string(&value).unwrap();
        assert_eq!(rendered, "Ref: ImageId\n");
    }

    #[test]
    fn test_base64_join_nesting() {
        let value = expr_value(&Expr::base64(Expr::join(
            "\n",
            vec![Expr::str("a"), Expr::sub("${B}")],
        )));
        let rendered = serde_yaml::to_string(&value).unwrap();
        assert!(rendered.starts_with("Fn::Base64:"));
        assert!(rendered.contains("Fn::Join:"));
        assert!(rendered.contains("Fn::Sub: ${B}"));
    }

    #[test]
    fn test_condition_renders_equals_over_ref() {
        let value = condition_value(&ConditionExpr::Equals {
            parameter: "UseCacheDisk".to_string(),
            value: "True".to_string(),
        });
        let rendered = serde_yaml::to_string(&value).unwrap();
        assert!(rendered.contains("Fn::Equals:"));
        assert!(rendered.contains("Ref: UseCacheDisk"));
        assert!(rendered.contains("- 'True'") || rendered.contains("- True"));
    }

    #[test]
    fn test_parameter_sections_follow_field_order() {
        let parameter = Parameter::number_in_range("RaidDiskSize", 8, 4069);
        let rendered = serde_yaml::to_string(&parameter_value(&parameter)).unwrap();

        let type_at = rendered.find("Type: Number").unwrap();
        let min_at = rendered.find("MinValue: 8").unwrap();
        let max_at = rendered.find("MaxValue: 4069").unwrap();
        assert!(type_at < min_at && min_at < max_at);
    }
}
