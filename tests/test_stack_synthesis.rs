use raid_disk_stack::catalog::qualify_machine_types;
use raid_disk_stack::domain::resource::{Pool, Resource};
use raid_disk_stack::domain::stack::{build_template, CACHE_DISK_COUNT, RAID_DISK_COUNT};
use raid_disk_stack::error::Error;
use raid_disk_stack::synthesize_template;

fn raw_catalog() -> Vec<String> {
    vec![
        "M5.Large".to_string(),
        "t3.micro".to_string(),
        "c5n.metal".to_string(),
        "metal".to_string(), // not a two-part type
    ]
}

#[test]
fn test_catalog_flows_into_the_instance_type_parameter() {
    let machine_types = qualify_machine_types(raw_catalog()).unwrap();
    let template = build_template(&machine_types).unwrap();

    let instance_type = template.parameters.iter().find(|p| p.name == "InstanceType").unwrap();
    assert_eq!(instance_type.allowed_values, vec!["m5.large", "t3.micro", "c5n.metal"]);
}

#[test]
fn test_twelve_volumes_for_any_catalog() {
    let machine_types = qualify_machine_types(raw_catalog()).unwrap();
    let template = build_template(&machine_types).unwrap();

    let volume_count = template
        .resources
        .iter()
        .filter(|r| matches!(r, Resource::Volume(_)))
        .count();
    assert_eq!(volume_count, CACHE_DISK_COUNT + RAID_DISK_COUNT);

    let cache_count = template
        .resources
        .iter()
        .filter(|r| matches!(r, Resource::Volume(v) if v.pool == Pool::Cache))
        .count();
    assert_eq!(cache_count, CACHE_DISK_COUNT);
}

#[test]
fn test_empty_catalog_aborts_synthesis() {
    let result = synthesize_template(Vec::new());
    assert!(matches!(result, Err(Error::EmptyCatalog)));
}

#[test]
fn test_catalog_without_two_part_types_aborts_synthesis() {
    let raw = vec!["metal".to_string(), "standard".to_string()];
    let result = synthesize_template(raw);
    assert!(matches!(result, Err(Error::EmptyCatalog)));
}

#[test]
fn test_synthesis_is_idempotent() {
    let first = synthesize_template(raw_catalog()).unwrap();
    let second = synthesize_template(raw_catalog()).unwrap();
    assert_eq!(first, second);
}
