/// Unit tests for the `stack.rs` assembler.
///
/// The graph is checked directly here, before any serialization; the
/// integration tests in `tests/` cover the rendered YAML.
#[cfg(test)]
mod tests {
    use crate::domain::resource::{Pool, Resource};
    use crate::domain::stack::{
        build_template, CACHE_DISKS_CONDITION, CACHE_DISK_COUNT, DISK_FAILURE_CONDITION, HANDLE_ID,
        INSTANCE_ID, KMS_KEY_CONDITION, RAID_DISK_COUNT, WAIT_CONDITION_ID, WAIT_TIMEOUT_SECONDS,
    };
    use crate::domain::template::Template;

    fn catalog() -> Vec<String> {
        vec!["m5.large".to_string(), "t3.micro".to_string()]
    }

    fn template() -> Template {
        build_template(&catalog()).expect("synthesis should succeed for a valid catalog")
    }

    fn volumes_of(template: &Template, pool: Pool) -> Vec<&crate::domain::resource::Volume> {
        template
            .resources
            .iter()
            .filter_map(|resource| match resource {
                Resource::Volume(volume) if volume.pool == pool => Some(volume),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_pool_sizes_are_fixed() {
        let template = template();

        assert_eq!(volumes_of(&template, Pool::Cache).len(), CACHE_DISK_COUNT);
        assert_eq!(volumes_of(&template, Pool::Capacity).len(), RAID_DISK_COUNT);
        assert_eq!(CACHE_DISK_COUNT + RAID_DISK_COUNT, 12);
    }

    #[test]
    fn test_cache_volumes_are_declared_but_conditionally_instantiated() {
        let template = template();

        for volume in volumes_of(&template, Pool::Cache) {
            assert_eq!(volume.condition.as_deref(), Some(CACHE_DISKS_CONDITION));
        }
        for volume in volumes_of(&template, Pool::Capacity) {
            assert_eq!(volume.condition, None);
        }
    }

    #[test]
    fn test_capacity_volumes_reference_the_capacity_parameters() {
        let template = template();

        for volume in volumes_of(&template, Pool::Capacity) {
            let names = Resource::Volume((*volume).clone()).referenced_names();
            assert!(names.contains(&"RaidDisksType".to_string()), "got {:?}", names);
            assert!(names.contains(&"RaidDiskSize".to_string()), "got {:?}", names);
        }
    }

    #[test]
    fn test_attachment_devices_cover_d_through_o_in_pool_order() {
        let template = template();

        let instance = template
            .resources
            .iter()
            .find_map(|resource| match resource {
                Resource::Instance(instance) => Some(instance),
                _ => None,
            })
            .expect("template must contain the compute node");

        let devices: Vec<&str> = instance.volumes.iter().map(|m| m.device.as_str()).collect();
        let expected: Vec<String> = "defghijklmno".chars().map(|c| format!("/dev/xvd{}", c)).collect();
        assert_eq!(devices, expected.iter().map(|d| d.as_str()).collect::<Vec<_>>());

        // Cache attachments come first
        assert_eq!(
            instance.volumes[0].volume_id,
            crate::domain::expr::Expr::reference("CacheDisk0")
        );
        assert_eq!(
            instance.volumes[3].volume_id,
            crate::domain::expr::Expr::reference("RaidDisk0")
        );
    }

    #[test]
    fn test_handshake_pair_wiring() {
        let template = template();

        let handle = template.resources.iter().find(|r| r.logical_id() == HANDLE_ID).unwrap();
        assert_eq!(handle.condition(), None);

        let wait = template
            .resources
            .iter()
            .find_map(|resource| match resource {
                Resource::WaitCondition(wait) => Some(wait),
                _ => None,
            })
            .unwrap();
        assert_eq!(wait.logical_id, WAIT_CONDITION_ID);
        assert_eq!(wait.condition, DISK_FAILURE_CONDITION);
        assert_eq!(wait.timeout_seconds, WAIT_TIMEOUT_SECONDS);
        assert_eq!(wait.handle, crate::domain::expr::Expr::reference(HANDLE_ID));
    }

    #[test]
    fn test_conditions_have_unique_names() {
        let template = template();

        let names: Vec<&str> = template.conditions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![KMS_KEY_CONDITION, CACHE_DISKS_CONDITION, DISK_FAILURE_CONDITION]);
    }

    #[test]
    fn test_parameter_declaration_order() {
        let template = template();

        let names: Vec<&str> = template.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "RaidDisksType",
                "RaidDiskSize",
                "CacheDiskType",
                "CacheDiskSize",
                "UseCacheDisk",
                "KmsKeyId",
                "InstanceType",
                "ImageId",
                "SubnetId",
                "InstanceAz",
                "KeyPairName",
                "FailIfDiskInitFails",
            ]
        );
    }

    #[test]
    fn test_instance_type_parameter_carries_the_catalog() {
        let template = template();

        let instance_type = template.parameters.iter().find(|p| p.name == "InstanceType").unwrap();
        assert_eq!(instance_type.allowed_values, catalog());
    }

    #[test]
    fn test_init_metadata_carries_parted_and_both_config_files() {
        let template = template();

        let instance = template
            .resources
            .iter()
            .find_map(|resource| match resource {
                Resource::Instance(instance) => Some(instance),
                _ => None,
            })
            .unwrap();

        assert_eq!(instance.logical_id, INSTANCE_ID);
        assert_eq!(instance.init.packages, vec![("yum".to_string(), "parted".to_string())]);

        let paths: Vec<&str> = instance.init.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["/etc/cache.disks.config", "/etc/raid.disks.config"]);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        assert_eq!(template(), template());
    }

    #[test]
    fn test_every_cross_reference_resolves() {
        // finalize() would have rejected the graph otherwise; assert the
        // declared names cover everything the resources point at.
        let template = template();

        let mut declared: Vec<&str> = template.parameters.iter().map(|p| p.name.as_str()).collect();
        declared.extend(template.resources.iter().map(|r| r.logical_id()));

        for resource in &template.resources {
            for reference in resource.referenced_names() {
                assert!(declared.contains(&reference.as_str()), "unresolved '{}'", reference);
            }
        }
    }
}
