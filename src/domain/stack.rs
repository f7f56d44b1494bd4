use crate::domain::bootstrap;
use crate::domain::condition::Condition;
use crate::domain::device::device_path;
use crate::domain::disk_config::pool_config_file;
use crate::domain::expr::Expr;
use crate::domain::parameter::{Parameter, ParameterType};
use crate::domain::resource::{
    InitConfig, Instance, MountPoint, Pool, Resource, Volume, WaitCondition, WaitConditionHandle,
};
use crate::domain::template::{Template, TemplateBuilder};
use crate::error::Result;

/// Supported storage-media kinds for both pools.
pub const DISK_TYPES: &[&str] = &["gp2", "st1"];

/// Inclusive bounds of the disk-size parameters.
pub const DISK_SIZE_MIN: i64 = 8;
pub const DISK_SIZE_MAX: i64 = 4069;

/// Fixed pool sizes. These are constants of the design, never derived from a
/// parameter.
pub const CACHE_DISK_COUNT: usize = 3;
pub const RAID_DISK_COUNT: usize = 9;

/// Upper bound on how long the orchestrator holds provisioning open for the
/// disk-init signal.
pub const WAIT_TIMEOUT_SECONDS: u32 = 600;

pub const INSTANCE_ID: &str = "ComputeNode";
pub const HANDLE_ID: &str = "ConditionHandle";
pub const WAIT_CONDITION_ID: &str = "WaitCondition";

/// Condition names. `KMS_KEY_CONDITION` is declared for parity with the
/// encryption-key parameter but referenced by no resource; see DESIGN.md.
pub const KMS_KEY_CONDITION: &str = "KmsKeyCon";
pub const CACHE_DISKS_CONDITION: &str = "CacheDisksCon";
pub const DISK_FAILURE_CONDITION: &str = "DiskInitStopsCon";

pub const CACHE_CONFIG_PATH: &str = "/etc/cache.disks.config";
pub const RAID_CONFIG_PATH: &str = "/etc/raid.disks.config";

/// Partitioning utility the external disk-init tool expects on the node.
const PARTITION_PACKAGE: &str = "parted";

const KMS_KEY_DEFAULT: &str = "default";
const KMS_KEY_PATTERN: &str =
    r"((^default$)|([a-z0-9]{8})-([a-z0-9]{4})-([a-z0-9]{4})-([a-z0-9]{4})-([a-z0-9]{12}))";

const TEMPLATE_DESCRIPTION: &str = "Simple template for EC2 instance with multiple Disks";
const TEMPLATE_AUTHOR: &str = "https://github.com/johnpreston";

// Parameter names, shared between declaration and the references below.
const P_RAID_TYPE: &str = "RaidDisksType";
const P_RAID_SIZE: &str = "RaidDiskSize";
const P_CACHE_TYPE: &str = "CacheDiskType";
const P_CACHE_SIZE: &str = "CacheDiskSize";
const P_USE_CACHE: &str = "UseCacheDisk";
const P_KMS_KEY: &str = "KmsKeyId";
const P_INSTANCE_TYPE: &str = "InstanceType";
const P_IMAGE_ID: &str = "ImageId";
const P_SUBNET_ID: &str = "SubnetId";
const P_INSTANCE_AZ: &str = "InstanceAz";
const P_KEY_PAIR: &str = "KeyPairName";
const P_FAIL_ON_DISK_INIT: &str = "FailIfDiskInitFails";

/// Builds the complete provisioning template for one compute node with a
/// cache pool and a capacity pool of attached volumes.
///
/// `machine_types` is the already-qualified catalog
/// (see [`crate::catalog::qualify_machine_types`]); synthesis itself is a
/// pure, deterministic function of it.
pub fn build_template(machine_types: &[String]) -> Result<Template> {
    let mut builder = TemplateBuilder::new(TEMPLATE_DESCRIPTION);
    builder.set_metadata("Author", TEMPLATE_AUTHOR);

    // Phase 1: Parameter schema
    declare_parameters(&mut builder, machine_types)?;

    // Phase 2: Conditions derived from parameter values
    declare_conditions(&mut builder)?;

    // Phase 3: Volume pools, cache first
    let cache_volumes = cache_pool();
    let raid_volumes = raid_pool();
    for volume in cache_volumes.iter().chain(raid_volumes.iter()) {
        builder.add_resource(Resource::Volume(volume.clone()))?;
    }

    // Phase 4: Handshake pair
    builder.add_resource(Resource::WaitConditionHandle(WaitConditionHandle {
        logical_id: HANDLE_ID.to_string(),
    }))?;
    builder.add_resource(Resource::WaitCondition(WaitCondition {
        logical_id: WAIT_CONDITION_ID.to_string(),
        condition: DISK_FAILURE_CONDITION.to_string(),
        handle: Expr::reference(HANDLE_ID),
        timeout_seconds: WAIT_TIMEOUT_SECONDS,
    }))?;

    // Phase 5: Compute node wiring attachments, user data and init metadata
    let instance = build_instance(&cache_volumes, &raid_volumes)?;
    builder.add_resource(Resource::Instance(instance))?;

    // Phase 6: Cross-reference validation
    let template = builder.finalize()?;
    log::info!(
        "Template graph assembled: {} volumes across both pools.",
        cache_volumes.len() + raid_volumes.len()
    );

    Ok(template)
}

fn declare_parameters(builder: &mut TemplateBuilder, machine_types: &[String]) -> Result<()> {
    builder.add_parameter(Parameter::enumerated(P_RAID_TYPE, DISK_TYPES))?;
    builder.add_parameter(Parameter::number_in_range(P_RAID_SIZE, DISK_SIZE_MIN, DISK_SIZE_MAX))?;
    builder.add_parameter(Parameter::enumerated(P_CACHE_TYPE, DISK_TYPES))?;
    builder.add_parameter(Parameter::number_in_range(P_CACHE_SIZE, DISK_SIZE_MIN, DISK_SIZE_MAX))?;
    builder.add_parameter(Parameter::boolean_flag(P_USE_CACHE, true))?;
    builder.add_parameter(
        Parameter::new(P_KMS_KEY, ParameterType::String)
            .with_default(KMS_KEY_DEFAULT)
            .with_pattern(KMS_KEY_PATTERN),
    )?;

    let machine_types: Vec<&str> = machine_types.iter().map(|t| t.as_str()).collect();
    builder.add_parameter(Parameter::enumerated(P_INSTANCE_TYPE, &machine_types))?;

    builder.add_parameter(Parameter::new(P_IMAGE_ID, ParameterType::ImageId))?;
    builder.add_parameter(Parameter::new(P_SUBNET_ID, ParameterType::SubnetId))?;
    builder.add_parameter(Parameter::new(P_INSTANCE_AZ, ParameterType::String))?;
    builder.add_parameter(Parameter::new(P_KEY_PAIR, ParameterType::KeyPairName))?;
    builder.add_parameter(Parameter::boolean_flag(P_FAIL_ON_DISK_INIT, true))?;

    Ok(())
}

fn declare_conditions(builder: &mut TemplateBuilder) -> Result<()> {
    builder.add_condition(Condition::parameter_equals(KMS_KEY_CONDITION, P_KMS_KEY, KMS_KEY_DEFAULT))?;
    builder.add_condition(Condition::parameter_equals(CACHE_DISKS_CONDITION, P_USE_CACHE, "True"))?;
    builder.add_condition(Condition::parameter_equals(DISK_FAILURE_CONDITION, P_FAIL_ON_DISK_INIT, "True"))?;

    Ok(())
}

/// The optional acceleration pool: every volume gated by the cache condition.
fn cache_pool() -> Vec<Volume> {
    (0..CACHE_DISK_COUNT)
        .map(|index| Volume {
            logical_id: format!("CacheDisk{}", index),
            pool: Pool::Cache,
            condition: Some(CACHE_DISKS_CONDITION.to_string()),
            volume_type: Expr::reference(P_CACHE_TYPE),
            size: Expr::reference(P_CACHE_SIZE),
            availability_zone: Expr::reference(P_INSTANCE_AZ),
        })
        .collect()
}

/// The bulk pool: unconditionally present.
fn raid_pool() -> Vec<Volume> {
    (0..RAID_DISK_COUNT)
        .map(|index| Volume {
            logical_id: format!("RaidDisk{}", index),
            pool: Pool::Capacity,
            condition: None,
            volume_type: Expr::reference(P_RAID_TYPE),
            size: Expr::reference(P_RAID_SIZE),
            availability_zone: Expr::reference(P_INSTANCE_AZ),
        })
        .collect()
}

fn build_instance(cache_volumes: &[Volume], raid_volumes: &[Volume]) -> Result<Instance> {
    // Attachment order is pool order, cache first, then index order within
    // each pool; the allocator maps the flattened index to device letters.
    let mut mount_points = Vec::with_capacity(cache_volumes.len() + raid_volumes.len());
    for (global_index, volume) in cache_volumes.iter().chain(raid_volumes.iter()).enumerate() {
        mount_points.push(MountPoint {
            device: device_path(global_index)?,
            volume_id: Expr::reference(&volume.logical_id),
        });
    }

    let init = InitConfig {
        packages: vec![("yum".to_string(), PARTITION_PACKAGE.to_string())],
        files: vec![
            pool_config_file(CACHE_CONFIG_PATH, cache_volumes, 0)?,
            pool_config_file(RAID_CONFIG_PATH, raid_volumes, cache_volumes.len())?,
        ],
    };

    Ok(Instance {
        logical_id: INSTANCE_ID.to_string(),
        instance_type: Expr::reference(P_INSTANCE_TYPE),
        image_id: Expr::reference(P_IMAGE_ID),
        key_name: Expr::reference(P_KEY_PAIR),
        subnet_id: Expr::reference(P_SUBNET_ID),
        volumes: mount_points,
        user_data: bootstrap::user_data(INSTANCE_ID, HANDLE_ID),
        init,
    })
}
