use crate::domain::expr::Expr;

/// Pool membership of a block-storage volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    /// Small acceleration layer, optional end-to-end.
    Cache,
    /// Bulk layer assembled into a RAID array on the node.
    Capacity,
}

/// One block-storage volume. Created once at synthesis time, never mutated;
/// attachments and metadata entries reference it by logical id.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub logical_id: String,
    pub pool: Pool,

    /// Inclusion condition; present only for the cache pool.
    pub condition: Option<String>,

    pub volume_type: Expr,
    pub size: Expr,
    pub availability_zone: Expr,
}

/// Binds one volume to the node at a specific device path.
#[derive(Debug, Clone, PartialEq)]
pub struct MountPoint {
    pub device: String,
    pub volume_id: Expr,
}

/// One config file installed onto the node through the init metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct InitFile {
    pub path: String,
    pub owner: String,
    pub group: String,
    pub mode: String,
    pub content: Expr,
}

/// Init metadata attached to the instance: packages to install plus the
/// config files the external disk-initialization tool consumes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InitConfig {
    /// (package manager, package name) pairs.
    pub packages: Vec<(String, String)>,
    pub files: Vec<InitFile>,
}

/// The single provisioned compute node. Owns the ordered attachment list and
/// the embedded bootstrap artifact (user-data script + init metadata).
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub logical_id: String,
    pub instance_type: Expr,
    pub image_id: Expr,
    pub key_name: Expr,
    pub subnet_id: Expr,
    pub volumes: Vec<MountPoint>,
    pub user_data: Expr,
    pub init: InitConfig,
}

/// Signal endpoint the node's bootstrap script addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitConditionHandle {
    pub logical_id: String,
}

/// Blocking gate bound to a handle; the orchestrator holds provisioning open
/// until a signal arrives or `timeout_seconds` elapses.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitCondition {
    pub logical_id: String,
    pub condition: String,
    pub handle: Expr,
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Volume(Volume),
    Instance(Instance),
    WaitConditionHandle(WaitConditionHandle),
    WaitCondition(WaitCondition),
}

impl Resource {
    pub fn logical_id(&self) -> &str {
        match self {
            Resource::Volume(volume) => &volume.logical_id,
            Resource::Instance(instance) => &instance.logical_id,
            Resource::WaitConditionHandle(handle) => &handle.logical_id,
            Resource::WaitCondition(wait) => &wait.logical_id,
        }
    }

    /// Name of the inclusion condition gating this resource, if any.
    pub fn condition(&self) -> Option<&str> {
        match self {
            Resource::Volume(volume) => volume.condition.as_deref(),
            Resource::WaitCondition(wait) => Some(&wait.condition),
            Resource::Instance(_) | Resource::WaitConditionHandle(_) => None,
        }
    }

    /// Every logical id referenced by the expressions of this resource.
    pub fn referenced_names(&self) -> Vec<String> {
        let mut names = Vec::new();

        match self {
            Resource::Volume(volume) => {
                names.extend(volume.volume_type.referenced_names());
                names.extend(volume.size.referenced_names());
                names.extend(volume.availability_zone.referenced_names());
            }
            Resource::Instance(instance) => {
                names.extend(instance.instance_type.referenced_names());
                names.extend(instance.image_id.referenced_names());
                names.extend(instance.key_name.referenced_names());
                names.extend(instance.subnet_id.referenced_names());
                for mount_point in &instance.volumes {
                    names.extend(mount_point.volume_id.referenced_names());
                }
                names.extend(instance.user_data.referenced_names());
                for file in &instance.init.files {
                    names.extend(file.content.referenced_names());
                }
            }
            Resource::WaitConditionHandle(_) => {}
            Resource::WaitCondition(wait) => {
                names.extend(wait.handle.referenced_names());
            }
        }

        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_volume() -> Volume {
        Volume {
            logical_id: "CacheDisk0".to_string(),
            pool: Pool::Cache,
            condition: Some("CacheDisksCon".to_string()),
            volume_type: Expr::reference("CacheDiskType"),
            size: Expr::reference("CacheDiskSize"),
            availability_zone: Expr::reference("InstanceAz"),
        }
    }

    #[test]
    fn test_volume_references_its_parameters() {
        let resource = Resource::Volume(cache_volume());
        assert_eq!(resource.referenced_names(), vec!["CacheDiskType", "CacheDiskSize", "InstanceAz"]);
        assert_eq!(resource.condition(), Some("CacheDisksCon"));
    }

    #[test]
    fn test_wait_condition_references_its_handle() {
        let resource = Resource::WaitCondition(WaitCondition {
            logical_id: "WaitCondition".to_string(),
            condition: "DiskInitStopsCon".to_string(),
            handle: Expr::reference("ConditionHandle"),
            timeout_seconds: 600,
        });
        assert_eq!(resource.referenced_names(), vec!["ConditionHandle"]);
    }
}
