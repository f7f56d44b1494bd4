use crate::domain::device::device_path;
use crate::domain::expr::Expr;
use crate::domain::resource::{InitFile, Volume};
use crate::error::Result;

// Fixed ownership metadata of the emitted config files. The external
// disk-init tool runs as the administrative account.
const FILE_OWNER: &str = "root";
const FILE_GROUP: &str = "root";
const FILE_MODE: &str = "644";

/// Emits the config-file artifact for one pool: one line per volume, each
/// `<device-path>=<resolved-volume-id>`, in pool-internal order.
///
/// `pool_offset` is the pool's starting position in the global attachment
/// order (0 for the cache pool, the cache pool size for the capacity pool),
/// so the lines use the same index-to-device mapping as the attachments.
pub fn pool_config_file(path: &str, volumes: &[Volume], pool_offset: usize) -> Result<InitFile> {
    let mut lines = Vec::with_capacity(volumes.len());

    for (index, volume) in volumes.iter().enumerate() {
        let device = device_path(pool_offset + index)?;
        lines.push(Expr::Sub(format!("{}=${{{}}}", device, volume.logical_id)));
    }

    Ok(InitFile {
        path: path.to_string(),
        owner: FILE_OWNER.to_string(),
        group: FILE_GROUP.to_string(),
        mode: FILE_MODE.to_string(),
        content: Expr::join("\n", lines),
    })
}
