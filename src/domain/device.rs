use crate::error::{Error, Result};

/// Root and base devices of the node occupy `a` through `c`; attached pool
/// volumes start at the fourth letter.
pub const RESERVED_DEVICE_SLOTS: usize = 3;

const DEVICE_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Maps a zero-based global volume index (cache pool first, then capacity
/// pool, index order within each) to its device letter.
///
/// Index 0 maps to `d`; the mapping is contiguous across both pools. Indices
/// past `z` are a configuration error, the node cannot expose more devices.
pub fn device_letter(global_index: usize) -> Result<char> {
    let slot = global_index + RESERVED_DEVICE_SLOTS;

    if slot >= DEVICE_LETTERS.len() {
        return Err(Error::DeviceLetterOverflow {
            requested: slot + 1,
            available: DEVICE_LETTERS.len(),
        });
    }

    Ok(DEVICE_LETTERS[slot] as char)
}

/// Full device path for a global volume index, e.g. `/dev/xvdd` for index 0.
pub fn device_path(global_index: usize) -> Result<String> {
    Ok(format!("/dev/xvd{}", device_letter(global_index)?))
}
