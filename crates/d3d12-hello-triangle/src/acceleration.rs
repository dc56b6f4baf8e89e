//! Buffer sizing for DXR acceleration structures.

/// `D3D12_RAYTRACING_ACCELERATION_STRUCTURE_BYTE_ALIGNMENT`
pub const ACCELERATION_STRUCTURE_ALIGNMENT: u64 = 256;
/// `D3D12_RAYTRACING_INSTANCE_DESCS_BYTE_ALIGNMENT`
pub const INSTANCE_DESCS_ALIGNMENT: u64 = 16;
/// `size_of::<D3D12_RAYTRACING_INSTANCE_DESC>()`
pub const INSTANCE_DESC_SIZE: u64 = 64;

/// Rounds `size` up to a power-of-two `alignment`.
pub const fn align_up(size: u64, alignment: u64) -> u64 {
    (size + alignment - 1) & !(alignment - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelerationStructureSizes {
    pub scratch: u64,
    pub result: u64,
}

impl AccelerationStructureSizes {
    /// Takes `ScratchDataSizeInBytes` and `ResultDataMaxSizeInBytes` from the prebuild info.
    pub fn from_prebuild(scratch: u64, result: u64) -> Self {
        Self {
            scratch: align_up(scratch, ACCELERATION_STRUCTURE_ALIGNMENT),
            result: align_up(result, ACCELERATION_STRUCTURE_ALIGNMENT),
        }
    }
}

pub fn instance_descs_size(instance_count: usize) -> u64 {
    align_up(
        INSTANCE_DESC_SIZE * instance_count as u64,
        INSTANCE_DESCS_ALIGNMENT,
    )
}

/// Packs a 24-bit field and an 8-bit field the way the instance desc bitfields
/// (`InstanceID`/`InstanceMask`, `InstanceContributionToHitGroupIndex`/`Flags`) lay them out.
pub const fn pack_instance_bitfield(low_24: u32, high_8: u8) -> u32 {
    (low_24 & 0x00FF_FFFF) | ((high_8 as u32) << 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_the_next_multiple() {
        assert_eq!(align_up(0, 256), 0);
        assert_eq!(align_up(1, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
    }

    #[test]
    fn prebuild_sizes_are_structure_aligned() {
        let sizes = AccelerationStructureSizes::from_prebuild(1000, 4000);
        assert_eq!(sizes.scratch, 1024);
        assert_eq!(sizes.result, 4096);
        assert_eq!(sizes.scratch % ACCELERATION_STRUCTURE_ALIGNMENT, 0);
    }

    #[test]
    fn instance_descs_cover_every_instance() {
        assert_eq!(instance_descs_size(1), 64);
        assert_eq!(instance_descs_size(3), 192);
        assert_eq!(instance_descs_size(0), 0);
    }

    #[test]
    fn instance_id_and_mask_share_one_word() {
        assert_eq!(pack_instance_bitfield(0, 0xFF), 0xFF00_0000);
        assert_eq!(pack_instance_bitfield(7, 0xFF), 0xFF00_0007);
        assert_eq!(pack_instance_bitfield(0x0123_4567, 0), 0x0023_4567);
    }
}
