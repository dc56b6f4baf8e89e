use tracing::info;
use windows::Win32::Graphics::Direct3D12::*;

use crate::error::SampleReport;
use crate::error::SampleResult;

/// Fails unless the device reports raytracing tier 1.0 or better.
pub fn check_raytracing_support(device: &ID3D12Device5) -> SampleResult<()> {
    let mut options5 = D3D12_FEATURE_DATA_D3D12_OPTIONS5::default();
    unsafe {
        device.CheckFeatureSupport(
            D3D12_FEATURE_D3D12_OPTIONS5,
            &mut options5 as *mut _ as *mut _,
            std::mem::size_of::<D3D12_FEATURE_DATA_D3D12_OPTIONS5>() as u32,
        )
    }?;

    if options5.RaytracingTier.0 < D3D12_RAYTRACING_TIER_1_0.0 {
        return Err(SampleReport::msg("Raytracing not supported on device"));
    }

    info!(tier = options5.RaytracingTier.0, "raytracing supported");
    Ok(())
}
