use tracing::debug;
use tracing::info;
use widestring::U16CStr;
use windows::Win32::Graphics::Direct3D12::D3D12CreateDevice;
use windows::Win32::Graphics::Direct3D12::ID3D12Device;
use windows::Win32::Graphics::Dxgi::*;

use super::create_device::MINIMUM_FEATURE_LEVEL;
use crate::error::SampleReport;
use crate::error::SampleResult;

/// Returns the first hardware adapter that can create a device at
/// [`MINIMUM_FEATURE_LEVEL`], skipping software adapters.
pub fn get_hardware_adapter(factory: &IDXGIFactory4) -> SampleResult<IDXGIAdapter1> {
    for i in 0.. {
        let adapter = match unsafe { factory.EnumAdapters1(i) } {
            Ok(adapter) => adapter,
            Err(e) if e.code() == DXGI_ERROR_NOT_FOUND => break,
            Err(e) => return Err(e.into()),
        };

        let desc = unsafe { adapter.GetDesc1() }?;
        let name = adapter_name(&desc.Description);

        if (DXGI_ADAPTER_FLAG(desc.Flags as i32) & DXGI_ADAPTER_FLAG_SOFTWARE)
            != DXGI_ADAPTER_FLAG_NONE
        {
            debug!(index = i, %name, "skipping software adapter");
            continue;
        }

        // Null output pointer: only checks support, no device is created.
        if unsafe {
            D3D12CreateDevice(
                &adapter,
                MINIMUM_FEATURE_LEVEL,
                std::ptr::null_mut::<Option<ID3D12Device>>(),
            )
        }
        .is_ok()
        {
            info!(index = i, %name, "using hardware adapter");
            return Ok(adapter);
        }
        debug!(index = i, %name, "adapter lacks the required feature level");
    }

    Err(SampleReport::msg("No suitable D3D12 hardware adapter found"))
}

fn adapter_name(description: &[u16]) -> String {
    match U16CStr::from_slice_truncate(description) {
        Ok(name) => name.to_string_lossy(),
        Err(_) => String::from_utf16_lossy(description),
    }
}
