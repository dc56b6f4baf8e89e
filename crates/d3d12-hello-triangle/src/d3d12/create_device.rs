use tracing::info;
use tracing::warn;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::*;

use super::adapter::get_hardware_adapter;
use crate::config::SampleArgs;
use crate::error::SampleReport;
use crate::error::SampleResult;

/// Lowest feature level the sample will create a device on.
pub const MINIMUM_FEATURE_LEVEL: D3D_FEATURE_LEVEL = D3D_FEATURE_LEVEL_12_1;

pub struct DeviceContext {
    pub factory: IDXGIFactory4,
    pub device: ID3D12Device5,
    pub info_queue: Option<IDXGIInfoQueue>,
}

pub fn create_device(args: &SampleArgs) -> SampleResult<DeviceContext> {
    let mut factory_flags = DXGI_CREATE_FACTORY_FLAGS(0);
    let mut info_queue = None;

    if args.debug_layer_enabled() {
        if enable_debug_layer(args.gpu_validation) {
            factory_flags |= DXGI_CREATE_FACTORY_DEBUG;
            match unsafe { DXGIGetDebugInterface1::<IDXGIInfoQueue>(0) } {
                Ok(queue) => info_queue = Some(queue),
                Err(e) => warn!("DXGI info queue unavailable: {e}"),
            }
        } else {
            warn!("D3D12 debug layer unavailable");
        }
    }

    let factory: IDXGIFactory4 = unsafe { CreateDXGIFactory2(factory_flags) }?;

    let adapter: IDXGIAdapter1 = if args.warp {
        info!("Using WARP adapter");
        unsafe { factory.EnumWarpAdapter() }?
    } else {
        get_hardware_adapter(&factory)?
    };

    let mut device: Option<ID3D12Device5> = None;
    unsafe { D3D12CreateDevice(&adapter, MINIMUM_FEATURE_LEVEL, &mut device) }?;
    let device = device.ok_or_else(|| SampleReport::msg("D3D12CreateDevice returned no device"))?;

    Ok(DeviceContext {
        factory,
        device,
        info_queue,
    })
}

fn enable_debug_layer(gpu_validation: bool) -> bool {
    unsafe {
        let mut debug1: Option<ID3D12Debug1> = None;
        if D3D12GetDebugInterface(&mut debug1).is_ok() {
            if let Some(debug1) = debug1 {
                debug1.EnableDebugLayer();
                debug1.SetEnableGPUBasedValidation(gpu_validation);
                info!(gpu_validation, "D3D12 debug layer enabled");
                return true;
            }
        }

        let mut debug: Option<ID3D12Debug> = None;
        if D3D12GetDebugInterface(&mut debug).is_ok() {
            if let Some(debug) = debug {
                debug.EnableDebugLayer();
                info!("D3D12 debug layer enabled");
                return true;
            }
        }
    }
    false
}
