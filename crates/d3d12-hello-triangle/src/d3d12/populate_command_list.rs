use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::*;

use super::load_assets::Assets;
use super::load_pipeline::Pipeline;
use super::transition_barrier::transition_barrier;
use crate::error::SampleResult;
use crate::render_mode::RenderMode;

/// Records one frame for the current back buffer.
pub fn populate_command_list(
    pipeline: &Pipeline,
    assets: &Assets,
    mode: RenderMode,
) -> SampleResult<()> {
    // Only safe once the GPU has finished with the allocator; the per-frame
    // wait in `on_render` guarantees that.
    unsafe { pipeline.command_allocator.Reset() }?;

    let command_list = &assets.command_list;
    unsafe { command_list.Reset(&pipeline.command_allocator, &assets.pipeline_state) }?;

    unsafe {
        command_list.SetGraphicsRootSignature(&assets.root_signature);
        command_list.RSSetViewports(&[pipeline.viewport]);
        command_list.RSSetScissorRects(&[pipeline.scissor_rect]);

        command_list.ResourceBarrier(&[transition_barrier(
            pipeline.current_render_target(),
            D3D12_RESOURCE_STATE_PRESENT,
            D3D12_RESOURCE_STATE_RENDER_TARGET,
        )]);
    }

    let rtv_handle = pipeline.current_rtv();
    unsafe {
        command_list.OMSetRenderTargets(1, Some(&rtv_handle), false, None);
        command_list.ClearRenderTargetView(rtv_handle, &mode.clear_color(), None);
    }

    if mode.is_raster() {
        unsafe {
            command_list.IASetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            command_list.IASetVertexBuffers(0, Some(&[assets.vertex_buffer.view]));
            command_list.DrawInstanced(assets.vertex_buffer.vertex_count, 1, 0, 0);
        }
    }

    unsafe {
        command_list.ResourceBarrier(&[transition_barrier(
            pipeline.current_render_target(),
            D3D12_RESOURCE_STATE_RENDER_TARGET,
            D3D12_RESOURCE_STATE_PRESENT,
        )]);
        command_list.Close()?;
    }
    Ok(())
}
