use windows::Win32::Graphics::Direct3D12::*;

use super::create_pipeline_state::create_pipeline_state;
use super::create_root_signature::create_root_signature;
use super::create_vertex_buffer::VertexBuffer;
use super::create_vertex_buffer::create_vertex_buffer;
use super::fence::FrameFence;
use super::load_pipeline::Pipeline;
use crate::error::SampleResult;

pub struct Assets {
    pub root_signature: ID3D12RootSignature,
    pub pipeline_state: ID3D12PipelineState,
    pub command_list: ID3D12GraphicsCommandList4,
    pub vertex_buffer: VertexBuffer,
    pub fence: FrameFence,
}

/// Creates the shaders, PSO, vertex buffer and fence.
///
/// The command list is returned open so the acceleration structure builds
/// can be recorded into it before the first submission.
pub fn load_assets(pipeline: &Pipeline, aspect_ratio: f32) -> SampleResult<Assets> {
    let device = &pipeline.device;

    let root_signature = create_root_signature(device)?;
    let pipeline_state = create_pipeline_state(device, &root_signature)?;

    let command_list: ID3D12GraphicsCommandList4 = unsafe {
        device.CreateCommandList(
            0,
            D3D12_COMMAND_LIST_TYPE_DIRECT,
            &pipeline.command_allocator,
            &pipeline_state,
        )
    }?;

    let vertex_buffer = create_vertex_buffer(device, aspect_ratio)?;
    let fence = FrameFence::new(device)?;

    Ok(Assets {
        root_signature,
        pipeline_state,
        command_list,
        vertex_buffer,
        fence,
    })
}
