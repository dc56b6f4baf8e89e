use windows::Win32::Graphics::Direct3D12::*;
use windows::core::w;

use super::create_buffer::UPLOAD_HEAP;
use super::create_buffer::create_buffer;
use super::create_buffer::upload;
use crate::error::SampleResult;
use crate::geometry::Vertex;
use crate::geometry::triangle_vertices;

pub struct VertexBuffer {
    pub resource: ID3D12Resource,
    pub view: D3D12_VERTEX_BUFFER_VIEW,
    pub vertex_count: u32,
}

// Upload heaps are not the place for static geometry, but one triangle
// read once per frame doesn't justify a copy queue round trip.
pub fn create_vertex_buffer(device: &ID3D12Device5, aspect_ratio: f32) -> SampleResult<VertexBuffer> {
    let vertices = triangle_vertices(aspect_ratio);
    let size = std::mem::size_of_val(&vertices) as u64;

    let resource = create_buffer(
        device,
        size,
        D3D12_RESOURCE_FLAG_NONE,
        D3D12_RESOURCE_STATE_GENERIC_READ,
        &UPLOAD_HEAP,
    )?;
    unsafe { resource.SetName(w!("VertexBuffer")) }?;
    upload(&resource, &vertices)?;

    let view = D3D12_VERTEX_BUFFER_VIEW {
        BufferLocation: unsafe { resource.GetGPUVirtualAddress() },
        StrideInBytes: Vertex::STRIDE,
        SizeInBytes: size as u32,
    };

    Ok(VertexBuffer {
        resource,
        view,
        vertex_count: vertices.len() as u32,
    })
}
