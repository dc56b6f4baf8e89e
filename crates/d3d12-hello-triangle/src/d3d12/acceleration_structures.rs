//! Bottom- and top-level acceleration structures over the sample geometry.

use bevy_math::Mat4;
use tracing::info;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::core::Interface;
use windows::core::w;

use super::create_buffer::DEFAULT_HEAP;
use super::create_buffer::UPLOAD_HEAP;
use super::create_buffer::create_buffer;
use super::create_buffer::upload;
use super::load_assets::Assets;
use super::load_pipeline::Pipeline;
use super::transition_barrier::uav_barrier;
use crate::acceleration::AccelerationStructureSizes;
use crate::acceleration::instance_descs_size;
use crate::acceleration::pack_instance_bitfield;
use crate::error::SampleReport;
use crate::error::SampleResult;
use crate::geometry::Vertex;
use crate::geometry::instance_transform;

pub struct AccelerationStructureBuffers {
    pub scratch: ID3D12Resource,
    pub result: ID3D12Resource,
    pub instance_desc: Option<ID3D12Resource>,
}

/// A bottom-level structure placed in the scene.
#[derive(Clone)]
pub struct Instance {
    pub bottom_level: ID3D12Resource,
    pub transform: Mat4,
}

/// Everything the GPU needs kept alive once the structures are built.
pub struct AccelerationStructures {
    pub bottom_level: ID3D12Resource,
    pub top_level: AccelerationStructureBuffers,
    pub instances: Vec<Instance>,
}

/// Builds a BLAS from `(vertex buffer, vertex count)` pairs. Recorded, not executed.
pub fn create_bottom_level_as(
    device: &ID3D12Device5,
    command_list: &ID3D12GraphicsCommandList4,
    vertex_buffers: &[(&ID3D12Resource, u32)],
) -> SampleResult<AccelerationStructureBuffers> {
    let geometry_descs: Vec<D3D12_RAYTRACING_GEOMETRY_DESC> = vertex_buffers
        .iter()
        .map(|(buffer, vertex_count)| D3D12_RAYTRACING_GEOMETRY_DESC {
            Type: D3D12_RAYTRACING_GEOMETRY_TYPE_TRIANGLES,
            Flags: D3D12_RAYTRACING_GEOMETRY_FLAG_OPAQUE,
            Anonymous: D3D12_RAYTRACING_GEOMETRY_DESC_0 {
                Triangles: D3D12_RAYTRACING_GEOMETRY_TRIANGLES_DESC {
                    Transform3x4: 0,
                    IndexFormat: DXGI_FORMAT_UNKNOWN,
                    VertexFormat: DXGI_FORMAT_R32G32B32_FLOAT,
                    IndexCount: 0,
                    VertexCount: *vertex_count,
                    IndexBuffer: 0,
                    VertexBuffer: D3D12_GPU_VIRTUAL_ADDRESS_AND_STRIDE {
                        StartAddress: unsafe { buffer.GetGPUVirtualAddress() },
                        StrideInBytes: Vertex::STRIDE as u64,
                    },
                },
            },
        })
        .collect();

    let inputs = D3D12_BUILD_RAYTRACING_ACCELERATION_STRUCTURE_INPUTS {
        Type: D3D12_RAYTRACING_ACCELERATION_STRUCTURE_TYPE_BOTTOM_LEVEL,
        Flags: D3D12_RAYTRACING_ACCELERATION_STRUCTURE_BUILD_FLAG_NONE,
        NumDescs: geometry_descs.len() as u32,
        DescsLayout: D3D12_ELEMENTS_LAYOUT_ARRAY,
        Anonymous: D3D12_BUILD_RAYTRACING_ACCELERATION_STRUCTURE_INPUTS_0 {
            pGeometryDescs: geometry_descs.as_ptr(),
        },
    };

    let sizes = prebuild_sizes(device, &inputs);
    let (scratch, result) = create_build_buffers(device, sizes)?;
    unsafe { result.SetName(w!("BottomLevelAS")) }?;

    build(command_list, &inputs, &scratch, &result);

    Ok(AccelerationStructureBuffers {
        scratch,
        result,
        instance_desc: None,
    })
}

struct InstanceEntry {
    bottom_level_address: u64,
    transform: Mat4,
    instance_id: u32,
    hit_group_index: u32,
}

/// Collects instances, sizes the TLAS buffers and records the TLAS build.
#[derive(Default)]
pub struct TopLevelAsGenerator {
    instances: Vec<InstanceEntry>,
}

pub struct TopLevelSizes {
    pub build: AccelerationStructureSizes,
    pub instance_descs: u64,
}

impl TopLevelAsGenerator {
    pub fn add_instance(
        &mut self,
        bottom_level: &ID3D12Resource,
        transform: Mat4,
        instance_id: u32,
        hit_group_index: u32,
    ) {
        self.instances.push(InstanceEntry {
            bottom_level_address: unsafe { bottom_level.GetGPUVirtualAddress() },
            transform,
            instance_id,
            hit_group_index,
        });
    }

    fn inputs(&self, instance_descs: u64) -> D3D12_BUILD_RAYTRACING_ACCELERATION_STRUCTURE_INPUTS {
        D3D12_BUILD_RAYTRACING_ACCELERATION_STRUCTURE_INPUTS {
            Type: D3D12_RAYTRACING_ACCELERATION_STRUCTURE_TYPE_TOP_LEVEL,
            Flags: D3D12_RAYTRACING_ACCELERATION_STRUCTURE_BUILD_FLAG_NONE,
            NumDescs: self.instances.len() as u32,
            DescsLayout: D3D12_ELEMENTS_LAYOUT_ARRAY,
            Anonymous: D3D12_BUILD_RAYTRACING_ACCELERATION_STRUCTURE_INPUTS_0 {
                InstanceDescs: instance_descs,
            },
        }
    }

    pub fn compute_buffer_sizes(&self, device: &ID3D12Device5) -> SampleResult<TopLevelSizes> {
        if self.instances.is_empty() {
            return Err(SampleReport::msg("top-level acceleration structure has no instances"));
        }
        Ok(TopLevelSizes {
            build: prebuild_sizes(device, &self.inputs(0)),
            instance_descs: instance_descs_size(self.instances.len()),
        })
    }

    /// Fills `instance_descs` (an upload buffer) and records the build.
    pub fn generate(
        &self,
        command_list: &ID3D12GraphicsCommandList4,
        scratch: &ID3D12Resource,
        result: &ID3D12Resource,
        instance_descs: &ID3D12Resource,
    ) -> SampleResult<()> {
        let descs: Vec<D3D12_RAYTRACING_INSTANCE_DESC> = self
            .instances
            .iter()
            .map(|instance| D3D12_RAYTRACING_INSTANCE_DESC {
                Transform: instance_transform(&instance.transform),
                _bitfield1: pack_instance_bitfield(instance.instance_id, 0xFF),
                _bitfield2: pack_instance_bitfield(
                    instance.hit_group_index,
                    D3D12_RAYTRACING_INSTANCE_FLAG_NONE.0 as u8,
                ),
                AccelerationStructure: instance.bottom_level_address,
            })
            .collect();
        upload(instance_descs, &descs)?;

        let inputs = self.inputs(unsafe { instance_descs.GetGPUVirtualAddress() });
        build(command_list, &inputs, scratch, result);
        Ok(())
    }
}

/// Builds the TLAS over `instances`; instance `i` gets id `i` and hit group 0.
pub fn create_top_level_as(
    device: &ID3D12Device5,
    command_list: &ID3D12GraphicsCommandList4,
    instances: &[Instance],
) -> SampleResult<AccelerationStructureBuffers> {
    let mut generator = TopLevelAsGenerator::default();
    for (i, instance) in instances.iter().enumerate() {
        generator.add_instance(&instance.bottom_level, instance.transform, i as u32, 0);
    }

    let sizes = generator.compute_buffer_sizes(device)?;
    let (scratch, result) = create_build_buffers(device, sizes.build)?;
    unsafe { result.SetName(w!("TopLevelAS")) }?;
    let instance_desc = create_buffer(
        device,
        sizes.instance_descs,
        D3D12_RESOURCE_FLAG_NONE,
        D3D12_RESOURCE_STATE_GENERIC_READ,
        &UPLOAD_HEAP,
    )?;

    generator.generate(command_list, &scratch, &result, &instance_desc)?;

    Ok(AccelerationStructureBuffers {
        scratch,
        result,
        instance_desc: Some(instance_desc),
    })
}

/// Records the BLAS and TLAS builds into the open command list, submits them
/// and waits for the GPU to finish.
pub fn create_acceleration_structures(
    pipeline: &Pipeline,
    assets: &mut Assets,
) -> SampleResult<AccelerationStructures> {
    let device = &pipeline.device;
    let command_list = &assets.command_list;
    let vertex_buffer = &assets.vertex_buffer;

    let bottom_level = create_bottom_level_as(
        device,
        command_list,
        &[(&vertex_buffer.resource, vertex_buffer.vertex_count)],
    )?;

    let instances = vec![Instance {
        bottom_level: bottom_level.result.clone(),
        transform: Mat4::IDENTITY,
    }];
    let top_level = create_top_level_as(device, command_list, &instances)?;

    unsafe { command_list.Close() }?;
    let command_lists = [Some(command_list.cast::<ID3D12CommandList>()?)];
    unsafe { pipeline.command_queue.ExecuteCommandLists(&command_lists) };
    assets.fence.wait_for_gpu(&pipeline.command_queue)?;

    info!(instances = instances.len(), "acceleration structures built");

    // The BLAS scratch buffer can go now the build has completed.
    Ok(AccelerationStructures {
        bottom_level: bottom_level.result,
        top_level,
        instances,
    })
}

fn prebuild_sizes(
    device: &ID3D12Device5,
    inputs: &D3D12_BUILD_RAYTRACING_ACCELERATION_STRUCTURE_INPUTS,
) -> AccelerationStructureSizes {
    let mut info = D3D12_RAYTRACING_ACCELERATION_STRUCTURE_PREBUILD_INFO::default();
    unsafe { device.GetRaytracingAccelerationStructurePrebuildInfo(inputs, &mut info) };
    AccelerationStructureSizes::from_prebuild(
        info.ScratchDataSizeInBytes,
        info.ResultDataMaxSizeInBytes,
    )
}

fn create_build_buffers(
    device: &ID3D12Device5,
    sizes: AccelerationStructureSizes,
) -> SampleResult<(ID3D12Resource, ID3D12Resource)> {
    let scratch = create_buffer(
        device,
        sizes.scratch,
        D3D12_RESOURCE_FLAG_ALLOW_UNORDERED_ACCESS,
        D3D12_RESOURCE_STATE_UNORDERED_ACCESS,
        &DEFAULT_HEAP,
    )?;
    let result = create_buffer(
        device,
        sizes.result,
        D3D12_RESOURCE_FLAG_ALLOW_UNORDERED_ACCESS,
        D3D12_RESOURCE_STATE_RAYTRACING_ACCELERATION_STRUCTURE,
        &DEFAULT_HEAP,
    )?;
    Ok((scratch, result))
}

fn build(
    command_list: &ID3D12GraphicsCommandList4,
    inputs: &D3D12_BUILD_RAYTRACING_ACCELERATION_STRUCTURE_INPUTS,
    scratch: &ID3D12Resource,
    result: &ID3D12Resource,
) {
    let desc = D3D12_BUILD_RAYTRACING_ACCELERATION_STRUCTURE_DESC {
        DestAccelerationStructureData: unsafe { result.GetGPUVirtualAddress() },
        Inputs: *inputs,
        SourceAccelerationStructureData: 0,
        ScratchAccelerationStructureData: unsafe { scratch.GetGPUVirtualAddress() },
    };
    unsafe {
        command_list.BuildRaytracingAccelerationStructure(&desc, None);
        // Anything reading the result (the TLAS build, later DispatchRays) waits for the write.
        command_list.ResourceBarrier(&[uav_barrier(result)]);
    }
}
