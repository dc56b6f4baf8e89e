use tracing::info;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::core::*;

use super::FRAME_COUNT;
use super::RENDER_TARGET_FORMAT;
use super::create_device::DeviceContext;
use crate::error::SampleResult;
use crate::sample::SampleBase;

/// Device-level objects created before any asset is loaded.
pub struct Pipeline {
    pub device: ID3D12Device5,
    pub command_queue: ID3D12CommandQueue,
    pub swap_chain: IDXGISwapChain3,
    pub frame_index: u32,
    pub rtv_heap: ID3D12DescriptorHeap,
    pub rtv_descriptor_size: u32,
    pub render_targets: [ID3D12Resource; FRAME_COUNT],
    pub command_allocator: ID3D12CommandAllocator,
    pub viewport: D3D12_VIEWPORT,
    pub scissor_rect: RECT,
}

impl Pipeline {
    pub fn current_render_target(&self) -> &ID3D12Resource {
        &self.render_targets[self.frame_index as usize]
    }

    pub fn current_rtv(&self) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        rtv_handle(&self.rtv_heap, self.rtv_descriptor_size, self.frame_index)
    }
}

fn rtv_handle(heap: &ID3D12DescriptorHeap, increment: u32, index: u32) -> D3D12_CPU_DESCRIPTOR_HANDLE {
    let start = unsafe { heap.GetCPUDescriptorHandleForHeapStart() };
    D3D12_CPU_DESCRIPTOR_HANDLE {
        ptr: start.ptr + (index * increment) as usize,
    }
}

pub fn load_pipeline(context: &DeviceContext, base: &SampleBase, hwnd: HWND) -> SampleResult<Pipeline> {
    let device = context.device.clone();

    let command_queue: ID3D12CommandQueue = unsafe {
        device.CreateCommandQueue(&D3D12_COMMAND_QUEUE_DESC {
            Type: D3D12_COMMAND_LIST_TYPE_DIRECT,
            Flags: D3D12_COMMAND_QUEUE_FLAG_NONE,
            ..Default::default()
        })
    }?;

    let swap_chain_desc = DXGI_SWAP_CHAIN_DESC1 {
        BufferCount: FRAME_COUNT as u32,
        Width: base.width(),
        Height: base.height(),
        Format: RENDER_TARGET_FORMAT,
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            ..Default::default()
        },
        ..Default::default()
    };

    let swap_chain: IDXGISwapChain3 = unsafe {
        context
            .factory
            .CreateSwapChainForHwnd(&command_queue, hwnd, &swap_chain_desc, None, None)
    }?
    .cast()?;

    // No fullscreen transitions.
    unsafe { context.factory.MakeWindowAssociation(hwnd, DXGI_MWA_NO_ALT_ENTER) }?;

    let frame_index = unsafe { swap_chain.GetCurrentBackBufferIndex() };

    let rtv_heap: ID3D12DescriptorHeap = unsafe {
        device.CreateDescriptorHeap(&D3D12_DESCRIPTOR_HEAP_DESC {
            NumDescriptors: FRAME_COUNT as u32,
            Type: D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
            Flags: D3D12_DESCRIPTOR_HEAP_FLAG_NONE,
            ..Default::default()
        })
    }?;
    let rtv_descriptor_size =
        unsafe { device.GetDescriptorHandleIncrementSize(D3D12_DESCRIPTOR_HEAP_TYPE_RTV) };

    let render_targets: [ID3D12Resource; FRAME_COUNT] =
        array_init::try_array_init(|i: usize| -> SampleResult<ID3D12Resource> {
            let target: ID3D12Resource = unsafe { swap_chain.GetBuffer(i as u32) }?;
            unsafe {
                device.CreateRenderTargetView(
                    &target,
                    None,
                    rtv_handle(&rtv_heap, rtv_descriptor_size, i as u32),
                )
            };
            Ok(target)
        })?;

    let command_allocator = unsafe { device.CreateCommandAllocator(D3D12_COMMAND_LIST_TYPE_DIRECT) }?;

    let viewport = D3D12_VIEWPORT {
        TopLeftX: 0.0,
        TopLeftY: 0.0,
        Width: base.width() as f32,
        Height: base.height() as f32,
        MinDepth: D3D12_MIN_DEPTH,
        MaxDepth: D3D12_MAX_DEPTH,
    };
    let (right, bottom) = base.client_size();
    let scissor_rect = RECT {
        left: 0,
        top: 0,
        right,
        bottom,
    };

    info!(
        width = base.width(),
        height = base.height(),
        frames = FRAME_COUNT,
        "swap chain created"
    );

    Ok(Pipeline {
        device,
        command_queue,
        swap_chain,
        frame_index,
        rtv_heap,
        rtv_descriptor_size,
        render_targets,
        command_allocator,
        viewport,
        scissor_rect,
    })
}
