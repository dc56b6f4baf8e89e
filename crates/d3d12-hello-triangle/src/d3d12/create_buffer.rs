use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use crate::error::SampleReport;
use crate::error::SampleResult;

pub const UPLOAD_HEAP: D3D12_HEAP_PROPERTIES = D3D12_HEAP_PROPERTIES {
    Type: D3D12_HEAP_TYPE_UPLOAD,
    CPUPageProperty: D3D12_CPU_PAGE_PROPERTY_UNKNOWN,
    MemoryPoolPreference: D3D12_MEMORY_POOL_UNKNOWN,
    CreationNodeMask: 1,
    VisibleNodeMask: 1,
};

pub const DEFAULT_HEAP: D3D12_HEAP_PROPERTIES = D3D12_HEAP_PROPERTIES {
    Type: D3D12_HEAP_TYPE_DEFAULT,
    ..UPLOAD_HEAP
};

/// Creates a committed buffer resource of `size` bytes.
pub fn create_buffer(
    device: &ID3D12Device5,
    size: u64,
    flags: D3D12_RESOURCE_FLAGS,
    initial_state: D3D12_RESOURCE_STATES,
    heap: &D3D12_HEAP_PROPERTIES,
) -> SampleResult<ID3D12Resource> {
    let desc = D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
        Alignment: 0,
        Width: size,
        Height: 1,
        DepthOrArraySize: 1,
        MipLevels: 1,
        Format: DXGI_FORMAT_UNKNOWN,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
        Flags: flags,
    };

    let mut buffer: Option<ID3D12Resource> = None;
    unsafe {
        device.CreateCommittedResource(
            heap,
            D3D12_HEAP_FLAG_NONE,
            &desc,
            initial_state,
            None,
            &mut buffer,
        )
    }?;
    buffer.ok_or_else(|| SampleReport::msg(format!("CreateCommittedResource returned no buffer ({size} bytes)")))
}

/// Copies `data` into an upload-heap buffer through a CPU mapping.
pub fn upload<T: Copy>(buffer: &ID3D12Resource, data: &[T]) -> SampleResult<()> {
    unsafe {
        let mut mapped = std::ptr::null_mut();
        // Empty read range: the CPU never reads this buffer.
        let read_range = D3D12_RANGE { Begin: 0, End: 0 };
        buffer.Map(0, Some(&read_range), Some(&mut mapped))?;
        std::ptr::copy_nonoverlapping(data.as_ptr(), mapped as *mut T, data.len());
        buffer.Unmap(0, None);
    }
    Ok(())
}
