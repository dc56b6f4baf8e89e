use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::core::*;

use crate::error::SampleReport;
use crate::error::SampleResult;

pub const SHADER_SOURCE: &str = include_str!("shaders.hlsl");

/// Compiles one entry point of the embedded HLSL source.
pub fn compile_shader(entry_point: PCSTR, target: PCSTR) -> SampleResult<ID3DBlob> {
    let flags = if cfg!(debug_assertions) {
        D3DCOMPILE_DEBUG | D3DCOMPILE_SKIP_OPTIMIZATION
    } else {
        0
    };

    let mut shader_blob = None;
    let mut error_blob = None;
    let result = unsafe {
        D3DCompile(
            SHADER_SOURCE.as_ptr() as *const _,
            SHADER_SOURCE.len(),
            s!("shaders.hlsl"),
            None,
            None,
            entry_point,
            target,
            flags,
            0,
            &mut shader_blob,
            Some(&mut error_blob),
        )
    };

    let entry = unsafe { entry_point.to_string() }.unwrap_or_default();
    if let Err(e) = result {
        let report = SampleReport::from(e);
        return Err(match error_blob {
            Some(error) => report.wrap_err(format!(
                "compiling {entry}: {}",
                blob_to_string(&error)
            )),
            None => report.wrap_err(format!("compiling {entry}")),
        });
    }

    shader_blob.ok_or_else(|| SampleReport::msg(format!("compiler returned no bytecode for {entry}")))
}

pub fn blob_to_string(blob: &ID3DBlob) -> String {
    let bytes = blob_bytes(blob);
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

pub fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
}
