use windows::Win32::Graphics::Direct3D12::*;

use super::compile_shader::blob_bytes;
use super::compile_shader::blob_to_string;
use crate::error::SampleReport;
use crate::error::SampleResult;

// No parameters: the triangle only reads vertices through the input assembler.
pub fn create_root_signature(device: &ID3D12Device5) -> SampleResult<ID3D12RootSignature> {
    let desc = D3D12_ROOT_SIGNATURE_DESC {
        Flags: D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
        ..Default::default()
    };

    let mut signature = None;
    let mut error = None;
    let serialized = unsafe {
        D3D12SerializeRootSignature(
            &desc,
            D3D_ROOT_SIGNATURE_VERSION_1,
            &mut signature,
            Some(&mut error),
        )
    };

    if let Err(e) = serialized {
        let report = SampleReport::from(e);
        return Err(match error {
            Some(error) => report.wrap_err(format!(
                "serializing root signature: {}",
                blob_to_string(&error)
            )),
            None => report.wrap_err("serializing root signature"),
        });
    }

    let signature =
        signature.ok_or_else(|| SampleReport::msg("root signature serializer returned no blob"))?;
    Ok(unsafe { device.CreateRootSignature(0, blob_bytes(&signature)) }?)
}
