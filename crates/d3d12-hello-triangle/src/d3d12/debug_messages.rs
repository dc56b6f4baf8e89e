use tracing::debug;
use tracing::error;
use tracing::warn;
use windows::Win32::Graphics::Dxgi::*;

/// Drains the DXGI info queue into the log.
pub fn log_dxgi_debug_messages(info_queue: Option<&IDXGIInfoQueue>) {
    let Some(queue) = info_queue else {
        debug!("DXGI info queue not available");
        return;
    };

    let count = unsafe { queue.GetNumStoredMessages(DXGI_DEBUG_ALL) };
    for i in 0..count {
        let mut size: usize = 0;
        if unsafe { queue.GetMessage(DXGI_DEBUG_ALL, i, None, &mut size) }.is_err() {
            warn!(index = i, "could not size DXGI debug message");
            continue;
        }

        // u64 storage keeps the message struct suitably aligned.
        let mut buffer = vec![0u64; size.div_ceil(std::mem::size_of::<u64>())];
        let message = buffer.as_mut_ptr() as *mut DXGI_INFO_QUEUE_MESSAGE;
        if unsafe { queue.GetMessage(DXGI_DEBUG_ALL, i, Some(message), &mut size) }.is_err() {
            warn!(index = i, "could not read DXGI debug message");
            continue;
        }

        let message = unsafe { &*message };
        let description = unsafe {
            std::slice::from_raw_parts(
                message.pDescription as *const u8,
                message.DescriptionByteLength,
            )
        };
        let description = String::from_utf8_lossy(description)
            .trim_end_matches('\0')
            .trim()
            .to_string();

        match message.Severity {
            DXGI_INFO_QUEUE_MESSAGE_SEVERITY_CORRUPTION | DXGI_INFO_QUEUE_MESSAGE_SEVERITY_ERROR => {
                error!(id = message.ID, "{description}")
            }
            DXGI_INFO_QUEUE_MESSAGE_SEVERITY_WARNING => warn!(id = message.ID, "{description}"),
            _ => debug!(id = message.ID, "{description}"),
        }
    }
    unsafe { queue.ClearStoredMessages(DXGI_DEBUG_ALL) };
}
