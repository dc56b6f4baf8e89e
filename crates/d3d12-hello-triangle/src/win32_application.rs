use tracing::error;
use tracing::info;
use widestring::U16CString;
use windows::Win32::Foundation::*;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::*;

use crate::error::SampleReport;
use crate::error::SampleResult;
use crate::sample::DxSample;

const WINDOW_CLASS_NAME: PCWSTR = w!("DXSampleClass");

/// Creates the sample window, drives the message loop and returns the
/// `WM_QUIT` exit code.
pub fn run<S: DxSample>(
    sample: &mut S,
    instance: HINSTANCE,
    show_cmd: SHOW_WINDOW_CMD,
) -> SampleResult<i32> {
    let window_class = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wndproc::<S>),
        hInstance: instance,
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }?,
        lpszClassName: WINDOW_CLASS_NAME,
        ..Default::default()
    };
    if unsafe { RegisterClassExW(&window_class) } == 0 {
        return Err(last_error().wrap_err("registering window class"));
    }

    let (width, height) = sample.base().client_size();
    let mut window_rect = RECT {
        left: 0,
        top: 0,
        right: width,
        bottom: height,
    };
    unsafe { AdjustWindowRect(&mut window_rect, WS_OVERLAPPEDWINDOW, false) }?;

    let title = U16CString::from_str(sample.base().window_text())
        .map_err(|e| SampleReport::msg(format!("window title contains a NUL: {e}")))?;

    // From here on the window procedure reaches the sample through this same
    // pointer, so every access goes through it.
    let mut sample = std::ptr::NonNull::from(sample);

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            WINDOW_CLASS_NAME,
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            window_rect.right - window_rect.left,
            window_rect.bottom - window_rect.top,
            None, // no parent window
            None, // no menus
            Some(instance),
            Some(sample.as_ptr() as *const std::ffi::c_void),
        )
    }?;

    // Init failures still need the window torn down and the debug layer's explanation.
    if let Err(e) = unsafe { sample.as_mut() }.on_init(hwnd) {
        unsafe { sample.as_ref() }.report_debug_messages();
        let _ = unsafe { DestroyWindow(hwnd) };
        return Err(e.wrap_err("initialising sample"));
    }

    unsafe { _ = ShowWindow(hwnd, show_cmd) };
    info!("entering message loop");

    let mut message = MSG::default();
    loop {
        let result = unsafe { GetMessageW(&mut message, None, 0, 0) };
        match result.0 {
            0 => break,
            -1 => {
                unsafe { sample.as_mut() }.on_destroy();
                return Err(last_error().wrap_err("GetMessageW"));
            }
            _ => unsafe {
                _ = TranslateMessage(&message);
                DispatchMessageW(&message);
            },
        }
    }

    unsafe { sample.as_mut() }.on_destroy();

    // WM_QUIT carries the PostQuitMessage code in wParam.
    Ok(message.wParam.0 as i32)
}

fn last_error() -> SampleReport {
    SampleReport::from(Error::from(unsafe { GetLastError() }.to_hresult()))
}

/// What the window procedure does after the sample has seen a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handled {
    Yes,
    Quit(i32),
    No,
}

fn handle_message<S: DxSample>(sample: &mut S, message: u32, wparam: WPARAM) -> Handled {
    match message {
        WM_KEYDOWN => {
            sample.on_key_down(wparam.0 as u8);
            Handled::Yes
        }
        WM_KEYUP => {
            sample.on_key_up(wparam.0 as u8);
            Handled::Yes
        }
        WM_PAINT => {
            sample.on_update();
            if let Err(e) = sample.on_render() {
                error!("render failed: {e:?}");
                sample.report_debug_messages();
                return Handled::Quit(1);
            }
            // Rendering every WM_PAINT without validating keeps the window repainting.
            Handled::Yes
        }
        WM_DESTROY => Handled::Quit(0),
        _ => Handled::No,
    }
}

extern "system" fn wndproc<S: DxSample>(
    window: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if message == WM_CREATE {
        unsafe {
            let create_struct: &CREATESTRUCTW = &*(lparam.0 as *const CREATESTRUCTW);
            SetWindowLongPtrW(window, GWLP_USERDATA, create_struct.lpCreateParams as _);
        }
        return LRESULT(0);
    }

    let user_data = unsafe { GetWindowLongPtrW(window, GWLP_USERDATA) };
    let Some(mut sample) = std::ptr::NonNull::<S>::new(user_data as *mut S) else {
        // Messages can arrive before WM_CREATE.
        return unsafe { DefWindowProcW(window, message, wparam, lparam) };
    };

    // Safety: `run` keeps the sample borrowed for the window's whole lifetime.
    match handle_message(unsafe { sample.as_mut() }, message, wparam) {
        Handled::Yes => LRESULT(0),
        Handled::Quit(code) => {
            unsafe { PostQuitMessage(code) };
            LRESULT(0)
        }
        Handled::No => unsafe { DefWindowProcW(window, message, wparam, lparam) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SampleResult;
    use crate::render_mode::SPACE_KEY;
    use crate::sample::SampleBase;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Update,
        Render,
        KeyDown(u8),
        KeyUp(u8),
    }

    struct RecordingSample {
        base: SampleBase,
        calls: Vec<Call>,
        fail_render: bool,
        debug_reports: Cell<u32>,
    }

    impl RecordingSample {
        fn new(fail_render: bool) -> Self {
            Self {
                base: SampleBase::new(1280, 720, "recording", false),
                calls: Vec::new(),
                fail_render,
                debug_reports: Cell::new(0),
            }
        }
    }

    impl DxSample for RecordingSample {
        fn base(&self) -> &SampleBase {
            &self.base
        }

        fn on_init(&mut self, _hwnd: HWND) -> SampleResult<()> {
            Ok(())
        }

        fn on_update(&mut self) {
            self.calls.push(Call::Update);
        }

        fn on_render(&mut self) -> SampleResult<()> {
            self.calls.push(Call::Render);
            if self.fail_render {
                return Err(SampleReport::msg("device removed"));
            }
            Ok(())
        }

        fn on_destroy(&mut self) {}

        fn on_key_down(&mut self, key: u8) {
            self.calls.push(Call::KeyDown(key));
        }

        fn on_key_up(&mut self, key: u8) {
            self.calls.push(Call::KeyUp(key));
        }

        fn report_debug_messages(&self) {
            self.debug_reports.set(self.debug_reports.get() + 1);
        }
    }

    #[test]
    fn paint_updates_then_renders() {
        let mut sample = RecordingSample::new(false);
        assert_eq!(handle_message(&mut sample, WM_PAINT, WPARAM(0)), Handled::Yes);
        assert_eq!(sample.calls, vec![Call::Update, Call::Render]);
        assert_eq!(sample.debug_reports.get(), 0);
    }

    #[test]
    fn failed_render_quits_with_code_one() {
        let mut sample = RecordingSample::new(true);
        assert_eq!(handle_message(&mut sample, WM_PAINT, WPARAM(0)), Handled::Quit(1));
        assert_eq!(sample.calls, vec![Call::Update, Call::Render]);
        assert_eq!(sample.debug_reports.get(), 1);
    }

    #[test]
    fn keys_are_forwarded_with_their_virtual_key() {
        let mut sample = RecordingSample::new(false);
        let space = WPARAM(SPACE_KEY as usize);
        assert_eq!(handle_message(&mut sample, WM_KEYDOWN, space), Handled::Yes);
        assert_eq!(handle_message(&mut sample, WM_KEYUP, space), Handled::Yes);
        assert_eq!(
            sample.calls,
            vec![Call::KeyDown(SPACE_KEY), Call::KeyUp(SPACE_KEY)]
        );
    }

    #[test]
    fn destroy_quits_with_code_zero() {
        let mut sample = RecordingSample::new(false);
        assert_eq!(handle_message(&mut sample, WM_DESTROY, WPARAM(0)), Handled::Quit(0));
        assert!(sample.calls.is_empty());
    }

    #[test]
    fn other_messages_go_to_the_default_procedure() {
        let mut sample = RecordingSample::new(false);
        for message in [WM_MOUSEMOVE, WM_SIZE, WM_CLOSE] {
            assert_eq!(handle_message(&mut sample, message, WPARAM(0)), Handled::No);
        }
        assert!(sample.calls.is_empty());
    }
}
