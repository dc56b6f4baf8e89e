use tracing::error;

use crate::SAMPLE_HEIGHT;
use crate::SAMPLE_TITLE;
use crate::SAMPLE_WIDTH;
use crate::error::SampleResult;

/// Exit code used when the run loop fails before producing one.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// `STARTF_USESHOWWINDOW`: `wShowWindow` in the startup info is meaningful.
pub const STARTF_USESHOWWINDOW: u32 = 0x0000_0001;
/// `SW_SHOWDEFAULT`.
pub const SW_SHOWDEFAULT: i32 = 10;

/// The `nCmdShow` a `WinMain` entry point would receive for the given startup info.
pub fn show_command(startup_flags: u32, show_window: u16) -> i32 {
    if startup_flags & STARTF_USESHOWWINDOW == STARTF_USESHOWWINDOW {
        i32::from(show_window)
    } else {
        SW_SHOWDEFAULT
    }
}

/// Builds the sample with the fixed window parameters and hands it to `run`.
///
/// Returns `run`'s exit code unchanged. An error is logged and reported as
/// [`FAILURE_EXIT_CODE`]. The sample is dropped before this returns.
pub fn launch<S, N, R>(new_sample: N, run: R) -> i32
where
    N: FnOnce(u32, u32, &str) -> S,
    R: FnOnce(&mut S) -> SampleResult<i32>,
{
    let mut sample = new_sample(SAMPLE_WIDTH, SAMPLE_HEIGHT, SAMPLE_TITLE);
    match run(&mut sample) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:?}");
            FAILURE_EXIT_CODE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SampleReport;
    use std::cell::Cell;

    #[derive(Debug, PartialEq)]
    struct Recorded {
        width: u32,
        height: u32,
        title: String,
    }

    #[test]
    fn builds_one_sample_with_the_fixed_parameters() {
        let constructed = Cell::new(0);
        let runs = Cell::new(0);
        let code = launch(
            |width, height, title| {
                constructed.set(constructed.get() + 1);
                Recorded {
                    width,
                    height,
                    title: title.to_string(),
                }
            },
            |sample| {
                runs.set(runs.get() + 1);
                assert_eq!(
                    *sample,
                    Recorded {
                        width: 1280,
                        height: 720,
                        title: "D3D12 Hello Triangle".to_string(),
                    }
                );
                Ok(0)
            },
        );
        assert_eq!(code, 0);
        assert_eq!(constructed.get(), 1);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn run_exit_code_is_returned_unchanged() {
        for expected in [0, 1, 42, -1, 259] {
            assert_eq!(launch(|_, _, _| (), |_| Ok(expected)), expected);
        }
    }

    #[test]
    fn show_window_is_used_when_flagged() {
        // SW_SHOWMINNOACTIVE, as a shortcut set to "Minimized" launches it.
        assert_eq!(show_command(STARTF_USESHOWWINDOW, 7), 7);
        assert_eq!(show_command(STARTF_USESHOWWINDOW | 0x0000_0100, 3), 3);
    }

    #[test]
    fn show_default_without_the_flag() {
        assert_eq!(show_command(0, 7), SW_SHOWDEFAULT);
        // STARTF_USESTDHANDLES alone leaves wShowWindow unset.
        assert_eq!(show_command(0x0000_0100, 0), SW_SHOWDEFAULT);
    }

    #[cfg(windows)]
    #[test]
    fn startup_constants_match_the_sdk() {
        use windows::Win32::System::Threading::STARTF_USESHOWWINDOW as SDK_STARTF_USESHOWWINDOW;
        use windows::Win32::UI::WindowsAndMessaging::SW_SHOWDEFAULT as SDK_SW_SHOWDEFAULT;

        assert_eq!(STARTF_USESHOWWINDOW, SDK_STARTF_USESHOWWINDOW.0);
        assert_eq!(SW_SHOWDEFAULT, SDK_SW_SHOWDEFAULT.0);
    }

    #[test]
    fn run_errors_become_a_failure_code() {
        let code = launch(|_, _, _| (), |_| Err(SampleReport::msg("no adapter")));
        assert_eq!(code, FAILURE_EXIT_CODE);
    }
}
