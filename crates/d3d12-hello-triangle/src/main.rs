#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use d3d12_hello_triangle::config::SampleArgs;
use d3d12_hello_triangle::entry::launch;

/// Asks NVIDIA Optimus drivers to run this process on the discrete GPU.
#[allow(non_upper_case_globals)]
#[unsafe(no_mangle)]
#[used]
pub static NvOptimusEnablement: u32 = 0x0000_0001;

fn init_logging() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_target(false)
        .init();
    Ok(())
}

#[cfg(windows)]
fn run_app(args: &SampleArgs) -> i32 {
    use d3d12_hello_triangle::d3d12::HelloTriangle;
    use d3d12_hello_triangle::entry::FAILURE_EXIT_CODE;
    use d3d12_hello_triangle::win32_application;

    let (instance, show_cmd) = match startup::startup_parameters() {
        Ok(params) => params,
        Err(e) => {
            tracing::error!("{e:?}");
            return FAILURE_EXIT_CODE;
        }
    };

    launch(
        |width, height, title| HelloTriangle::new(width, height, title, args),
        |sample| win32_application::run(sample, instance, show_cmd),
    )
}

#[cfg(not(windows))]
fn run_app(_args: &SampleArgs) -> i32 {
    launch(
        |_, _, _| (),
        |_| {
            Err(d3d12_hello_triangle::error::SampleReport::msg(
                "this sample requires Windows and Direct3D 12",
            ))
        },
    )
}

fn main() {
    if let Err(e) = init_logging() {
        eprintln!("failed to initialise logging: {e:?}");
    }
    let args = match SampleArgs::from_env() {
        Ok(args) => args,
        Err(code) => std::process::exit(code),
    };
    let code = run_app(&args);
    std::process::exit(code);
}

#[cfg(windows)]
mod startup {
    use d3d12_hello_triangle::entry::show_command;
    use d3d12_hello_triangle::error::SampleResult;
    use windows::Win32::Foundation::HINSTANCE;
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::System::Threading::GetStartupInfoW;
    use windows::Win32::System::Threading::STARTUPINFOW;
    use windows::Win32::UI::WindowsAndMessaging::SHOW_WINDOW_CMD;

    /// The `hInstance` and `nCmdShow` a `WinMain` entry point would receive.
    pub fn startup_parameters() -> SampleResult<(HINSTANCE, SHOW_WINDOW_CMD)> {
        let instance: HINSTANCE = unsafe { GetModuleHandleW(None) }?.into();

        let mut startup_info = STARTUPINFOW {
            cb: std::mem::size_of::<STARTUPINFOW>() as u32,
            ..Default::default()
        };
        unsafe { GetStartupInfoW(&mut startup_info) };

        let show_cmd = SHOW_WINDOW_CMD(show_command(
            startup_info.dwFlags.0,
            startup_info.wShowWindow,
        ));
        Ok((instance, show_cmd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimus_export_requests_the_discrete_gpu() {
        assert_eq!(NvOptimusEnablement, 1);
    }
}
