use clap::ArgAction;
use clap::Parser;
use std::ffi::OsString;
use tracing::error;
use tracing::info;

/// Command line arguments for sample initialization
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "d3d12_hello_triangle", about = "Draw a triangle with Direct3D 12")]
pub struct SampleArgs {
    /// Force the WARP software adapter instead of a hardware adapter
    #[arg(short, long)]
    pub warp: bool,

    /// Enable the D3D12 debug layer (default in debug builds)
    #[arg(long, action = ArgAction::SetTrue, overrides_with = "no_debug_layer")]
    pub debug_layer: bool,

    /// Disable the D3D12 debug layer
    #[arg(long, action = ArgAction::SetTrue, overrides_with = "debug_layer")]
    pub no_debug_layer: bool,

    /// Turn on GPU-based validation when the debug layer is enabled
    #[arg(long)]
    pub gpu_validation: bool,
}

impl SampleArgs {
    /// Parses the process arguments.
    ///
    /// Release builds have no console, so usage and parse errors also go
    /// through `tracing`. On failure this returns clap's exit code.
    pub fn from_env() -> Result<Self, i32> {
        Self::from_args(std::env::args_os())
    }

    pub fn from_args<I, T>(args: I) -> Result<Self, i32>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args = args.into_iter().map(Into::into).map(normalize_legacy_flag);
        Self::try_parse_from(args).map_err(|e| {
            let rendered = e.render();
            if e.use_stderr() {
                error!("{rendered}");
            } else {
                info!("{rendered}");
            }
            e.exit_code()
        })
    }

    pub fn debug_layer_enabled(&self) -> bool {
        if self.no_debug_layer {
            false
        } else {
            self.debug_layer || cfg!(debug_assertions)
        }
    }
}

// The C++ samples take `-warp` or `/warp`, case-insensitive.
fn normalize_legacy_flag(arg: OsString) -> OsString {
    match arg.to_str() {
        Some(s) if s.eq_ignore_ascii_case("-warp") || s.eq_ignore_ascii_case("/warp") => {
            OsString::from("--warp")
        }
        _ => arg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SampleArgs {
        let mut full = vec!["d3d12_hello_triangle"];
        full.extend_from_slice(args);
        SampleArgs::from_args(full).unwrap()
    }

    #[test]
    fn no_arguments_uses_hardware_adapter() {
        let args = parse(&[]);
        assert_eq!(args, SampleArgs::default());
        assert!(!args.warp);
    }

    #[test]
    fn warp_accepts_every_spelling() {
        for flag in ["--warp", "-w", "-warp", "/warp", "/WARP", "-Warp"] {
            assert!(parse(&[flag]).warp, "{flag} should select WARP");
        }
    }

    #[test]
    fn debug_layer_flags_override_the_build_default() {
        assert!(parse(&["--debug-layer"]).debug_layer_enabled());
        assert!(!parse(&["--no-debug-layer"]).debug_layer_enabled());
        assert_eq!(parse(&[]).debug_layer_enabled(), cfg!(debug_assertions));
    }

    #[test]
    fn last_debug_layer_flag_wins() {
        assert!(parse(&["--no-debug-layer", "--debug-layer"]).debug_layer_enabled());
        assert!(!parse(&["--debug-layer", "--no-debug-layer"]).debug_layer_enabled());
    }

    #[test]
    fn unknown_flags_fail_with_the_usage_code() {
        let result = SampleArgs::from_args(["d3d12_hello_triangle", "--fullscreen"]);
        assert_eq!(result, Err(2));
    }

    #[test]
    fn help_exits_successfully() {
        let result = SampleArgs::from_args(["d3d12_hello_triangle", "--help"]);
        assert_eq!(result, Err(0));
    }
}
