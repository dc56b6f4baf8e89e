fn main() {
    // Executables don't export `#[no_mangle]` statics by default. The driver
    // looks NvOptimusEnablement up in the export table of the .exe.
    let target = std::env::var("TARGET").unwrap_or_default();
    if target.ends_with("windows-msvc") {
        println!("cargo:rustc-link-arg-bins=/EXPORT:NvOptimusEnablement");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
