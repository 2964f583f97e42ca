//! Generates the C header for the `extern "C"` surface into `OUT_DIR`.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let Ok(out_dir) = env::var("OUT_DIR") else {
        println!("cargo:warning=OUT_DIR not set, skipping header generation");
        return;
    };
    let header = PathBuf::from(out_dir).join("retail_ffi.h");

    let result = cbindgen::Builder::new()
        .with_src(PathBuf::from(&crate_dir).join("src/lib.rs"))
        .with_src(PathBuf::from(&crate_dir).join("src/types.rs"))
        .with_language(cbindgen::Language::C)
        .with_include_guard("RETAIL_FFI_H")
        .with_no_includes()
        .with_sys_include("stdint.h")
        .with_sys_include("stdbool.h")
        .generate();

    match result {
        Ok(bindings) => {
            bindings.write_to_file(&header);
        }
        Err(e) => println!("cargo:warning=cbindgen failed: {e}"),
    }
}
