//! Build script for taskhive-dispatch.
//!
//! Compiles the dispatch protocol buffer definitions via `tonic-prost-build`.
//! Proto files live in `proto/taskhive/v1/` relative to this crate.
//!
//! Requires the `protoc` compiler to be installed on the system.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::path::PathBuf;

    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let proto_root = manifest_dir.join("proto");

    let proto_files = ["taskhive/v1/dispatch.proto"];

    let proto_paths: Vec<PathBuf> = proto_files
        .iter()
        .map(|f| {
            let path = proto_root.join(f);
            if !path.exists() {
                panic!("Proto file not found: {path:?}");
            }
            path
        })
        .collect();

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .build_transport(true)
        .file_descriptor_set_path(
            PathBuf::from(std::env::var("OUT_DIR")?).join("taskhive_descriptor.bin"),
        )
        .emit_rerun_if_changed(true)
        .compile_protos(&proto_paths, std::slice::from_ref(&proto_root))?;

    println!("cargo:rerun-if-changed={}", proto_root.display());
    for proto in &proto_files {
        println!("cargo:rerun-if-changed={}", proto_root.join(proto).display());
    }

    Ok(())
}
