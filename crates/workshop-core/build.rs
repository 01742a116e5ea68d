//! Compiles the workshop protobuf definitions into gRPC bindings.
//!
//! The proto files are parsed with `protox` (a pure-Rust compiler) so the
//! build does not depend on a system `protoc` binary. The resulting file
//! descriptor set is written to `OUT_DIR` for the reflection service and then
//! handed to `tonic-build` for code generation.

use prost::Message;
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    let protos = [
        "proto/greet.proto",
        "proto/calculator.proto",
        "proto/blog.proto",
    ];
    for proto in &protos {
        println!("cargo:rerun-if-changed={proto}");
    }

    let fds = protox::compile(protos, ["proto"])?;
    std::fs::write(out_dir.join("workshop_descriptor.bin"), fds.encode_to_vec())?;

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_fds(fds)?;

    Ok(())
}
