// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use prost::Message;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_root = "proto";
    let proto_file = format!("{proto_root}/orca.proto");
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    // protox parses the .proto in pure Rust so builds don't need a system protoc
    let descriptors = protox::compile([proto_file.as_str()], [proto_root])?;
    let descriptor_path = out_dir.join("orca_descriptor.bin");
    std::fs::write(&descriptor_path, descriptors.encode_to_vec())?;

    let mut config = prost_build::Config::new();
    config.file_descriptor_set_path(&descriptor_path);
    config.skip_protoc_run();

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_with_config(config, &[proto_file.as_str()], &[proto_root])?;

    println!("cargo:rerun-if-changed={proto_file}");
    Ok(())
}
