fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 使用内置的protoc二进制，避免本机安装依赖
    let protoc = protoc_bin_vendored::protoc_bin_path().expect("Failed to get vendored protoc");
    // Rust 2024 中 set_var 变为 unsafe，此处构建脚本是单线程执行，使用unsafe包裹
    unsafe {
        std::env::set_var("PROTOC", &protoc);
    }

    // 客户端和服务端代码都生成：服务端只在集成测试里使用
    tonic_prost_build::configure().compile_protos(&["proto/shapes.proto"], &["proto"])?;
    println!("cargo:rerun-if-changed=proto/shapes.proto");
    Ok(())
}
