//! Compiles the naked-assembly exception glue (`src/arch/cortex_m4.s`) and
//! links it into the kernel crate. Only runs for actual Cortex-M targets:
//! host test builds (`cargo test`) never touch this file, since the
//! arch-specific glue is cfg'd out of the Rust side for them too.

fn main() {
    let target = std::env::var("TARGET").unwrap_or_default();
    if !target.starts_with("thumbv7em") && !target.starts_with("thumbv7m") {
        return;
    }

    cc::Build::new()
        .file("src/arch/cortex_m4.s")
        .compile("rtos_arch_cortex_m4");

    println!("cargo:rerun-if-changed=src/arch/cortex_m4.s");
}
