use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // Stage memory.x (STM32F407: 1M flash at 0x0800_0000, 128K RAM at
    // 0x2000_0000) where cortex-m-rt's link.x expects to find it. The
    // master stack the kernel carves for its tasks lives inside that RAM
    // region as ordinary static data.
    let out = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::copy("memory.x", out.join("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
