fn main() {
    // SkyLight is a private framework and is not on the default search path.
    println!("cargo:rustc-link-search=framework=/System/Library/PrivateFrameworks");
    println!("cargo:rerun-if-changed=Info.plist");
}
