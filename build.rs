fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");

    // Empty outside a git checkout (e.g. building from a crates.io tarball).
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .unwrap_or_default();

    println!("cargo:rustc-env=PHOTO_OPTIMIZER_GIT_HASH={hash}");
}
