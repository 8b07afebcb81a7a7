use std::process::Command;

fn git(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let commit = git(&["rev-parse", "--short", "HEAD"]);
    println!("cargo:rustc-env=GIT_COMMIT={commit}");

    // Re-run the build script if git changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    // Embedded into the binary by the /openapi handler
    println!("cargo:rerun-if-changed=api/hospital-mgmt.openapi.yaml");
}
