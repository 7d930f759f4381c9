use std::env;
use std::path::PathBuf;

// ffmpeg-sys-next finds the FFmpeg libraries via pkg-config on Unix; on
// Windows it needs FFMPEG_DIR. Emit hints for the common vcpkg layout so a
// failed build tells the user what to set.
fn main() {
    for variable in ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_DYNAMIC", "VCPKGRS_TRIPLET"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows")
        || env::var_os("FFMPEG_DIR").is_some()
    {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=FFMPEG_DIR is not set. Install FFmpeg via vcpkg and set VCPKG_ROOT and FFMPEG_DIR so the FFmpeg libraries can be located."
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let install_dir = PathBuf::from(&vcpkg_root).join("installed").join(&triplet);

    if !install_dir.exists() {
        println!(
            "cargo:warning=VCPKG_ROOT is set but nothing is installed at {}.",
            install_dir.display(),
        );
        return;
    }

    println!(
        "cargo:warning=Found a vcpkg install at {}. Set FFMPEG_DIR to that path to make FFmpeg discovery explicit.",
        install_dir.display(),
    );
    if env::var_os("VCPKGRS_DYNAMIC").is_none() {
        println!(
            "cargo:warning=For vcpkg dynamic FFmpeg builds, also set VCPKGRS_DYNAMIC=1."
        );
    }
}
