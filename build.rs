use std::{env, path::PathBuf};

/// Native libraries whose discovery on Windows usually needs a hint.
struct NativeLibrary {
    name: &'static str,
    directory_variable: &'static str,
    vcpkg_marker: &'static str,
}

const FFMPEG: NativeLibrary = NativeLibrary {
    name: "FFmpeg",
    directory_variable: "FFMPEG_DIR",
    vcpkg_marker: "include/libavformat",
};

const SDL2: NativeLibrary = NativeLibrary {
    name: "SDL2",
    directory_variable: "SDL2_DIR",
    vcpkg_marker: "include/SDL2",
};

fn main() {
    for variable in [
        "FFMPEG_DIR",
        "SDL2_DIR",
        "VCPKG_ROOT",
        "VCPKGRS_DYNAMIC",
        "VCPKGRS_TRIPLET",
    ] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let mut libraries = vec![FFMPEG];
    if env::var_os("CARGO_FEATURE_WINDOW").is_some() {
        libraries.push(SDL2);
    }

    let vcpkg_installation = env::var("VCPKG_ROOT").ok().map(|root| {
        let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
        PathBuf::from(root).join("installed").join(triplet)
    });

    for library in &libraries {
        if env::var_os(library.directory_variable).is_some() {
            continue;
        }
        match &vcpkg_installation {
            None => println!(
                "cargo:warning={} is not set. On Windows, install {} via vcpkg and set VCPKG_ROOT + {}.",
                library.directory_variable, library.name, library.directory_variable,
            ),
            Some(installation) if installation.join(library.vcpkg_marker).exists() => println!(
                "cargo:warning=Detected vcpkg {} at {}. Set {}={} to make discovery explicit.",
                library.name,
                installation.display(),
                library.directory_variable,
                installation.display(),
            ),
            Some(installation) => println!(
                "cargo:warning=VCPKG_ROOT is set but no {} install was found at {}.",
                library.name,
                installation.display(),
            ),
        }
    }

    if vcpkg_installation.is_some() && env::var_os("VCPKGRS_DYNAMIC").is_none() {
        println!(
            "cargo:warning=Consider setting VCPKGRS_DYNAMIC=1 when using vcpkg dynamic builds on Windows."
        );
    }
}
