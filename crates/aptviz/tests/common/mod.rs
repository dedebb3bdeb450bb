//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Dry-run output for `bar`, pulling in `libbar` and the recommended `baz`
pub const PLAN: &str = "\
NOTE: This is only a simulation!
Inst libbar (1.0-1 Debian:testing [amd64])
Inst baz (2.1 Debian:testing [all])
Inst bar (1.0-1 Debian:testing [amd64])
Conf libbar (1.0-1 Debian:testing [amd64])
Conf baz (2.1 Debian:testing [all])
Conf bar (1.0-1 Debian:testing [amd64])
";

/// Packages file matching [`PLAN`]
pub const PACKAGES: &str = "\
Package: bar
Version: 1.0-1
Depends: libbar (>= 1.0), libc6
Recommends: baz
Suggests: bar-doc

Package: libbar
Version: 1.0-1
Depends: libc6

Package: baz
Version: 2.1
Suggests: bar
";

/// Path to the aptviz binary built for this test run
pub fn aptviz_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_aptviz"))
}

/// Write `contents` to `name` inside `dir` and return the path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Run the aptviz binary in `dir` with colors and user configuration disabled
pub fn run_aptviz_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(aptviz_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("APTVIZ_ASCII", "1")
        .env_remove("RUST_LOG")
        .env_remove("APTVIZ_INSTALLER")
        .env_remove("APTVIZ_APT_CACHE")
        .env_remove("APTVIZ_PACKAGES_FILE")
        .env_remove("APTVIZ_STRICT")
        .output()
        .expect("Failed to execute aptviz binary")
}

/// Run aptviz offline against [`PLAN`] and [`PACKAGES`] written into `dir`
pub fn run_offline(dir: &Path, plan: &str, extra: &[&str]) -> Output {
    write_file(dir, "plan.txt", plan);
    write_file(dir, "Packages", PACKAGES);
    let mut args = vec!["--plan-file", "plan.txt", "--packages-file", "Packages"];
    args.extend_from_slice(extra);
    run_aptviz_in_dir(dir, &args)
}
