//! Stand-in encoder executable for sink tests.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable script into `dir` that records its arguments, one per
/// line, in `args.txt`, then runs `body` with `$last` set to its final argument.
pub(crate) fn fake_encoder(dir: &Path, body: &str) -> PathBuf {
    let script = dir.join("fake-ffmpeg");
    let contents = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\nfor last; do :; done\n{}\n",
        dir.join("args.txt").display(),
        body
    );
    std::fs::write(&script, contents).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

pub(crate) fn recorded_args(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("args.txt"))
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}
