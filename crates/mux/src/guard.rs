// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The forbidden-operations shell wrapper (spec §4.7): a `git` shim
//! installed ahead of the real `git` on every multiplexer session's
//! `PATH`, rejecting destructive version-control invocations below the
//! agent's reasoning rather than trusting the agent not to issue them.

use std::io;
use std::path::{Path, PathBuf};

pub const GUARD_SCRIPT_NAME: &str = "git";

const GUARD_SCRIPT: &str = r#"#!/bin/sh
# Installed by teleclaude-mux ahead of the real git on PATH.
case "$1" in
  reset)
    for arg in "$@"; do
      if [ "$arg" = "--hard" ]; then
        echo "teleclaude: 'git reset --hard' is blocked in this session" >&2
        exit 1
      fi
    done
    ;;
  checkout)
    echo "teleclaude: 'git checkout' is blocked in this session (can discard work)" >&2
    exit 1
    ;;
  clean)
    echo "teleclaude: 'git clean' is blocked in this session" >&2
    exit 1
    ;;
  stash)
    case "$2" in
      pop|drop|clear)
        echo "teleclaude: 'git stash $2' is blocked in this session" >&2
        exit 1
        ;;
    esac
    ;;
esac
exec /usr/bin/env -S PATH="$TC_GUARD_REAL_PATH" git "$@"
"#;

/// Writes the guard script into `guard_dir` (creating it if absent) and
/// returns the directory so the caller can prepend it to the session's
/// `PATH`. Idempotent: overwrites any stale copy from a previous run.
pub fn install_guard(guard_dir: impl AsRef<Path>) -> io::Result<PathBuf> {
    let dir = guard_dir.as_ref().to_path_buf();
    std::fs::create_dir_all(&dir)?;
    let script_path = dir.join(GUARD_SCRIPT_NAME);
    std::fs::write(&script_path, GUARD_SCRIPT)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&script_path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script_path, perms)?;
    }

    Ok(dir)
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
