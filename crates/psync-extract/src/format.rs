//! Patch file text in the layout `git format-patch --zero-commit
//! --no-signature` produces, minus the diffstat.

use std::fmt::Write;

use psync_diff::{render_unified, FileDiff};
use psync_git::CommitHeader;

use crate::header::summary;
use crate::message::raw_body;

const ZERO_FROM: &str = "From 0000000000000000000000000000000000000000 Mon Sep 17 00:00:00 2001";

/// Render a commit and its (already filtered) diff as a mail-style patch.
pub fn format_patch(header: &CommitHeader, diff: &[FileDiff]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{ZERO_FROM}");
    let _ = writeln!(out, "From: {} <{}>", header.author.name, header.author.email);
    let _ = writeln!(out, "Date: {}", header.time.to_rfc2822());
    let _ = writeln!(out, "Subject: [PATCH] {}", summary(&header.message));
    out.push('\n');

    let body = raw_body(&header.message);
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    out.push_str("---\n");
    out.push_str(&render_unified(diff));
    out
}
