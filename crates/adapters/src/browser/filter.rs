// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static-asset response filter (§4.3): responses that match this filter
//! never become failing records, even when their status is ≥400.

const STATIC_SUFFIXES: &[&str] =
    &[".js", ".css", ".png", ".jpg", ".jpeg", ".svg", ".gif", ".ico", ".woff", ".woff2", ".ttf"];

const FONT_CDN_HOSTS: &[&str] =
    &["fonts.googleapis.com", "fonts.gstatic.com", "use.typekit.net", "fonts.cdnfonts.com"];

/// Whether `url` should be dropped from consideration as a failing request.
pub fn is_static_asset(url: &str) -> bool {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);

    if STATIC_SUFFIXES.iter().any(|suffix| without_query.ends_with(suffix)) {
        return true;
    }

    host_of(url).map(|host| FONT_CDN_HOSTS.contains(&host)).unwrap_or(false)
}

fn host_of(url: &str) -> Option<&str> {
    let after_scheme = url.split_once("://").map(|(_, rest)| rest)?;
    let host = after_scheme.split(['/', '?', '#']).next()?;
    Some(host.rsplit_once('@').map(|(_, h)| h).unwrap_or(host))
}
