//! Grammars for curl's composite string flags.
//!
//! Every function here is total: malformed input yields `None` (or is
//! dropped from the iterator), never an error.
//!
//! | flag      | grammar                              |
//! |-----------|--------------------------------------|
//! | `header`  | `name ":" value`, split on first `:` |
//! | `user`    | `user ":" pass`, split on first `:`  |
//! | `cookie`  | `pair *(";" pair)`, `pair = name "=" value` |

/// Split `Name: Value` on the first colon, trimming both sides.
///
/// Entries without a colon, or with an empty name, are rejected.
pub fn split_header(raw: &str) -> Option<(&str, &str)> {
    let (name, value) = raw.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

/// Split `user:pass` on the first colon, trimming both sides.
///
/// The password may itself contain colons; an empty password is allowed.
pub fn split_credentials(raw: &str) -> Option<(&str, &str)> {
    let (user, pass) = raw.split_once(':')?;
    Some((user.trim(), pass.trim()))
}

/// Split `name=value` on the first `=`, trimming both sides.
pub fn split_pair(raw: &str) -> Option<(&str, &str)> {
    let (name, value) = raw.split_once('=')?;
    Some((name.trim(), value.trim()))
}

/// Iterate the `name=value` pairs of a `;`-joined cookie string.
///
/// Blank segments and segments without `=` are skipped.
pub fn cookie_pairs(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(split_pair)
}
