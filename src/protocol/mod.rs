//! Line-oriented text command grammars.
//!
//! Every grammar follows the same shape:
//!
//! ```text
//!   <DOMAIN>?                    → <DOMAIN>:<k>=<v>;<k>=<v>
//!   <DOMAIN>:<k>=<v>;<k>=<v>     → OK | ERR_<DOMAIN>_FMT | _NUM | _RANGE
//!   <VERB>                       → OK | domain-specific reply
//! ```
//!
//! A handler returns `None` for a line that is not its own, so several
//! handlers can be chained over one input with [`dispatch`].  Inside a
//! grammar, a rejected command is a [`ProtocolError`]; it becomes its wire
//! code only at [`CommandHandler::handle`].

pub mod admin;
pub mod environment;
pub mod heater;
pub mod tank;
pub mod valve;

use crate::error::ProtocolError;

pub const ACK_OK: &str = "OK";

/// Reply of one grammar to one line: `None` means "not mine".
pub type Reply = Option<Result<String, ProtocolError>>;

pub trait CommandHandler {
    /// Grammar-level answer, errors still typed.
    fn respond(&mut self, rx: &str) -> Reply;

    /// Wire-level answer.
    fn handle(&mut self, rx: &str) -> Option<String> {
        self.respond(rx).map(|reply| match reply {
            Ok(text) => text,
            Err(err) => err.code().into(),
        })
    }
}

/// Offer `rx` to each handler in order; the first one that answers wins.
pub fn dispatch(handlers: &mut [&mut dyn CommandHandler], rx: &str) -> Option<String> {
    handlers.iter_mut().find_map(|h| h.handle(rx))
}

/// Value of `key=` up to the next `;` (or end of line).  An empty value
/// counts as absent.
pub fn extract_value<'a>(cmd: &'a str, key: &str) -> Option<&'a str> {
    let mut needle = String::with_capacity(key.len() + 1);
    needle.push_str(key);
    needle.push('=');

    let start = cmd.find(needle.as_str())? + needle.len();
    let rest = &cmd[start..];
    let value = rest.split(';').next().unwrap_or(rest);
    (!value.is_empty()).then_some(value)
}

/// Non-empty and ASCII digits only.  No sign, no whitespace.
pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Digits only and no larger than `i32::MAX`.
pub fn is_strict_positive_int(s: &str) -> bool {
    parse_strict_positive_int(s).is_some()
}

pub fn parse_strict_positive_int(s: &str) -> Option<i32> {
    if !is_numeric(s) {
        return None;
    }
    s.bytes().try_fold(0i32, |acc, b| {
        acc.checked_mul(10)?.checked_add(i32::from(b - b'0'))
    })
}

/// Alphanumerics, space, `-` and `_`; non-empty.
pub fn is_alnum_sentence(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b' ' | b'-' | b'_'))
}

/// Pull every key of a `CFG:` write, then check each as a strict positive
/// integer inside its inclusive range.  Nothing is returned (and so
/// nothing persisted) unless every field passes.
pub(crate) fn parse_cfg_fields<const N: usize>(
    cmd: &str,
    fields: [(&str, core::ops::RangeInclusive<i32>); N],
) -> Result<[i32; N], ProtocolError> {
    let mut raw = [""; N];
    for (slot, (key, _)) in raw.iter_mut().zip(fields.iter()) {
        *slot = extract_value(cmd, key).ok_or(ProtocolError::CfgFormat)?;
    }

    let mut values = [0i32; N];
    for (value, text) in values.iter_mut().zip(raw.iter()) {
        *value = parse_strict_positive_int(text).ok_or(ProtocolError::CfgNumber)?;
    }

    for (value, (_, range)) in values.iter().zip(fields.iter()) {
        if !range.contains(value) {
            return Err(ProtocolError::CfgRange);
        }
    }
    Ok(values)
}
