//! Incoming line classification
//!
//! Every line after the greeting has one of three shapes:
//!
//! ```text
//! error id=0 msg=ok                         terminates the executing command
//! notifycliententerview cid=1 clid=7 ...    unsolicited event
//! clid=1 cid=1 client_nickname=serveradmin  data for the executing command
//! ```

/// Prefix of the line that terminates every command
pub const ERROR_PREFIX: &str = "error ";

/// Prefix of server-pushed event lines
pub const NOTIFY_PREFIX: &str = "notify";

/// A classified protocol line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `error <payload>`
    Terminator(&'a str),

    /// `notify<event> <payload>`
    Notification { event: &'a str, payload: &'a str },

    /// Anything else
    Data(&'a str),
}

/// Classify a line. Surrounding whitespace (including the `\r` of `\n\r`
/// line endings) is removed first.
pub fn classify(line: &str) -> Line<'_> {
    let line = line.trim();

    if let Some(payload) = line.strip_prefix(ERROR_PREFIX) {
        return Line::Terminator(payload.trim());
    }

    if let Some(rest) = line.strip_prefix(NOTIFY_PREFIX) {
        let (event, payload) = rest.split_once(' ').unwrap_or((rest, ""));
        return Line::Notification {
            event,
            payload: payload.trim(),
        };
    }

    Line::Data(line)
}
