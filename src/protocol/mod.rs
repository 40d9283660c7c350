//! Protocol Module
//!
//! Defines the ServerQuery text wire format.
//!
//! ## Request Format
//! ```text
//! <cmd>[ -<option>]*[ <key>=<value>[|<key>=<value>]*]*\n
//! ```
//! Every command name, option, key and value is escaped (see [`escape`]).
//!
//! ## Response Format
//! ```text
//! [<key>=<value> ...[|<key>=<value> ...]*]\n     zero or more data lines
//! error id=<n> msg=<text>\n                      terminator, id 0 = success
//! ```
//!
//! ## Notifications
//! ```text
//! notify<event> <key>=<value> ...\n
//! ```
//! May arrive at any time, interleaved with responses.

mod codec;
mod command;
mod line;
mod record;
mod response;

pub use codec::{escape, unescape};
pub use command::{encode_command, Command, ParamValue};
pub use line::{classify, Line, ERROR_PREFIX, NOTIFY_PREFIX};
pub use record::{Record, Value};
pub use response::{parse_response, Response};
