//! dracut cmdline network reader
//!
//! Parses `ip=`, `vlan=`, `bond=`, `team=` and `bridge=` from dracut
//! cmdline sources into interface descriptors.

pub mod context;
pub mod hostname;
pub mod ip;
pub mod links;
pub mod method;
pub mod reader;
pub mod scanner;
pub mod variables;
pub mod vlan;
pub mod words;


pub use context::ParseContext;
pub use hostname::{is_valid_hostname, FixedHostname, HostnameLookup};
pub use ip::SyntaxKind;
pub use method::Method;
pub use reader::{CmdlineReader, ReadSummary, ReaderOptions, DEFAULT_SOURCES};
pub use scanner::{LineScanner, RawAssignment};
pub use variables::{dispatch, Variable, IGNORED_VARIABLES};
pub use words::{split_list, unquote, ParameterWords};
