//! JSONL tool dispatch.
//!
//! Each request line names one tool through its `tool` tag and carries that
//! tool's arguments. The reply is one JSON object per line holding the
//! plain-text answer and a status:
//!
//! ```json
//! {"tool":"open_file","relative_file_path":"pkg/app.py","start_line":1,"end_line":3}
//! {"status":"success","text":"The content of pkg/app.py from line 1 to 3 is:\n1 import os\n..."}
//! ```
//!
//! Unknown tools and schema violations are answered with a usage message
//! rather than terminating the stream.

mod errors;
mod request;
mod response;
mod toolbox;

pub use errors::DispatchError;
pub use request::ToolRequest;
pub use response::{ResponseStatus, ResponseWriter, ToolResponse};
pub use toolbox::Toolbox;
