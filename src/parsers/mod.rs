pub mod request_line;

pub use request_line::{parse_line, ExtractionQuality, MalformedLine, ParsedLine};
