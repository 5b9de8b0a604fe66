#![no_main]

use libfuzzer_sys::fuzz_target;
use reqtrace::parsers::parse_line;

const MAX_LINE_LEN: usize = 4096;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_LINE_LEN {
        return;
    }
    let line = String::from_utf8_lossy(data);

    let first = parse_line(&line);
    let second = parse_line(&line);

    match (first, second) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a, b, "parser must be deterministic");
            let entry = a.entry;
            assert!(!entry.level.is_empty());
            assert!(!entry.service.is_empty());
            assert!(!entry.message.is_empty());
            assert!(!entry.message.contains(','));
            assert_eq!(a.quality.missing_request_id, entry.request_id.is_empty());
            assert_eq!(a.quality.missing_user_id, entry.user_id.is_empty());
        }
        (Err(a), Err(b)) => assert_eq!(a, b, "parser must be deterministic"),
        _ => panic!("parser gave different outcomes for the same line"),
    }
});
