#![no_main]
use libfuzzer_sys::fuzz_target;
use magpie::chess::position;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(parsed) = position::Position::try_from(s) {
            let serialized = parsed.fen();
            assert_eq!(
                position::Position::from_fen(&serialized).map(|p| p.fen()).ok(),
                Some(serialized)
            );
        }
    }
});
