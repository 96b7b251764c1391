//! Fuzz target: timeline response decoding
//!
//! Feeds arbitrary bytes to the API v2 response decoders, verifying:
//! - No panics on malformed, truncated or hostile JSON
//! - Failures are always reported as `FetchError::Decode` or
//!   `FetchError::UnknownAccount`
//!
//! cargo fuzz run fuzz_timeline_decode

#![no_main]

use libfuzzer_sys::fuzz_target;

use hashswitch::adapters::timeline::{decode_latest_post, decode_user_id};
use hashswitch::app::ports::FetchError;

fuzz_target!(|data: &[u8]| {
    let body = String::from_utf8_lossy(data);

    match decode_latest_post(&body) {
        Ok(_) | Err(FetchError::Decode(_)) => {}
        Err(other) => panic!("unexpected error kind: {other:?}"),
    }

    match decode_user_id(&body, "fuzz") {
        Ok(id) => assert!(!id.is_empty()),
        Err(FetchError::Decode(_) | FetchError::UnknownAccount(_)) => {}
        Err(other) => panic!("unexpected error kind: {other:?}"),
    }
});
