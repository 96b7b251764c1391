//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements   | Connects to                 |
//! |---------------|--------------|-----------------------------|
//! | `config_file` | ConfigPort   | JSON file on disk           |
//! | `log_sink`    | EventSink    | `log` facade / console      |
//! | `serial`      | DevicePort   | OS serial port (`runtime`)  |
//! | `timeline`    | TimelinePort | X API v2 over HTTPS (`runtime`) |

pub mod config_file;
pub mod log_sink;
#[cfg(feature = "runtime")]
pub mod serial;
pub mod timeline;
