//! # Health Bridge Core
//!
//! Domain logic between the native health SDK and the application layer.
//!
//! ## Components
//!
//! - **Translator** (`translate`): wire names to `Connection` / `Permission`
//! - **Result Codec** (`codec`): SDK results to `{success, data | error}` envelopes
//! - **Background Event Buffer** (`buffer`): bounded, durable FIFO of updates
//! - **Update Router** (`router`): fan-out of SDK updates to the buffer and the live channel

pub mod buffer;
pub mod codec;
pub mod error;
pub mod router;
pub mod translate;

pub use buffer::{BackgroundEventBuffer, BufferedEvent};
pub use codec::{
    data_envelope, encode, encode_optional, map_error, sdk_error_envelope, status_envelope,
};
pub use error::{CodecError, HealthError, Result};
pub use router::UpdateRouter;
pub use translate::{
    connection_name, parse_connection, parse_permission, parse_permission_set, permission_name,
};
