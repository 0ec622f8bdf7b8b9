//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the storefront client and
//! the API server for the chat widget.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// One user chat turn. Sends are sequential: a client must wait for
    /// `ReplyComplete` before issuing the next one.
    Send { text: String },
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The assistant's greeting, delivered once when the socket opens.
    Welcome { message_id: Uuid, text: String },

    /// A model turn has started streaming; fragments follow.
    ReplyStarted { message_id: Uuid },

    /// One text fragment of the streaming reply, in arrival order.
    ReplyFragment { message_id: Uuid, text: String },

    /// The model turn is complete; its text will not change again.
    ReplyComplete { message_id: Uuid },

    /// Reports a protocol-level error (e.g. a malformed client message).
    Error { message: String },
}
