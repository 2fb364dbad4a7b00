//! Distributed message envelope.
//!
//! Every message on the coordinator/worker channel is one frame:
//! a type tag (u8), a timestamp (f64 seconds, big-endian), and a
//! length-prefixed UTF-8 payload. Payloads carry small JSON records;
//! readers tolerate missing fields by defaulting to zero/empty.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed frame header size: type (1) + timestamp (8) + payload length (4).
pub const HEADER_LEN: usize = 13;

/// Upper bound on a payload frame; anything larger is a corrupt stream.
pub const MAX_PAYLOAD_LEN: u32 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum NetError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unknown message type {0}")]
    UnknownMessageType(u8),
    #[error("payload length {0} exceeds frame limit")]
    PayloadTooLarge(u32),
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
    #[error("per-entity update failed: {0}")]
    Update(String),
}

/// Message type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    Ready = 0,
    Init = 1,
    Step = 2,
    StepComplete = 3,
    SyncRequest = 4,
    SyncResponse = 5,
    Shutdown = 6,
}

impl TryFrom<u8> for MessageType {
    type Error = NetError;

    fn try_from(value: u8) -> Result<Self, NetError> {
        match value {
            0 => Ok(Self::Ready),
            1 => Ok(Self::Init),
            2 => Ok(Self::Step),
            3 => Ok(Self::StepComplete),
            4 => Ok(Self::SyncRequest),
            5 => Ok(Self::SyncResponse),
            6 => Ok(Self::Shutdown),
            other => Err(NetError::UnknownMessageType(other)),
        }
    }
}

/// One framed message.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub msg_type: MessageType,
    pub payload: String,
    /// Seconds of simulated time at send.
    pub timestamp: f64,
}

impl Envelope {
    pub fn new(msg_type: MessageType, payload: impl Into<String>, timestamp: f64) -> Self {
        Self {
            msg_type,
            payload: payload.into(),
            timestamp,
        }
    }

    /// Append the frame to a buffer.
    pub fn serialize(&self, buf: &mut BytesMut) {
        buf.reserve(HEADER_LEN + self.payload.len());
        buf.put_u8(self.msg_type as u8);
        buf.put_f64(self.timestamp);
        buf.put_u32(self.payload.len() as u32);
        buf.put_slice(self.payload.as_bytes());
    }

    /// Decode one frame from a buffer holding at least a whole frame.
    pub fn deserialize(buf: &mut impl Buf) -> Result<Self, NetError> {
        if buf.remaining() < HEADER_LEN {
            return Err(NetError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "truncated envelope header",
            )));
        }
        let msg_type = MessageType::try_from(buf.get_u8())?;
        let timestamp = buf.get_f64();
        let len = buf.get_u32();
        if len > MAX_PAYLOAD_LEN {
            return Err(NetError::PayloadTooLarge(len));
        }
        if buf.remaining() < len as usize {
            return Err(NetError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "truncated envelope payload",
            )));
        }
        let mut payload = vec![0u8; len as usize];
        buf.copy_to_slice(&mut payload);
        let payload = String::from_utf8(payload).map_err(|_| NetError::InvalidUtf8)?;
        Ok(Self {
            msg_type,
            payload,
            timestamp,
        })
    }

    /// Write the frame to a byte stream.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), NetError> {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.payload.len());
        self.serialize(&mut buf);
        writer.write_all(&buf)?;
        writer.flush()?;
        Ok(())
    }

    /// Read one frame from a byte stream (blocking).
    pub fn read_from(reader: &mut impl Read) -> Result<Self, NetError> {
        let mut header = [0u8; HEADER_LEN];
        reader.read_exact(&mut header)?;
        let mut cursor = &header[..];
        let msg_type = MessageType::try_from(cursor.get_u8())?;
        let timestamp = cursor.get_f64();
        let len = cursor.get_u32();
        if len > MAX_PAYLOAD_LEN {
            return Err(NetError::PayloadTooLarge(len));
        }
        let mut payload = vec![0u8; len as usize];
        reader.read_exact(&mut payload)?;
        let payload = String::from_utf8(payload).map_err(|_| NetError::InvalidUtf8)?;
        Ok(Self {
            msg_type,
            payload,
            timestamp,
        })
    }
}

// ── Payload records ───────────────────────────────────────────────────

/// INIT: the worker's assigned entity id subset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InitPayload {
    pub entities: Vec<String>,
}

/// STEP: advance the assigned subset by dt from the given time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepPayload {
    pub dt: f64,
    pub time: f64,
}

/// One entity's state in a SYNC_RESPONSE.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncEntry {
    pub id: String,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub time: f64,
}

/// SYNC_RESPONSE: the worker's full local state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncPayload {
    pub entities: Vec<SyncEntry>,
}

/// Fail-safe payload parse: malformed or missing fields default to
/// zero/empty rather than tearing the channel down.
pub fn parse_payload<T: Default + DeserializeOwned>(payload: &str) -> T {
    serde_json::from_str(payload).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_round_trip() {
        let env = Envelope::new(MessageType::Step, r#"{"dt":0.1,"time":42.0}"#, 42.0);
        let mut buf = BytesMut::new();
        env.serialize(&mut buf);
        let decoded = Envelope::deserialize(&mut buf.freeze()).unwrap();
        assert_eq!(decoded, env);
    }

    #[test]
    fn empty_payload_round_trip() {
        let env = Envelope::new(MessageType::Ready, "", 0.0);
        let mut buf = BytesMut::new();
        env.serialize(&mut buf);
        assert_eq!(buf.len(), HEADER_LEN);
        let decoded = Envelope::deserialize(&mut buf.freeze()).unwrap();
        assert_eq!(decoded, env);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u8(99);
        buf.put_f64(0.0);
        buf.put_u32(0);
        assert!(matches!(
            Envelope::deserialize(&mut buf.freeze()),
            Err(NetError::UnknownMessageType(99))
        ));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u8(2);
        buf.put_f64(0.0);
        buf.put_u32(MAX_PAYLOAD_LEN + 1);
        assert!(matches!(
            Envelope::deserialize(&mut buf.freeze()),
            Err(NetError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn stream_round_trip() {
        let env = Envelope::new(MessageType::Init, r#"{"entities":["a","b"]}"#, 1.5);
        let mut wire = Vec::new();
        env.write_to(&mut wire).unwrap();
        let decoded = Envelope::read_from(&mut wire.as_slice()).unwrap();
        assert_eq!(decoded, env);
    }

    #[test]
    fn missing_payload_fields_default() {
        let step: StepPayload = parse_payload(r#"{"dt": 0.5}"#);
        assert_eq!(step.dt, 0.5);
        assert_eq!(step.time, 0.0);

        let init: InitPayload = parse_payload("{}");
        assert!(init.entities.is_empty());

        let garbage: SyncPayload = parse_payload("not json at all");
        assert!(garbage.entities.is_empty());
    }
}
