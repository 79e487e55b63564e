//! RESP2 framing on top of `redis_protocol`.
//!
//! Requests are always sent as arrays of bulk strings. Replies are mapped
//! from the decoder's frames onto [`Reply`], which owns its data.

use bytes::{Bytes, BytesMut};
use redis_protocol::resp2::{
    decode::{decode, decode_mut},
    encode::encode_bytes,
    types::Frame,
};

use crate::{command::ProtocolCommand, error::RespError};

pub const MAX_FRAME_LEN: usize = 512 * 1024 * 1024;
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Vec<u8>),
    Array(Vec<Reply>),
    /// Null bulk string or null array.
    Nil,
}

impl Reply {
    /// Decodes one reply from the front of `buf` without consuming it.
    ///
    /// Returns the reply together with the number of bytes it occupied, or
    /// `None` while the frame is incomplete.
    pub fn parse(buf: &[u8]) -> Result<Option<(Reply, usize)>, RespError> {
        let bytes = Bytes::copy_from_slice(buf);

        match decode(&bytes).map_err(|e| RespError::Decode(e.to_string()))? {
            Some((frame, consumed)) => Ok(Some((Reply::from_frame(frame, 0)?, consumed))),
            None => incomplete(buf.len()),
        }
    }

    /// Splits one complete reply off the front of `buf`.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Reply>, RespError> {
        match decode_mut(buf).map_err(|e| RespError::Decode(e.to_string()))? {
            Some((frame, _, _)) => Reply::from_frame(frame, 0).map(Some),
            None => incomplete(buf.len()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Simple(_) => "simple string",
            Reply::Error(_) => "error",
            Reply::Integer(_) => "integer",
            Reply::Bulk(_) => "bulk string",
            Reply::Array(_) => "array",
            Reply::Nil => "nil",
        }
    }

    pub fn into_integer(self) -> Result<i64, RespError> {
        match self {
            Reply::Integer(value) => Ok(value),
            other => Err(RespError::UnexpectedReply {
                expected: "integer",
                actual: other.kind(),
            }),
        }
    }

    fn from_frame(frame: Frame, depth: usize) -> Result<Reply, RespError> {
        if depth > MAX_DEPTH {
            return Err(RespError::TooDeep);
        }

        let reply = match frame {
            Frame::SimpleString(status) => {
                Reply::Simple(String::from_utf8_lossy(&status).into_owned())
            }
            Frame::Error(message) => Reply::Error(message.to_string()),
            Frame::Integer(value) => Reply::Integer(value),
            Frame::BulkString(data) => Reply::Bulk(data.to_vec()),
            Frame::Array(items) => Reply::Array(
                items
                    .into_iter()
                    .map(|item| Reply::from_frame(item, depth + 1))
                    .collect::<Result<_, _>>()?,
            ),
            Frame::Null => Reply::Nil,
        };

        Ok(reply)
    }
}

fn incomplete<T>(buffered: usize) -> Result<Option<T>, RespError> {
    if buffered > MAX_FRAME_LEN {
        return Err(RespError::TooLarge(buffered));
    }

    Ok(None)
}

pub fn encode_request(
    command: &dyn ProtocolCommand,
    args: &[&[u8]],
) -> Result<BytesMut, RespError> {
    let frame = Frame::Array(
        std::iter::once(command.raw())
            .chain(args.iter().copied())
            .map(|token| Frame::BulkString(Bytes::copy_from_slice(token)))
            .collect(),
    );

    let mut buf = BytesMut::new();
    encode_bytes(&mut buf, &frame).map_err(|e| RespError::Encode(e.to_string()))?;

    Ok(buf)
}
