//! # DynamicMessage Codec
//!
//! This module implements `tonic::codec::Codec` so that `tonic` can transport
//! `prost_reflect::DynamicMessage`s directly, without generated Rust structs.
//!
//! 1. **Encoder**: writes the message's Protobuf encoding into the gRPC frame. A dynamic
//!    message already knows its own descriptor, so the encoder needs none.
//! 2. **Decoder**: merges the frame bytes into a fresh `DynamicMessage` of the descriptor the
//!    codec was built with.
use prost::Message;
use prost_reflect::{DynamicMessage, MessageDescriptor};
use tonic::{
    Status,
    codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder},
};

/// A Codec that sends any `DynamicMessage` and decodes incoming messages with a fixed descriptor.
///
/// On the client side the descriptor is the method's output type. On the server side
/// (used by tests) it is the method's input type.
#[derive(Debug, Clone)]
pub struct DynamicCodec {
    decode_desc: MessageDescriptor,
}

impl DynamicCodec {
    /// Creates a new `DynamicCodec` decoding messages of type `decode_desc`.
    pub fn new(decode_desc: MessageDescriptor) -> Self {
        Self { decode_desc }
    }
}

impl Codec for DynamicCodec {
    type Encode = DynamicMessage;
    type Decode = DynamicMessage;

    type Encoder = DynamicEncoder;
    type Decoder = DynamicDecoder;

    fn encoder(&mut self) -> Self::Encoder {
        DynamicEncoder
    }

    fn decoder(&mut self) -> Self::Decoder {
        DynamicDecoder(self.decode_desc.clone())
    }
}

/// Encodes a `DynamicMessage` into Protobuf bytes.
#[derive(Debug)]
pub struct DynamicEncoder;

impl Encoder for DynamicEncoder {
    type Item = DynamicMessage;
    type Error = Status;

    fn encode(&mut self, item: Self::Item, dst: &mut EncodeBuf<'_>) -> Result<(), Self::Error> {
        item.encode_raw(dst);
        Ok(())
    }
}

/// Decodes Protobuf bytes into a `DynamicMessage`.
#[derive(Debug)]
pub struct DynamicDecoder(MessageDescriptor);

impl Decoder for DynamicDecoder {
    type Item = DynamicMessage;
    type Error = Status;

    fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Self::Item>, Self::Error> {
        let mut msg = DynamicMessage::new(self.0.clone());
        msg.merge(src)
            .map_err(|e| Status::internal(format!("Failed to decode Protobuf bytes: {}", e)))?;

        Ok(Some(msg))
    }
}
