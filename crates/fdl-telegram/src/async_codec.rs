//! `tokio_util::codec` adapter for FDL telegrams.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_telegram, encode_into, Frame};
use crate::error::TelegramError;

/// Telegram codec for `tokio_util::codec::Framed` and friends.
///
/// Any validation error ends the framed stream; wrap the transport again
/// to resume after framing loss.
#[derive(Debug, Clone, Copy, Default)]
pub struct TelegramCodec;

impl TelegramCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for TelegramCodec {
    type Item = Frame;
    type Error = TelegramError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        decode_telegram(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(TelegramError::ConnectionClosed),
        }
    }
}

impl Encoder<Frame> for TelegramCodec {
    type Error = TelegramError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_into(&item, dst);
        Ok(())
    }
}

impl<'a> Encoder<&'a Frame> for TelegramCodec {
    type Error = TelegramError;

    fn encode(&mut self, item: &'a Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_into(item, dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;

    #[test]
    fn decoder_waits_for_complete_telegram() {
        let mut codec = TelegramCodec::new();
        let mut buf = BytesMut::from(&[0x68, 5, 5, 0x68, 1, 2][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert!(matches!(
            codec.decode_eof(&mut buf),
            Err(TelegramError::ConnectionClosed)
        ));
    }

    #[test]
    fn decoder_eof_on_empty_buffer() {
        let mut codec = TelegramCodec::new();
        let mut buf = BytesMut::new();
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
    }

    #[tokio::test]
    async fn framed_roundtrip_over_duplex() {
        let (client, server) = tokio::io::duplex(1024);
        let mut sink = FramedWrite::new(client, TelegramCodec::new());
        let mut stream = FramedRead::new(server, TelegramCodec::new());

        let frames = vec![
            Frame::fixed_no_data(2, 3, 0x49),
            Frame::variable_data(1, 2, 0x40, vec![0xAA; 100]).unwrap(),
            Frame::token(3, 2),
            Frame::ShortAck,
        ];
        for frame in &frames {
            sink.send(frame).await.unwrap();
        }
        drop(sink);

        let mut received = Vec::new();
        while let Some(frame) = stream.next().await {
            received.push(frame.unwrap());
        }
        assert_eq!(received, frames);
    }

    #[tokio::test]
    async fn framed_read_reports_checksum_error() {
        let wire: &[u8] = &[0x10, 2, 3, 0x49, 0x4F, 0x16];
        let mut stream = FramedRead::new(wire, TelegramCodec::new());
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, TelegramError::ChecksumMismatch { .. }));
    }
}
