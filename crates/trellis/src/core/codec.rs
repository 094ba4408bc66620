//! Wire encoding. One JSON object per frame.

use crate::{error::Result, message::Message};

/// Encode a message as a frame.
pub fn encode(msg: &Message) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(msg)?)
}

/// Decode a frame into a message.
pub fn decode(frame: &[u8]) -> Result<Message> {
    Ok(serde_json::from_slice(frame)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, message::event};

    #[test]
    fn decode_frame() {
        let m = decode(br#"{"event":"remove","path":["topwidget"],"childid":"a"}"#).unwrap();
        assert_eq!(m.event, event::REMOVE);
        assert_eq!(m.require_childid().unwrap(), "a");
    }

    #[test]
    fn garbage_is_codec_error() {
        assert!(matches!(decode(b"{not json"), Err(Error::Codec(_))));
        assert!(matches!(decode(br#"{"path":[]}"#), Err(Error::Codec(_))));
    }
}
