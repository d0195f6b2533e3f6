use std::time::Duration;
use anyhow::Context;
use bytes::{Bytes, BytesMut};
use pollbox_protocol::{
    CreateRequestMessage, Frame, FrameType, GetResponseMessage, OpCode, ProtocolError,
    RequestKeyReply, RequestPayload, ResponsePayload, StatusReply,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub struct PollboxClient {
    stream: TcpStream,
    stream_id: u32,
    read_buf: BytesMut,
}

impl PollboxClient {
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .context("Failed to connect to Pollbox server")?;

        Ok(PollboxClient {
            stream,
            stream_id: 0,
            read_buf: BytesMut::with_capacity(4096),
        })
    }

    async fn send_request(&mut self, payload: RequestPayload) -> Result<(), ProtocolError> {
        self.stream_id = self.stream_id.wrapping_add(1);

        let frame = Frame::request(self.stream_id, Vec::from(payload.serialize()));

        let mut buf = BytesMut::new();
        frame.encode(&mut buf);
        self.stream
            .write_all(&buf)
            .await
            .map_err(ProtocolError::IoError)?;
        Ok(())
    }

    /// Reads until one whole frame is buffered. Error frames become
    /// `ProtocolError::Rejected`.
    async fn read_response(&mut self) -> Result<ResponsePayload, ProtocolError> {
        let frame = loop {
            if let Some(frame) = Frame::decode(&mut self.read_buf)? {
                break frame;
            }
            let n = self
                .stream
                .read_buf(&mut self.read_buf)
                .await
                .map_err(ProtocolError::IoError)?;
            if n == 0 {
                return Err(ProtocolError::IncompleteFrame);
            }
        };

        match frame.frame_type {
            FrameType::Response => ResponsePayload::deserialize(Bytes::from(frame.payload)),
            FrameType::Error => {
                let reply = StatusReply::deserialize(Bytes::from(frame.payload))?;
                Err(ProtocolError::Rejected {
                    status_code: reply.status_code,
                    message: reply.body.unwrap_or_default(),
                })
            }
            other => Err(ProtocolError::UnknownFrameType(other as u8)),
        }
    }

    /// Registers a request and returns its correlation key.
    pub async fn create_request(&mut self, method: &str, path: &str) -> Result<String, ProtocolError> {
        let req = CreateRequestMessage {
            method: method.to_string(),
            path: path.to_string(),
        };
        let payload = RequestPayload {
            op_code: OpCode::CreateRequest,
            data: req.serialize(),
        };

        self.send_request(payload).await?;
        let data = self.read_response().await?.expect_op(OpCode::CreateRequest)?;
        Ok(RequestKeyReply::deserialize(data)?.key)
    }

    /// One poll. A bodiless 204 means the backend has not answered yet.
    pub async fn get_response(&mut self, key: &str) -> Result<StatusReply, ProtocolError> {
        let req = GetResponseMessage {
            key: key.to_string(),
        };
        let payload = RequestPayload {
            op_code: OpCode::GetResponse,
            data: req.serialize(),
        };

        self.send_request(payload).await?;
        let data = self.read_response().await?.expect_op(OpCode::GetResponse)?;
        StatusReply::deserialize(data)
    }

    /// Polls every `interval` until something other than a pending 204 comes
    /// back. `None` once `max_attempts` polls have all been pending.
    pub async fn poll_response(
        &mut self,
        key: &str,
        interval: Duration,
        max_attempts: u32,
    ) -> Result<Option<StatusReply>, ProtocolError> {
        for attempt in 0..max_attempts {
            if attempt > 0 {
                tokio::time::sleep(interval).await;
            }
            let reply = self.get_response(key).await?;
            if !reply.is_pending() {
                return Ok(Some(reply));
            }
        }
        Ok(None)
    }
}
