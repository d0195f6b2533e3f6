use anyhow::{Context, Result};
use bytes::{Bytes, BytesMut};
use pollbox_protocol::{
    CreateRequestMessage, Frame, FrameType, GetResponseMessage, OpCode, ProtocolError,
    RequestKeyReply, RequestPayload, ResponsePayload, StatusReply, STATUS_BAD_REQUEST,
    STATUS_INTERNAL_ERROR,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch::Receiver;
use tracing::{debug, error, info, warn};
use crate::core::broker::BrokerReply;
use crate::core::key::{RequestIdentity, RequestKey};
use crate::types::SharedBroker;

pub async fn start(port: u16, broker: SharedBroker, shutdown_rx: Receiver<()>) -> Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .context("Failed to bind TCP listener")?;
    info!(%addr, "server initiated");
    serve(listener, broker, shutdown_rx).await
}

/// Accepts connections until the shutdown channel fires.
pub async fn serve(
    listener: TcpListener,
    broker: SharedBroker,
    mut shutdown_rx: Receiver<()>,
) -> Result<()> {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted?;
                let broker = broker.clone();
                debug!(%peer, "new incoming connection");
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(socket, broker).await {
                        warn!(%peer, "Connection error: {:?}", e);
                    }
                });
            }
            _ = shutdown_rx.changed() => {
                info!("Shutdown signal received. Listener stopping.");
                return Ok(());
            }
        }
    }
}

async fn handle_connection(mut stream: TcpStream, broker: SharedBroker) -> Result<()> {
    let mut buf = BytesMut::with_capacity(4096);

    loop {
        let n = stream
            .read_buf(&mut buf)
            .await
            .map_err(ProtocolError::IoError)?;
        if n == 0 {
            return Ok(());
        }

        while let Some(frame) = Frame::decode(&mut buf)? {
            if frame.frame_type != FrameType::Request {
                debug!(frame_type = ?frame.frame_type, "ignoring non-request frame");
                continue;
            }

            let reply = match handle_frame(Bytes::from(frame.payload), &broker).await {
                Ok(payload) => Frame::response(frame.stream_id, Vec::from(payload.serialize())),
                Err(failure) => Frame {
                    version: frame.version,
                    frame_type: FrameType::Error,
                    stream_id: frame.stream_id,
                    payload: Vec::from(failure.serialize()),
                },
            };

            let mut out = BytesMut::new();
            reply.encode(&mut out);
            stream.write_all(&out).await?;
            stream.flush().await?;
        }
    }
}

/// `Err` carries the body of an error frame.
async fn handle_frame(payload: Bytes, broker: &SharedBroker) -> Result<ResponsePayload, StatusReply> {
    let request = RequestPayload::deserialize(payload).map_err(rejected)?;
    match request.op_code {
        OpCode::CreateRequest => handle_create_request(request.data, broker).await,
        OpCode::GetResponse => handle_get_response(request.data, broker).await,
    }
}

fn rejected(e: ProtocolError) -> StatusReply {
    debug!("rejecting undecodable request: {}", e);
    StatusReply::with_body(STATUS_BAD_REQUEST, e.to_string())
}

async fn handle_create_request(
    data: Bytes,
    broker: &SharedBroker,
) -> Result<ResponsePayload, StatusReply> {
    let req = CreateRequestMessage::deserialize(data).map_err(rejected)?;
    let identity = RequestIdentity::new(req.method, req.path);

    let broker = broker.clone();
    let created = tokio::task::spawn_blocking(move || broker.create_request(&identity)).await;

    let key = match created {
        Ok(Ok(key)) => key,
        Ok(Err(e)) => {
            error!("create_request failed: {}", e);
            return Err(StatusReply::with_body(STATUS_INTERNAL_ERROR, "failed to record request"));
        }
        Err(e) => {
            error!("create_request task failed: {}", e);
            return Err(StatusReply::with_body(STATUS_INTERNAL_ERROR, "failed to record request"));
        }
    };

    let reply = RequestKeyReply { key: key.to_string() };
    Ok(ResponsePayload {
        op_code: OpCode::CreateRequest,
        data: reply.serialize(),
    })
}

async fn handle_get_response(
    data: Bytes,
    broker: &SharedBroker,
) -> Result<ResponsePayload, StatusReply> {
    let req = GetResponseMessage::deserialize(data).map_err(rejected)?;

    let status = match RequestKey::parse(&req.key) {
        Err(e) => {
            debug!(key = %req.key, "rejecting poll: {}", e);
            StatusReply::with_body(STATUS_BAD_REQUEST, e.to_string())
        }
        Ok(key) => {
            let broker = broker.clone();
            match tokio::task::spawn_blocking(move || broker.get_response(&key)).await {
                Ok(Ok(reply)) => to_status_reply(reply),
                Ok(Err(e)) => {
                    error!(key = %req.key, "get_response failed: {}", e);
                    StatusReply::status_only(STATUS_INTERNAL_ERROR)
                }
                Err(e) => {
                    error!(key = %req.key, "get_response task failed: {}", e);
                    StatusReply::status_only(STATUS_INTERNAL_ERROR)
                }
            }
        }
    };

    Ok(ResponsePayload {
        op_code: OpCode::GetResponse,
        data: status.serialize(),
    })
}

fn to_status_reply(reply: BrokerReply) -> StatusReply {
    let Ok(status_code) = u16::try_from(reply.status_code()) else {
        warn!(status_code = reply.status_code(), "backend status code out of range");
        return StatusReply::status_only(STATUS_INTERNAL_ERROR);
    };
    match reply {
        BrokerReply::Content { body, .. } => StatusReply::with_body(status_code, body),
        BrokerReply::Status { .. } => StatusReply::status_only(status_code),
    }
}
