//! Broker side of an MQTT 3.1.1 session, just enough to drive the client
//! through CONNECT, SUBSCRIBE, PUBLISH and DISCONNECT over a real socket.

#![allow(dead_code)] // Each test binary uses a different subset of helpers.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const CONNECT: u8 = 0x10;
pub const CONNACK: u8 = 0x20;
pub const PUBLISH_QOS0: u8 = 0x30;
pub const SUBSCRIBE: u8 = 0x82;
pub const SUBACK: u8 = 0x90;
pub const DISCONNECT: u8 = 0xe0;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Listen on a free local port
pub async fn listen() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake broker");
    let port = listener.local_addr().expect("local addr").port();
    (listener, port)
}

/// One accepted client connection
pub struct BrokerSide {
    stream: TcpStream,
}

impl BrokerSide {
    pub async fn accept(listener: &TcpListener) -> Self {
        let (stream, _) = tokio::time::timeout(IO_TIMEOUT, listener.accept())
            .await
            .expect("client should connect")
            .expect("accept");
        Self { stream }
    }

    /// Read one control packet: fixed header byte and body
    pub async fn read_packet(&mut self) -> (u8, Vec<u8>) {
        tokio::time::timeout(IO_TIMEOUT, async {
            let header = self.stream.read_u8().await.expect("packet header");

            let mut remaining = 0usize;
            let mut shift = 0;
            loop {
                let byte = self.stream.read_u8().await.expect("remaining length");
                remaining |= ((byte & 0x7f) as usize) << shift;
                if byte & 0x80 == 0 {
                    break;
                }
                shift += 7;
            }

            let mut body = vec![0u8; remaining];
            self.stream.read_exact(&mut body).await.expect("packet body");
            (header, body)
        })
        .await
        .expect("client should send a packet")
    }

    pub async fn expect_connect(&mut self) {
        let (header, _) = self.read_packet().await;
        assert_eq!(header, CONNECT, "first packet must be CONNECT");
    }

    /// CONNACK with the given return code, no session present
    pub async fn connack(&mut self, code: u8) {
        self.write(&[CONNACK, 0x02, 0x00, code]).await;
    }

    /// Grant QoS 0 for the SUBSCRIBE whose body is given
    pub async fn suback(&mut self, subscribe_body: &[u8]) {
        self.write(&[SUBACK, 0x03, subscribe_body[0], subscribe_body[1], 0x00]).await;
    }

    /// QoS 0 PUBLISH to the client
    pub async fn publish(&mut self, topic: &str, payload: &[u8]) {
        let mut packet = vec![PUBLISH_QOS0];
        encode_remaining_length(&mut packet, 2 + topic.len() + payload.len());
        packet.extend_from_slice(&(topic.len() as u16).to_be_bytes());
        packet.extend_from_slice(topic.as_bytes());
        packet.extend_from_slice(payload);
        self.write(&packet).await;
    }

    async fn write(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.expect("write to client");
    }
}

/// Topic filter of a single-topic SUBSCRIBE body
pub fn subscribe_topic(body: &[u8]) -> &str {
    let len = u16::from_be_bytes([body[2], body[3]]) as usize;
    std::str::from_utf8(&body[4..4 + len]).expect("utf-8 topic filter")
}

/// Topic and payload of a QoS 0 PUBLISH body
pub fn split_publish(body: &[u8]) -> (&str, &[u8]) {
    let len = u16::from_be_bytes([body[0], body[1]]) as usize;
    let topic = std::str::from_utf8(&body[2..2 + len]).expect("utf-8 topic");
    (topic, &body[2 + len..])
}

fn encode_remaining_length(packet: &mut Vec<u8>, mut len: usize) {
    loop {
        let mut byte = (len % 128) as u8;
        len /= 128;
        if len > 0 {
            byte |= 0x80;
        }
        packet.push(byte);
        if len == 0 {
            break;
        }
    }
}
