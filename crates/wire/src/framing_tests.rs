// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Cursor;

#[tokio::test]
async fn write_then_read_round_trips() {
    let mut buf = Vec::new();
    write_message(&mut buf, &serde_json::json!({"hello": "world"})).await.unwrap();

    let mut cursor = Cursor::new(buf);
    let value: serde_json::Value = read_message(&mut cursor).await.unwrap();
    assert_eq!(value["hello"], "world");
}

#[tokio::test]
async fn read_on_empty_stream_is_closed() {
    let mut cursor = Cursor::new(Vec::<u8>::new());
    let result: Result<serde_json::Value, ProtocolError> = read_message(&mut cursor).await;
    assert!(matches!(result, Err(ProtocolError::Closed)));
}

#[tokio::test]
async fn oversized_length_prefix_is_rejected() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&(MAX_FRAME_BYTES + 1).to_be_bytes());
    let mut cursor = Cursor::new(buf);
    let result: Result<serde_json::Value, ProtocolError> = read_message(&mut cursor).await;
    assert!(matches!(result, Err(ProtocolError::FrameTooLarge(_))));
}
