use super::Operation;

/// Builds the byte string both sides sign:
/// `boardId:timestamp:operation[:body]`.
///
/// The timestamp goes in exactly as it appeared on the wire, never
/// re-rendered, and the body segment is the raw request bytes. Any
/// normalization here would let a signature verify against bytes the sender
/// never saw.
pub fn canonical_message(
    board_id: &str,
    timestamp: &str,
    operation: Operation,
    body: Option<&[u8]>,
) -> Vec<u8> {
    let mut message = Vec::with_capacity(
        board_id.len()
            + timestamp.len()
            + operation.as_str().len()
            + body.map_or(0, |b| b.len() + 1)
            + 2,
    );
    message.extend_from_slice(board_id.as_bytes());
    message.push(b':');
    message.extend_from_slice(timestamp.as_bytes());
    message.push(b':');
    message.extend_from_slice(operation.as_str().as_bytes());
    if let Some(body) = body {
        message.push(b':');
        message.extend_from_slice(body);
    }
    message
}
