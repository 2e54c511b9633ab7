/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "pyrolink.toml";

/// Runtime data directory (database file lives here).
pub const DATA_DIR: &str = "./data";

/// Required length of a public board identifier.
pub const BOARD_ID_LEN: usize = 12;

/// Header carrying the message timestamp, exactly as signed.
pub const TIMESTAMP_HEADER: &str = "X-Auth-Timestamp";

/// Header carrying the lower-case hex HMAC signature.
pub const SIGNATURE_HEADER: &str = "X-Auth-Signature";

/// Board identifiers are fixed-width ASCII digit strings burned into the
/// hardware at manufacturing time.
pub fn is_valid_board_id(value: &str) -> bool {
    value.len() == BOARD_ID_LEN && value.bytes().all(|b| b.is_ascii_digit())
}
