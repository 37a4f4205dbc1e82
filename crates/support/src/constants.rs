pub const THIS_IS_A_BUG: &str =
    "- this is a bug please report it: https://github.com/paritytech/coretime-bootstrap/issues";

/// Default websocket endpoint of the relay chain node.
pub const DEFAULT_RELAY_WS: &str = "ws://127.0.0.1:9900";
/// Default websocket endpoint of the coretime chain node.
pub const DEFAULT_CORETIME_WS: &str = "ws://127.0.0.1:9910";
/// Default websocket endpoint of the collator node.
pub const DEFAULT_COLLATOR_WS: &str = "ws://127.0.0.1:9920";

/// Secret uri used to derive the privileged signer.
pub const DEFAULT_SUDO_URI: &str = "//Alice";

/// environment variable which can be used to override the finalization timeout
pub const CORETIME_FINALIZATION_TIMEOUT_SECONDS: &str = "CORETIME_FINALIZATION_TIMEOUT_SECONDS";
