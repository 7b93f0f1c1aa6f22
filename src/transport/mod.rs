//! Transport layer: URL building and wire-format details (encoding/decoding).

mod credit;
mod endpoint;
mod message;
mod number;
mod price;
mod sender;

pub use credit::{decode_recharge_json_response, encode_recharge_params, encode_transfer_params};
pub use endpoint::{join_values, make_url};
pub use message::{decode_send_receipt, encode_by_date_params, encode_send_payload};
pub use sender::{decode_sender_list, encode_new_sender_payload};
