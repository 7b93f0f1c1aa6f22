use serde::Deserialize;
use serde::de::Error as DeError;
use serde_json::value::RawValue;

/// Voucher price, sent by MIMO as a JSON string or a JSON number.
///
/// Numbers keep their literal token, so `1500.00` stays `"1500.00"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPrice(String);

impl TransportPrice {
    pub fn into_string(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for TransportPrice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let literal = raw.get();

        if literal.starts_with('"') {
            let text: String = serde_json::from_str(literal).map_err(D::Error::custom)?;
            return Ok(Self(text.trim().to_owned()));
        }
        if literal.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
            return Ok(Self(literal.to_owned()));
        }
        Err(D::Error::custom(format_args!(
            "price must be a string or a number, got {literal}"
        )))
    }
}
