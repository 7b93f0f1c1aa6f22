use serde_json::Value;

use super::{HttpBody, HttpMethod, MimoClient, MimoError};
use crate::domain::{Recharge, Username, Voucher};
use crate::transport::{decode_recharge_json_response, encode_recharge_params, encode_transfer_params};

const RECHARGE_ACCEPTED: u16 = 201;

/// Account credit resource (`credit/*`).
#[derive(Debug, Clone, Copy)]
pub struct Credits<'a> {
    client: &'a MimoClient,
}

impl<'a> Credits<'a> {
    pub(crate) fn new(client: &'a MimoClient) -> Self {
        Self { client }
    }

    /// Redeem a voucher.
    ///
    /// Only `201 Created` counts as accepted; every other status is a rejection
    /// and the body is not inspected.
    pub async fn recharge(&self, voucher: &Voucher) -> Result<Recharge, MimoError> {
        let response = self
            .client
            .execute(
                HttpMethod::Get,
                "credit/recharge",
                encode_recharge_params(voucher),
                HttpBody::Empty,
            )
            .await?;

        if response.status != RECHARGE_ACCEPTED {
            tracing::debug!(status = response.status, "voucher recharge rejected");
            return Ok(Recharge::Rejected {
                status: response.status,
            });
        }

        let receipt = decode_recharge_json_response(voucher, &response.body)
            .map_err(|err| MimoError::Parse(Box::new(err)))?;
        Ok(Recharge::Accepted(receipt))
    }

    /// Current account balance, e.g. `{"balance": "0"}`.
    pub async fn view(&self) -> Result<Value, MimoError> {
        self.client.get("credit/", Vec::new()).await
    }

    /// Move `balance` credits to another MIMO user.
    pub async fn transfer(&self, username: &Username, balance: u64) -> Result<Value, MimoError> {
        self.client
            .get("credit/transfer", encode_transfer_params(username, balance))
            .await
    }
}
