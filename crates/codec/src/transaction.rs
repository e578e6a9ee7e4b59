use crate::{draft::TxDraft, error::EncodingError};
use alloy_rlp::{BufMut, Encodable, Header};
use primitives::{Bytes, TxKind, U256};

/// A fully specified legacy transaction.
///
/// All fields are required. [`TxKind::Create`] stands in for an absent recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Sender nonce.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: U256,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient, or contract creation.
    pub to: TxKind,
    /// Value in wei.
    pub value: U256,
    /// Calldata.
    pub data: Bytes,
    /// EIP-155 chain id.
    pub chain_id: u64,
}

impl TransactionRequest {
    /// Length of the RLP list payload, without the list header.
    fn payload_length(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.data.length()
            + self.eip155_fields_length()
    }

    /// Length of the trailing `chainId, 0, 0` fields.
    ///
    /// A zero chain id leaves them out, which yields the pre-EIP-155 payload.
    fn eip155_fields_length(&self) -> usize {
        if self.chain_id == 0 {
            0
        } else {
            self.chain_id.length() + 2 * 0u8.length()
        }
    }
}

impl Encodable for TransactionRequest {
    fn encode(&self, out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.data.encode(out);
        if self.chain_id != 0 {
            self.chain_id.encode(out);
            // Empty `r` and `s` placeholders.
            0u8.encode(out);
            0u8.encode(out);
        }
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        payload_length + alloy_rlp::length_of_length(payload_length)
    }
}

/// Encodes `tx` into its canonical byte form.
///
/// Pure: identical input always yields identical bytes.
pub fn encode(tx: &TransactionRequest) -> Bytes {
    let mut out = Vec::with_capacity(tx.length());
    tx.encode(&mut out);
    out.into()
}

/// Validates a [`TxDraft`] and encodes it.
pub fn encode_draft(draft: TxDraft) -> Result<Bytes, EncodingError> {
    TransactionRequest::try_from(draft).map(|tx| encode(&tx))
}
