use crate::{error::EncodingError, transaction::TransactionRequest};
use primitives::{hex, Address, Bytes, TxKind, U256};

/// A transaction whose recipient and calldata are still in textual form.
///
/// This is how transactions arrive from the command line or a config file.
/// Converting into a [`TransactionRequest`] validates both fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxDraft {
    /// Sender nonce.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: U256,
    /// Gas limit.
    pub gas_limit: u64,
    /// Hex recipient. `None` or an empty string creates a contract.
    pub to: Option<String>,
    /// Value in wei.
    pub value: U256,
    /// Hex calldata, with or without `0x`.
    pub data: String,
    /// EIP-155 chain id.
    pub chain_id: u64,
}

impl TryFrom<TxDraft> for TransactionRequest {
    type Error = EncodingError;

    fn try_from(draft: TxDraft) -> Result<Self, Self::Error> {
        Ok(TransactionRequest {
            nonce: draft.nonce,
            gas_price: draft.gas_price,
            gas_limit: draft.gas_limit,
            to: parse_recipient(draft.to.as_deref())?,
            value: draft.value,
            data: parse_data(&draft.data)?,
            chain_id: draft.chain_id,
        })
    }
}

/// Parses a hex recipient. A missing or blank recipient is a contract creation.
pub fn parse_recipient(to: Option<&str>) -> Result<TxKind, EncodingError> {
    match to.map(str::trim) {
        None | Some("") => Ok(TxKind::Create),
        Some(input) => input
            .parse::<Address>()
            .map(TxKind::Call)
            .map_err(|source| EncodingError::InvalidAddress {
                input: input.to_string(),
                source,
            }),
    }
}

/// Parses hex calldata. `""` and `"0x"` are empty calldata.
pub fn parse_data(data: &str) -> Result<Bytes, EncodingError> {
    hex::decode(data.trim())
        .map(Bytes::from)
        .map_err(EncodingError::InvalidData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::address;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("  "))]
    fn blank_recipient_is_create(#[case] to: Option<&str>) {
        assert_eq!(parse_recipient(to), Ok(TxKind::Create));
    }

    #[test]
    fn recipient_with_and_without_prefix() {
        let expected = TxKind::Call(address!("0x000000000000000000000000000000000000dead"));
        assert_eq!(
            parse_recipient(Some("0x000000000000000000000000000000000000dEaD")),
            Ok(expected)
        );
        assert_eq!(
            parse_recipient(Some("000000000000000000000000000000000000dead")),
            Ok(expected)
        );
    }

    #[rstest]
    #[case("0xdead")]
    #[case("0x000000000000000000000000000000000000dead00")]
    #[case("0xzz0000000000000000000000000000000000dead")]
    fn malformed_recipient(#[case] to: &str) {
        assert!(matches!(
            parse_recipient(Some(to)),
            Err(EncodingError::InvalidAddress { .. })
        ));
    }

    #[rstest]
    #[case("", &[])]
    #[case("0x", &[])]
    #[case("0x00ff", &[0x00, 0xff])]
    #[case("38ED1739", &[0x38, 0xed, 0x17, 0x39])]
    fn calldata(#[case] data: &str, #[case] expected: &[u8]) {
        assert_eq!(parse_data(data).unwrap().as_ref(), expected);
    }

    #[rstest]
    #[case("0x123")]
    #[case("0xgg")]
    fn malformed_calldata(#[case] data: &str) {
        assert!(matches!(parse_data(data), Err(EncodingError::InvalidData(_))));
    }

    #[test]
    fn draft_conversion_reports_first_bad_field() {
        let draft = TxDraft {
            to: Some("0x1234".into()),
            data: "0x1".into(),
            ..Default::default()
        };
        let err = TransactionRequest::try_from(draft).unwrap_err();
        assert!(matches!(err, EncodingError::InvalidAddress { .. }));
    }
}
