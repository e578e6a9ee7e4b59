use super::RpcArgs;
use chain::{fetch_fee_parameters, ChainClient, ChainClientError, RpcChainClient};
use clap::{Args, Parser};
use codec::{encode_draft, EncodingError, TxDraft};
use fee::{
    params::parse_field, FeeError, FeeEstimator, FeeParameters, FilePrice, FixedPrice,
    ParameterError, PriceSource,
};
use primitives::{utils::parse_ether, Address, U256};
use std::path::PathBuf;
use tracing::{info, warn};

/// `estimate` failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transaction could not be encoded.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// A fee parameter flag was rejected.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    /// The fee could not be computed.
    #[error(transparent)]
    Fee(#[from] FeeError),
    /// A node request failed.
    #[error(transparent)]
    Chain(#[from] ChainClientError),
    /// A required input was neither given nor fetchable.
    #[error("missing {what}: {hint}")]
    Missing {
        /// The missing flag.
        what: &'static str,
        /// How to provide it.
        hint: &'static str,
    },
}

/// Ecotone fee parameter flags.
///
/// Parameters that are not given keep their reference value.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeArgs {
    /// Read the fee parameters from the L1Block predeploy
    #[arg(
        long,
        conflicts_with_all = [
            "l1_base_fee",
            "blob_base_fee",
            "base_fee_scalar",
            "blob_base_fee_scalar",
        ]
    )]
    pub live_params: bool,
    /// L1 base fee in wei
    #[arg(long, allow_hyphen_values = true)]
    pub l1_base_fee: Option<String>,
    /// L1 blob base fee in wei
    #[arg(long, allow_hyphen_values = true)]
    pub blob_base_fee: Option<String>,
    /// Base fee scalar
    #[arg(long, allow_hyphen_values = true)]
    pub base_fee_scalar: Option<String>,
    /// Blob base fee scalar
    #[arg(long, allow_hyphen_values = true)]
    pub blob_base_fee_scalar: Option<String>,
}

impl FeeArgs {
    /// Fee parameters given on the command line.
    pub fn parameters(&self) -> Result<FeeParameters, ParameterError> {
        let reference = FeeParameters::REFERENCE;
        let field = |name, input: &Option<String>, fallback| {
            input
                .as_deref()
                .map_or(Ok(fallback), |input| parse_field(name, input))
        };
        Ok(FeeParameters::new(
            field("l1_base_fee", &self.l1_base_fee, reference.l1_base_fee)?,
            field(
                "blob_base_fee",
                &self.blob_base_fee,
                reference.blob_base_fee,
            )?,
            field(
                "base_fee_scalar",
                &self.base_fee_scalar,
                reference.base_fee_scalar,
            )?,
            field(
                "blob_base_fee_scalar",
                &self.blob_base_fee_scalar,
                reference.blob_base_fee_scalar,
            )?,
        ))
    }
}

/// `estimate` subcommand
///
/// Nonce, gas price and chain id are fetched from the node when not given.
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Node connection.
    #[command(flatten)]
    pub rpc: RpcArgs,
    /// Sender whose nonce is fetched when `--nonce` is not given
    #[arg(long)]
    from: Option<Address>,
    /// Sender nonce
    #[arg(long)]
    nonce: Option<u64>,
    /// Gas price in wei
    #[arg(long)]
    gas_price: Option<U256>,
    /// Gas limit
    #[arg(long, default_value_t = 21_000)]
    gas_limit: u64,
    /// Recipient address, omit to create a contract
    #[arg(long)]
    to: Option<String>,
    /// Value in ether
    #[arg(long, default_value = "0", value_parser = parse_ether)]
    value: U256,
    /// Hex-encoded calldata
    #[arg(long, default_value = "0x")]
    data: String,
    /// EIP-155 chain id
    #[arg(long)]
    chain_id: Option<u64>,
    #[command(flatten)]
    fees: FeeArgs,
    /// Fiat price of one ETH, 3800 if neither this nor `--price-file` is given
    #[arg(long, conflicts_with = "price_file")]
    eth_price: Option<f64>,
    /// File holding the fiat price of one ETH, read when the fee is computed
    #[arg(long)]
    price_file: Option<PathBuf>,
    /// Address of a deployed `getL1FeeEcotone` calculator to cross-check the fee with
    #[arg(long)]
    oracle: Option<Address>,
}

impl Cmd {
    /// Runs `estimate` command.
    pub async fn run(&self) -> Result<(), Error> {
        let client = self.rpc.connect().await?;
        let encoded = encode_draft(self.draft(client.as_ref()).await?)?;

        let params = if self.fees.live_params {
            let client = client.as_ref().ok_or(Error::Missing {
                what: "--rpc-url",
                hint: "--live-params reads the L1Block predeploy",
            })?;
            fetch_fee_parameters(client).await?
        } else {
            self.fees.parameters()?
        };
        info!(%params, "fee parameters");

        let estimator = FeeEstimator::new(self.price_source());
        let estimate = estimator.estimate(&encoded, &params)?;
        println!("Serialized transaction: {encoded}");
        println!("Compressed size: {}", estimate.compressed_size);
        println!("L1 fee in wei: {}", estimate.fee_wei);
        println!("L1 fee in ETH: {}", estimate.fee_native);
        println!(
            "L1 fee in fiat: {} (at {} per ETH)",
            estimate.fee_fiat, estimate.spot_price
        );

        if let Some(oracle) = self.oracle {
            let client = client.as_ref().ok_or(Error::Missing {
                what: "--rpc-url",
                hint: "--oracle calls the calculator contract",
            })?;
            let oracle_fee = client.oracle_l1_fee(oracle, &encoded, &params).await?;
            println!("Oracle L1 fee in wei: {oracle_fee}");
            if oracle_fee != estimate.fee_wei {
                warn!(
                    local = %estimate.fee_wei,
                    oracle = %oracle_fee,
                    "oracle fee differs from local fee"
                );
            }
        }
        Ok(())
    }

    /// The transaction to estimate, with missing fields fetched through `client`.
    async fn draft(&self, client: Option<&RpcChainClient>) -> Result<TxDraft, Error> {
        const NEED_RPC: &str = "pass it explicitly or set --rpc-url";
        let missing = |what| Error::Missing {
            what,
            hint: NEED_RPC,
        };

        let nonce = match (self.nonce, client, self.from) {
            (Some(nonce), _, _) => nonce,
            (None, Some(client), Some(from)) => client.get_nonce(from).await?,
            _ => {
                return Err(Error::Missing {
                    what: "--nonce",
                    hint: "pass it explicitly or set --from and --rpc-url",
                })
            }
        };
        let gas_price = match (self.gas_price, client) {
            (Some(gas_price), _) => gas_price,
            (None, Some(client)) => U256::from(client.get_gas_price().await?),
            (None, None) => return Err(missing("--gas-price")),
        };
        let chain_id = match (self.chain_id, client) {
            (Some(chain_id), _) => chain_id,
            (None, Some(client)) => client.get_chain_id().await?,
            (None, None) => return Err(missing("--chain-id")),
        };

        Ok(TxDraft {
            nonce,
            gas_price,
            gas_limit: self.gas_limit,
            to: self.to.clone(),
            value: self.value,
            data: self.data.clone(),
            chain_id,
        })
    }

    fn price_source(&self) -> Box<dyn PriceSource> {
        match (&self.price_file, self.eth_price) {
            (Some(path), _) => Box::new(FilePrice::new(path)),
            (None, Some(price)) => Box::new(FixedPrice::new(price)),
            (None, None) => Box::new(FixedPrice::default()),
        }
    }
}
