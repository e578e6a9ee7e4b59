use alloy_primitives::{address, b256, Address, B256};

/// Calldata gas charged for a zero byte.
pub const ZERO_BYTE_COST: u64 = 4;
/// Calldata gas charged for a non-zero byte.
pub const NON_ZERO_BYTE_COST: u64 = 16;

/// The fixed point decimal scaling factor of the Ecotone fee scalars.
///
/// Allows scalars to be specified with 6 decimal points of precision.
pub const FEE_SCALAR_DECIMAL: u64 = 1_000_000;

/// The address of the L1Block predeploy.
pub const L1_BLOCK_CONTRACT: Address = address!("0x4200000000000000000000000000000000000015");

/// Storage slot of the L1 origin base fee in the L1Block predeploy.
pub const L1_BASE_FEE_SLOT: B256 = B256::with_last_byte(1);

/// As of the ecotone upgrade, this storage slot stores the 32-bit basefeeScalar and blobBaseFeeScalar attributes at
/// offsets [BASE_FEE_SCALAR_OFFSET] and [BLOB_BASE_FEE_SCALAR_OFFSET] respectively.
pub const ECOTONE_L1_FEE_SCALARS_SLOT: B256 = B256::with_last_byte(3);

/// [ECOTONE_L1_BLOB_BASE_FEE_SLOT] was added in the Ecotone upgrade and stores the L1 blobBaseFee attribute.
pub const ECOTONE_L1_BLOB_BASE_FEE_SLOT: B256 = B256::with_last_byte(7);

/// The two 4-byte Ecotone fee scalar values are packed into the same storage slot as the 8-byte sequence number.
/// Byte offset within the storage slot of the 4-byte baseFeeScalar attribute.
pub const BASE_FEE_SCALAR_OFFSET: usize = 16;
/// The two 4-byte Ecotone fee scalar values are packed into the same storage slot as the 8-byte sequence number.
/// Byte offset within the storage slot of the 4-byte blobBaseFeeScalar attribute.
pub const BLOB_BASE_FEE_SCALAR_OFFSET: usize = 20;

/// EIP-1967 implementation slot, `bytes32(uint256(keccak256("eip1967.proxy.implementation")) - 1)`.
///
/// The OP Stack `Proxy` contract stores the address of its logic contract here.
pub const IMPLEMENTATION_SLOT: B256 =
    b256!("0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc");

/// Artifact every proxy address is verified against.
pub const PROXY_ARTIFACT: &str = "src/universal/Proxy.sol:Proxy";

/// Optimizer runs the proxy artifact was compiled with.
pub const PROXY_OPTIMIZER_RUNS: u32 = 200;

/// Reason attached to a proxy whose implementation slot holds no address.
pub const UNRESOLVED_IMPLEMENTATION: &str = "unresolved implementation";
