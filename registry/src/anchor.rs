use rand::Rng;
use sha2::{Digest, Sha256};

use ayur_common::anchor::AnchorRef;

/// Stand-in for a real distributed ledger: given an action description,
/// mint an opaque reference string that the core stores verbatim.
pub trait LedgerAnchor: Send + Sync {
    fn anchor(&mut self, event: &str) -> AnchorRef;
}

/// Demo anchor: a random 32-hex-char reference with no commitment
/// properties, matching what the platform shows in its transaction log.
#[derive(Debug, Default)]
pub struct MockAnchor;

impl LedgerAnchor for MockAnchor {
    fn anchor(&mut self, _event: &str) -> AnchorRef {
        let mut rng = rand::thread_rng();
        let bytes: [u8; 16] = rng.gen();
        AnchorRef(format!("0x{}", hex::encode(bytes)))
    }
}

/// Minimal append-only commitment chain: each reference is the SHA-256 of
/// the previous reference concatenated with the event description. Gives
/// deterministic, tamper-evident references without any network.
#[derive(Debug)]
pub struct HashChainAnchor {
    head: [u8; 32],
}

impl HashChainAnchor {
    pub fn new() -> Self {
        Self { head: [0u8; 32] }
    }
}

impl Default for HashChainAnchor {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerAnchor for HashChainAnchor {
    fn anchor(&mut self, event: &str) -> AnchorRef {
        let mut hasher = Sha256::new();
        hasher.update(self.head);
        hasher.update(event.as_bytes());
        self.head = hasher.finalize().into();
        AnchorRef(format!("0x{}", hex::encode(self.head)))
    }
}
