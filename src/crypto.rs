//! Per-darknode encryption of shares
//!
//! Each share is sent as `index ‖ value`, both fixed-width big-endian, and
//! encrypted with RSA-OAEP/SHA-1 under the recipient's public key. Darknodes
//! decrypt with that exact padding, so it is not configurable.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::{CryptoRng, Rng};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, RsaPublicKey};
use sha1::Sha1;
use zeroize::Zeroizing;

use crate::error::{FragmentError, Result};

/// Width in bytes of the serialized share index and share value
pub const SHARE_BYTE_WIDTH: usize = 8;

/// Length of the public exponent prefix in a darknode key
const EXPONENT_LEN: usize = 4;

/// Encrypted share payload
///
/// Empty when the recipient's key was unavailable: such a payload can never
/// be delivered to that node.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    /// The undeliverable sentinel
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

impl From<Vec<u8>> for Ciphertext {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({} bytes)", self.0.len())
    }
}

/// A darknode's RSA public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeKey(RsaPublicKey);

impl NodeKey {
    /// Parses the registry encoding: 4-byte big-endian exponent, then modulus
    ///
    /// # Errors
    /// Returns [`FragmentError::EncodingError`] if the bytes do not form a
    /// usable RSA key
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() <= EXPONENT_LEN {
            return Err(FragmentError::EncodingError(format!(
                "public key too short: {} bytes",
                bytes.len()
            )));
        }
        let (e, n) = bytes.split_at(EXPONENT_LEN);
        let key = RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))
            .map_err(|e| FragmentError::EncodingError(format!("public key rejected: {e}")))?;
        Ok(Self(key))
    }

    /// Registry encoding of this key
    ///
    /// # Errors
    /// Returns [`FragmentError::EncodingError`] if the exponent needs more
    /// than four bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let e = self.0.e().to_bytes_be();
        let e = fixed_width(&e, EXPONENT_LEN)?;
        let mut out = e.to_vec();
        out.extend_from_slice(&self.0.n().to_bytes_be());
        Ok(out)
    }

    /// Encrypts one share for this node
    ///
    /// # Errors
    /// Returns [`FragmentError::EncodingError`] if the values do not fit
    /// `byte_width` or the key is too small for the padded message
    pub fn encrypt_share<R: Rng + CryptoRng>(
        &self,
        index: u64,
        value: u64,
        byte_width: usize,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        let mut plaintext = Zeroizing::new(Vec::with_capacity(2 * byte_width));
        plaintext.extend_from_slice(&fixed_width(&index.to_be_bytes(), byte_width)?);
        plaintext.extend_from_slice(&fixed_width(&value.to_be_bytes(), byte_width)?);

        self.0
            .encrypt(rng, Oaep::new::<Sha1>(), &plaintext)
            .map(Ciphertext)
            .map_err(|e| FragmentError::EncodingError(format!("share encryption failed: {e}")))
    }
}

impl From<RsaPublicKey> for NodeKey {
    fn from(key: RsaPublicKey) -> Self {
        Self(key)
    }
}

/// Encrypts `(index, value)` for a node whose key may be missing
///
/// A missing key yields [`Ciphertext::empty`] rather than an error so one
/// absent node does not sink the rest of the pod.
///
/// # Errors
/// See [`NodeKey::encrypt_share`]
pub fn encrypt<R: Rng + CryptoRng>(
    public_key: Option<&NodeKey>,
    index: u64,
    value: u64,
    byte_width: usize,
    rng: &mut R,
) -> Result<Ciphertext> {
    match public_key {
        Some(key) => key.encrypt_share(index, value, byte_width, rng),
        None => Ok(Ciphertext::empty()),
    }
}

/// Left-pads (or strips leading zeros from) a big-endian integer to `width`
fn fixed_width(bytes: &[u8], width: usize) -> Result<Zeroizing<Vec<u8>>> {
    let significant = bytes
        .iter()
        .position(|&b| b != 0)
        .map_or(&[][..], |start| &bytes[start..]);
    if significant.len() > width {
        return Err(FragmentError::EncodingError(format!(
            "value needs {} bytes, field is {width}",
            significant.len()
        )));
    }
    let mut out = Zeroizing::new(vec![0u8; width]);
    out[width - significant.len()..].copy_from_slice(significant);
    Ok(out)
}
