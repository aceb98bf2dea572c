//! Magnet links carrying mutable identities.
//!
//! A mutable link names an identity with `xs=urn:btpk:<hex public key>`.
//! Once resolved, the content is added as `xt=urn:btih:<hex info-hash>`.
//! The identity parameter is never removed, so a swarm joined through the
//! link still records which identity produced it.
//!
//! Links are kept as ordered raw parameters. Keys and values are matched
//! percent-decoded but written back as given, so a rewritten link differs
//! from its input only by the parameters this module touches.

use std::fmt;

use crate::crypto::Ed25519PublicKey;
use crate::error::CoreError;
use crate::types::InfoHash;

/// Scheme and query marker of every magnet link.
pub const MAGNET_PREFIX: &str = "magnet:?";

/// URN namespace for a hex-encoded public key.
pub const BTPK_PREFIX: &str = "urn:btpk:";

/// URN namespace for a hex-encoded info-hash.
pub const BTIH_PREFIX: &str = "urn:btih:";

/// Parameter carrying the identity.
pub const IDENTITY_PARAM: &str = "xs";

/// Exact-topic parameter carrying the content.
pub const TOPIC_PARAM: &str = "xt";

/// A parsed magnet link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagnetLink {
    params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Param {
    key: String,
    value: Option<String>,
    decoded_key: String,
    decoded_value: Option<String>,
}

impl Param {
    fn new(key: &str, value: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            value: value.map(str::to_string),
            decoded_key: decode(key),
            decoded_value: value.map(decode),
        }
    }

    /// The URN this parameter carries under `prefix`, if any.
    ///
    /// Accepts both `xs=urn:btpk:<hex>` and the bare form `urn:btpk:<hex>`
    /// where the URN itself is the key.
    fn urn_suffix(&self, prefix: &str) -> Option<&str> {
        if let Some(rest) = self.decoded_key.strip_prefix(prefix) {
            return Some(rest);
        }
        self.decoded_value.as_deref().and_then(|v| v.strip_prefix(prefix))
    }
}

/// Percent-decode, keeping the raw text when it does not decode to UTF-8.
fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

impl MagnetLink {
    /// Parse a `magnet:?` link.
    pub fn parse(link: &str) -> Result<Self, CoreError> {
        let query = link
            .strip_prefix(MAGNET_PREFIX)
            .ok_or_else(|| CoreError::InvalidLink(format!("not a magnet link: {link}")))?;

        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => Param::new(key, Some(value)),
                None => Param::new(pair, None),
            })
            .collect();

        Ok(Self { params })
    }

    /// The link a publisher hands out: identity only, no content.
    pub fn for_public_key(public_key: &Ed25519PublicKey) -> Self {
        Self {
            params: vec![Param::new(
                IDENTITY_PARAM,
                Some(&format!("{BTPK_PREFIX}{}", public_key.to_hex())),
            )],
        }
    }

    /// Whether the link names a mutable identity.
    pub fn is_mutable(&self) -> bool {
        self.public_key_hex().is_some()
    }

    /// The raw hex of the first identity parameter.
    pub fn public_key_hex(&self) -> Option<&str> {
        self.params.iter().find_map(|p| p.urn_suffix(BTPK_PREFIX))
    }

    /// The identity, if the link names one.
    pub fn public_key(&self) -> Result<Option<Ed25519PublicKey>, CoreError> {
        self.public_key_hex()
            .map(Ed25519PublicKey::from_hex)
            .transpose()
    }

    /// The first content hint, if the link carries one.
    pub fn info_hash(&self) -> Result<Option<InfoHash>, CoreError> {
        self.params
            .iter()
            .find_map(|p| p.urn_suffix(BTIH_PREFIX))
            .map(|hex| {
                InfoHash::from_hex(hex)
                    .map_err(|e| CoreError::InvalidLink(format!("bad info-hash `{hex}`: {e}")))
            })
            .transpose()
    }

    /// Point the link at `info_hash`.
    ///
    /// Any previous content hint is replaced; identity and unrelated
    /// parameters are kept in place.
    pub fn with_info_hash(mut self, info_hash: &InfoHash) -> Self {
        self.params.retain(|p| p.urn_suffix(BTIH_PREFIX).is_none());
        self.params.push(topic_param(info_hash));
        self
    }
}

fn topic_param(info_hash: &InfoHash) -> Param {
    Param::new(
        TOPIC_PARAM,
        Some(&format!("{BTIH_PREFIX}{}", info_hash.to_hex())),
    )
}

impl fmt::Display for MagnetLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MAGNET_PREFIX)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            f.write_str(&param.key)?;
            if let Some(value) = &param.value {
                write!(f, "={value}")?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for MagnetLink {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PK: &str = "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12";

    #[test]
    fn test_identity_link() {
        let pk = Ed25519PublicKey::from_hex(PK).unwrap();
        let link = MagnetLink::for_public_key(&pk);
        assert_eq!(link.to_string(), format!("magnet:?xs=urn:btpk:{PK}"));
        assert!(link.is_mutable());
        assert_eq!(link.public_key().unwrap(), Some(pk));
        assert_eq!(link.info_hash().unwrap(), None);
    }

    #[test]
    fn test_bare_urn_key_form() {
        let link = MagnetLink::parse(&format!("magnet:?urn:btpk:{PK}")).unwrap();
        assert_eq!(link.public_key_hex(), Some(PK));
        assert_eq!(link.to_string(), format!("magnet:?urn:btpk:{PK}"));
    }

    #[test]
    fn test_percent_encoded_identity() {
        let raw = format!("magnet:?xs=urn%3Abtpk%3A{PK}&dn=my%20file");
        let link = MagnetLink::parse(&raw).unwrap();
        assert!(link.is_mutable());
        assert_eq!(link.public_key_hex(), Some(PK));
        assert_eq!(link.to_string(), raw);

        let ih = InfoHash::from_bytes([0x03; 20]);
        let rewritten = link.with_info_hash(&ih).to_string();
        assert_eq!(rewritten, format!("{raw}&xt=urn:btih:{ih}"));
    }

    #[test]
    fn test_percent_encoded_hint_is_replaced() {
        let stale = InfoHash::from_bytes([0x01; 20]);
        let fresh = InfoHash::from_bytes([0x02; 20]);
        let link = MagnetLink::parse(&format!("magnet:?xs=urn:btpk:{PK}&xt=urn%3Abtih%3A{stale}"))
            .unwrap();
        assert_eq!(link.info_hash().unwrap(), Some(stale));

        let link = link.with_info_hash(&fresh);
        assert_eq!(
            link.to_string(),
            format!("magnet:?xs=urn:btpk:{PK}&xt=urn:btih:{fresh}")
        );
    }

    #[test]
    fn test_plain_link_is_not_mutable() {
        let ih = InfoHash::from_bytes([0xab; 20]);
        let link = MagnetLink::parse(&format!("magnet:?xt=urn:btih:{}&dn=file", ih)).unwrap();
        assert!(!link.is_mutable());
        assert_eq!(link.public_key().unwrap(), None);
        assert_eq!(link.info_hash().unwrap(), Some(ih));
    }

    #[test]
    fn test_with_info_hash_keeps_identity_and_order() {
        let ih = InfoHash::from_bytes([0x01; 20]);
        let link = MagnetLink::parse(&format!("magnet:?xs=urn:btpk:{PK}&dn=demo"))
            .unwrap()
            .with_info_hash(&ih);
        assert_eq!(
            link.to_string(),
            format!("magnet:?xs=urn:btpk:{PK}&dn=demo&xt=urn:btih:{}", ih)
        );
        assert_eq!(link.public_key_hex(), Some(PK));
    }

    #[test]
    fn test_with_info_hash_replaces_stale_hint() {
        let stale = InfoHash::from_bytes([0x01; 20]);
        let fresh = InfoHash::from_bytes([0x02; 20]);
        let link = MagnetLink::parse(&format!("magnet:?xs=urn:btpk:{PK}&xt=urn:btih:{stale}"))
            .unwrap()
            .with_info_hash(&fresh);
        assert_eq!(link.info_hash().unwrap(), Some(fresh));
        assert_eq!(link.to_string().matches(BTIH_PREFIX).count(), 1);
    }

    #[test]
    fn test_rejects_non_magnet() {
        assert!(matches!(
            MagnetLink::parse("https://example.com/file.torrent"),
            Err(CoreError::InvalidLink(_))
        ));
    }

    #[test]
    fn test_bad_public_key_hex() {
        let link = MagnetLink::parse("magnet:?xs=urn:btpk:nothex").unwrap();
        assert!(link.is_mutable());
        assert!(matches!(link.public_key(), Err(CoreError::InvalidPublicKey(_))));
    }

    proptest! {
        #[test]
        fn rewrite_keeps_identity(
            pk in any::<[u8; 32]>(),
            first in any::<[u8; 20]>(),
            second in any::<[u8; 20]>(),
        ) {
            let pk = Ed25519PublicKey::from_bytes(pk);
            let second = InfoHash::from_bytes(second);
            let link = MagnetLink::for_public_key(&pk)
                .with_info_hash(&InfoHash::from_bytes(first))
                .with_info_hash(&second);

            let reparsed = MagnetLink::parse(&link.to_string()).unwrap();
            prop_assert_eq!(reparsed.public_key().unwrap(), Some(pk));
            prop_assert_eq!(reparsed.info_hash().unwrap(), Some(second));
            prop_assert_eq!(reparsed, link);
        }
    }
}
