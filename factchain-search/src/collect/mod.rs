//! Evidence collection: canonicalisation, dedup, authority fallback and the
//! diversity merge, tied together by [`collect_evidence`].

pub mod authority;
pub mod dedup;
pub mod diversity;
pub mod evidence;
pub mod url_normalize;

pub use authority::AuthorityPolicy;
pub use evidence::{collect_evidence, EvidenceRequest};
