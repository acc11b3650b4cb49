//! 业务能力层
//!
//! 描述"我能做什么"：证书签发、凭证身份解码。

pub mod certificate;
pub mod identity;

pub use certificate::{CertificateService, CertificateStatus};
pub use identity::{decode_identity, UserIdentity};
