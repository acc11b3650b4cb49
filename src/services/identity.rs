//! 凭证身份解码
//!
//! 把 Bearer 凭证的 payload 当作界面提示的来源（用户 ID、角色），
//! 不做签名校验。这不是信任边界，真正的授权判定永远由服务端完成；
//! 这里解出来的身份只用于填充证书签发请求和界面展示。

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

/// 凭证 payload 中与前端相关的声明
#[derive(Debug, Clone, Deserialize)]
pub struct UserIdentity {
    /// 用户 ID（证书签发请求需要）
    pub id: u64,
    /// 角色，仅用于界面提示
    #[serde(rename = "rol", default)]
    pub role: Option<String>,
}

/// 从 Bearer 凭证解码用户身份
///
/// 任何解码失败（格式错误、payload 缺少字段）都返回 None，
/// 调用方按"身份未知"降级处理。
pub fn decode_identity(token: &str) -> Option<UserIdentity> {
    let mut validation = Validation::new(Algorithm::HS256);
    // 仅解 payload，不验签名也不验过期
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    match decode::<UserIdentity>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            debug!("凭证解码失败: {}", e);
            None
        }
    }
}
