//! 生成代码的命名工具

use crate::declaration::TypeRef;
use infrastructure_common::{GenerationError, GenerationResult};
use proc_macro2::Ident;

/// 泛型参数之间的连接符
pub const GENERIC_SEPARATOR: &str = "__";

/// 将驼峰命名转换为蛇形命名
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            // 前一个字符为小写，或者处于缩写词末尾
            let prev_is_lower = chars.get(i - 1).map_or(false, |c| c.is_lowercase() || c.is_ascii_digit());
            let next_is_lower = chars.get(i + 1).map_or(false, |c| c.is_lowercase());
            let prev_is_separator = chars.get(i - 1).map_or(false, |c| *c == '_');

            if (prev_is_lower || next_is_lower) && !prev_is_separator {
                result.push('_');
            }
        }
        result.extend(ch.to_lowercase());
    }

    result
}

/// 服务键对应的标识符
///
/// 取服务键简单名称的蛇形形式，泛型参数的简单名称依次以 `__` 连接：
/// `Handler<Order>` 得到 `handler__order`。
pub fn service_identifier(service_key: &TypeRef) -> GenerationResult<String> {
    let name = service_key
        .simple_name()
        .ok_or_else(|| GenerationError::InvalidServiceKey {
            service_key: service_key.to_string(),
            reason: "无法确定服务键的名称".to_string(),
        })?;

    let mut identifier = to_snake_case(&name);
    for arg in service_key.generic_args() {
        identifier.push_str(GENERIC_SEPARATOR);
        identifier.push_str(&argument_name(&arg));
    }
    Ok(identifier)
}

fn argument_name(arg: &TypeRef) -> String {
    match arg.simple_name() {
        Some(name) => to_snake_case(&name),
        None => arg
            .display()
            .chars()
            .filter(|ch| ch.is_alphanumeric() || *ch == '_')
            .collect::<String>()
            .to_lowercase(),
    }
}

/// 缓存单元字段名
pub fn cell_field_name(identifier: &str) -> String {
    format!("{identifier}_instance")
}

/// 访问器方法名
pub fn accessor_name(identifier: &str) -> String {
    format!("resolve_{identifier}")
}

/// 解析为标识符，关键字与非法名称返回错误
pub fn parse_ident(name: &str) -> GenerationResult<Ident> {
    syn::parse_str::<Ident>(name)
        .map_err(|e| GenerationError::invalid_declaration(format!("无效的标识符 `{name}`: {e}")))
}
