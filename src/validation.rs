//! 表单字段校验，前端控制器与中继共用同一套规则

use std::sync::LazyLock;

use regex::Regex;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;

// 仅拉丁字母、西里尔字母和空白
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Zа-яёА-ЯЁ\s]+$").expect("name pattern compiles"));

// 5-32 位，字母开头，不能以下划线结尾
static HANDLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]{3,30}[A-Za-z0-9]$").expect("handle pattern compiles")
});

/// 校验姓名：长度按字符计
pub fn validate_name(name: &str) -> bool {
    let len = name.chars().count();
    (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) && NAME_RE.is_match(name)
}

/// 去掉开头的一个 `@`
pub fn normalize_contact(contact: &str) -> &str {
    contact.strip_prefix('@').unwrap_or(contact)
}

pub fn validate_contact(contact: &str) -> bool {
    HANDLE_RE.is_match(normalize_contact(contact))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["Иван Иванов", "John Smith", "Ёжик", "Al", "Мария Anna"] {
            assert!(validate_name(name), "{name}");
        }
        assert!(validate_name(&"я".repeat(50)));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!validate_name("R2D2"));
        assert!(!validate_name("Иван!"));
        assert!(!validate_name("a"));
        assert!(!validate_name(""));
        assert!(!validate_name(&"a".repeat(51)));
        assert!(!validate_name("José"));
        assert!(!validate_name("Анна-Мария"));
    }

    #[test]
    fn test_valid_handles() {
        assert!(validate_contact("ivan_99"));
        assert!(validate_contact("abcde"));
        assert!(validate_contact(&format!("a{}", "b".repeat(31))));
        assert!(validate_contact("@durov"));
    }

    #[test]
    fn test_invalid_handles() {
        assert!(!validate_contact("_bad"));
        assert!(!validate_contact("abcd"));
        assert!(!validate_contact("ivan_"));
        assert!(!validate_contact("1ivan"));
        assert!(!validate_contact(&format!("a{}", "b".repeat(32))));
        assert!(!validate_contact("iv an99"));
        assert!(!validate_contact("@@ivan99"));
    }

    #[test]
    fn test_leading_at_does_not_change_result() {
        for handle in ["ivan_99", "_bad", "abcd", "validname", "x_y_z_1"] {
            assert_eq!(
                validate_contact(handle),
                validate_contact(&format!("@{handle}")),
                "{handle}"
            );
        }
    }
}
